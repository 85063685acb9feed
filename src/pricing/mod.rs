//! Quote pricing engine.
//!
//! Prices the candidate options of an agent's quote (rooms, vehicle hire,
//! add-ons, tier discount, markup) and resolves seasonal package rates.
//! Called by the quote-management service via HTTP/JSON.

pub mod calculators;
pub mod config;
pub mod engine;
pub mod models;
pub mod queries;
pub mod quotes;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod seasonal;
pub mod services;

// Re-export commonly used items
pub use calculators::{allocate_rooms, round_money, select_vehicle, RoomAllocation};
pub use config::{PricingConfig, TierDiscountTable, VehicleTier};
pub use engine::PricingEngine;
pub use quotes::{QuoteDraft, QuoteUpdate};
pub use routes::router;
pub use seasonal::{price_for_date, resolve_rate, SeasonalPrice};
pub use services::PricingError;
