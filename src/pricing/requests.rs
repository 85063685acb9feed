//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use super::models::{PaxComposition, QuoteOption, SeasonalRate, TravelDates};
use super::quotes::{QuoteDraft, QuoteUpdate};

/// Request to preview pricing for a set of options
#[derive(Debug, Deserialize)]
pub struct CalculatePricingRequest {
    pub package_id: String,
    pub agent_id: String,
    pub pax: PaxComposition,
    pub options: Vec<QuoteOption>,
}

/// Request to build the pricing snapshot of a new quote
#[derive(Debug, Deserialize)]
pub struct CreateQuotePricingRequest {
    pub package_id: String,
    pub agent_id: String,
    #[serde(default)]
    pub travel_dates: Option<TravelDates>,
    pub pax: PaxComposition,
    pub options: Vec<QuoteOption>,
}

/// Request to apply an update to a priced quote
#[derive(Debug, Deserialize)]
pub struct RepriceQuoteRequest {
    pub quote: QuoteDraft,
    #[serde(default)]
    pub update: QuoteUpdate,
}

/// Query for the price-for-date endpoint
#[derive(Debug, Deserialize)]
pub struct PriceForDateQuery {
    pub travel_date: NaiveDate,
}

fn default_active_only() -> bool {
    true
}

/// Query for listing a package's seasonal rates
#[derive(Debug, Deserialize)]
pub struct SeasonalRateListQuery {
    #[serde(default = "default_active_only")]
    pub active_only: bool,
    #[serde(default)]
    pub on_date: Option<NaiveDate>,
}

/// Request to check a seasonal rate before it is written
#[derive(Debug, Deserialize)]
pub struct ValidateSeasonalRateRequest {
    pub rate: SeasonalRate,
}
