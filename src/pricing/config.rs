//! Pricing tables and policy knobs.
//!
//! Everything the engine would otherwise hard-code lives here so a deployment
//! can tune it (via a JSON file, see `Settings::load_pricing_config`) and tests
//! can build deterministic tables.

use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::calculators::DEFAULT_PERSONS_PER_ROOM;
use super::models::TierLevel;
use super::services::PricingError;

/// Vehicle class available for hire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTier {
    #[serde(rename = "type")]
    pub name: String,
    pub capacity: u32,
    pub price_per_day: Decimal,
}

impl VehicleTier {
    pub fn new(name: &str, capacity: u32, price_per_day: Decimal) -> Self {
        Self {
            name: name.to_string(),
            capacity,
            price_per_day,
        }
    }
}

/// Flat per-pax discount by agent tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierDiscountTable(BTreeMap<TierLevel, Decimal>);

impl TierDiscountTable {
    pub fn new(entries: impl IntoIterator<Item = (TierLevel, Decimal)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Discount per pax for `tier`. Missing tiers and untiered agents get nothing.
    pub fn discount_for(&self, tier: Option<TierLevel>) -> Decimal {
        tier.and_then(|t| self.0.get(&t).copied())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TierLevel, &Decimal)> {
        self.0.iter()
    }
}

impl Default for TierDiscountTable {
    fn default() -> Self {
        Self::new([
            (TierLevel::Bronze, dec!(5)),
            (TierLevel::Silver, dec!(10)),
            (TierLevel::Gold, dec!(15)),
            (TierLevel::Platinum, dec!(20)),
        ])
    }
}

fn default_vehicles() -> Vec<VehicleTier> {
    vec![
        VehicleTier::new("Avanza", 6, dec!(35)),
        VehicleTier::new("Innova", 8, dec!(45)),
        VehicleTier::new("ELF", 15, dec!(65)),
        VehicleTier::new("Bus", 25, dec!(85)),
    ]
}

/// Configuration handed to `PricingEngine::new`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Vehicle classes, kept sorted by ascending capacity.
    pub vehicles: Vec<VehicleTier>,
    pub tier_discounts: TierDiscountTable,
    /// Bed occupants per room.
    pub persons_per_room: u32,
    /// Floor `final_price` at zero instead of letting discounts push it negative.
    pub clamp_negative_final_price: bool,
    /// Reject options whose hotel count differs from the package's leg count.
    pub strict_hotel_legs: bool,
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vehicles: default_vehicles(),
            tier_discounts: TierDiscountTable::default(),
            persons_per_room: DEFAULT_PERSONS_PER_ROOM,
            clamp_negative_final_price: false,
            strict_hotel_legs: false,
            currency: "USD".to_string(),
        }
    }
}

impl PricingConfig {
    /// Load a JSON config file. Keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pricing config {}", path.display()))?;
        let config: PricingConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse pricing config {}", path.display()))?;
        config
            .normalized()
            .with_context(|| format!("invalid pricing config {}", path.display()))
    }

    /// Sort vehicle tiers by capacity and validate the result
    pub fn normalized(mut self) -> Result<Self, PricingError> {
        self.vehicles.sort_by_key(|v| v.capacity);
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        let mut errors = Vec::new();

        if self.vehicles.is_empty() {
            errors.push("vehicles must not be empty".to_string());
        }
        for vehicle in &self.vehicles {
            if vehicle.capacity == 0 {
                errors.push(format!("vehicle {} has zero capacity", vehicle.name));
            }
            if vehicle.price_per_day < Decimal::ZERO {
                errors.push(format!("vehicle {} has a negative daily price", vehicle.name));
            }
        }
        for (tier, amount) in self.tier_discounts.iter() {
            if *amount < Decimal::ZERO {
                errors.push(format!("tier {} has a negative discount", tier));
            }
        }
        if self.persons_per_room == 0 {
            errors.push("persons_per_room must be at least 1".to_string());
        }
        if self.currency.trim().is_empty() {
            errors.push("currency must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PricingError::ConfigurationError {
                message: "Invalid pricing configuration".to_string(),
                errors,
            })
        }
    }
}
