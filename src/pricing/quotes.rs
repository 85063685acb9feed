//! Pricing snapshots embedded in quotes.
//!
//! A quote stores one breakdown per option, computed when the quote is
//! created and recomputed whenever its party, options or travel dates change.

use serde::{Deserialize, Serialize};

use super::engine::PricingEngine;
use super::models::{Agent, Package, PaxComposition, PricingBreakdown, QuoteOption, TravelDates};
use super::services::PricingError;

/// Pricing-relevant state of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDraft {
    pub package_id: String,
    pub agent_id: String,
    #[serde(default)]
    pub travel_dates: Option<TravelDates>,
    pub pax: PaxComposition,
    pub options: Vec<QuoteOption>,
    #[serde(default)]
    pub pricing: Vec<PricingBreakdown>,
}

/// Partial update to a quote; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    #[serde(default)]
    pub travel_dates: Option<TravelDates>,
    #[serde(default)]
    pub pax: Option<PaxComposition>,
    #[serde(default)]
    pub options: Option<Vec<QuoteOption>>,
}

impl QuoteUpdate {
    pub fn requires_repricing(&self) -> bool {
        self.travel_dates.is_some() || self.pax.is_some() || self.options.is_some()
    }
}

impl QuoteDraft {
    /// Build a quote and price all of its options
    pub fn create(
        engine: &PricingEngine,
        package: &Package,
        agent: &Agent,
        travel_dates: Option<TravelDates>,
        pax: PaxComposition,
        options: Vec<QuoteOption>,
    ) -> Result<Self, PricingError> {
        let mut draft = Self {
            package_id: package.id.clone(),
            agent_id: agent.id.clone(),
            travel_dates,
            pax,
            options,
            pricing: Vec::new(),
        };
        draft.reprice(engine, package, agent)?;
        Ok(draft)
    }

    /// Apply `update`, repricing only if it touched pax, options or travel dates.
    ///
    /// Returns whether the pricing snapshot was recomputed. On error the draft
    /// is left exactly as it was.
    pub fn apply_update(
        &mut self,
        update: QuoteUpdate,
        engine: &PricingEngine,
        package: &Package,
        agent: &Agent,
    ) -> Result<bool, PricingError> {
        if !update.requires_repricing() {
            return Ok(false);
        }

        let mut next = self.clone();
        if let Some(dates) = update.travel_dates {
            next.travel_dates = Some(dates);
        }
        if let Some(pax) = update.pax {
            next.pax = pax;
        }
        if let Some(options) = update.options {
            next.options = options;
        }
        next.reprice(engine, package, agent)?;

        *self = next;
        Ok(true)
    }

    /// Copy of this quote carrying the same snapshot, without repricing
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// The array stored in the quote's `pricing` column
    pub fn pricing_snapshot(&self) -> serde_json::Value {
        pricing_snapshot(&self.pricing)
    }

    fn reprice(
        &mut self,
        engine: &PricingEngine,
        package: &Package,
        agent: &Agent,
    ) -> Result<(), PricingError> {
        self.pricing = engine.price(package, &self.options, &self.pax, agent)?;
        Ok(())
    }
}

/// Serialize breakdowns in option order
pub fn pricing_snapshot(pricing: &[PricingBreakdown]) -> serde_json::Value {
    serde_json::Value::Array(
        pricing
            .iter()
            .map(|breakdown| {
                serde_json::json!({
                    "base_price": breakdown.base_price.to_string(),
                    "hotel_cost": breakdown.hotel_cost.to_string(),
                    "vehicle_cost": breakdown.vehicle_cost.to_string(),
                    "addon_cost": breakdown.addon_cost.to_string(),
                    "tier_discount": breakdown.tier_discount.to_string(),
                    "markup": breakdown.markup.to_string(),
                    "final_price": breakdown.final_price.to_string(),
                })
            })
            .collect(),
    )
}
