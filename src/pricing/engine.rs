//! Quote pricing engine.
//!
//! Turns a package, a party and a list of candidate options into one
//! `PricingBreakdown` per option. Pure and synchronous: everything it needs
//! is passed in, so it can be shared freely across request handlers.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

use super::calculators::{allocate_rooms_for, select_vehicle, tier_discount, vehicle_cost};
use super::config::PricingConfig;
use super::models::{Agent, MarkupKind, Package, PaxComposition, PricingBreakdown, QuoteOption, TierLevel};
use super::services::PricingError;

/// Pricing engine bound to a set of pricing tables
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: Arc<PricingConfig>,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price every option of a quote.
    ///
    /// Output order matches `options`. Fails only when an amount exceeds the
    /// range of `Decimal`.
    pub fn price(
        &self,
        package: &Package,
        options: &[QuoteOption],
        pax: &PaxComposition,
        agent: &Agent,
    ) -> Result<Vec<PricingBreakdown>, PricingError> {
        options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let breakdown = self.price_option(package, option, pax, agent.tier)?;
                debug!(
                    "Priced option {} of package {} for agent {}: final {}",
                    index, package.id, agent.id, breakdown.final_price
                );
                Ok(breakdown)
            })
            .collect()
    }

    /// Price a single option
    pub fn price_option(
        &self,
        package: &Package,
        option: &QuoteOption,
        pax: &PaxComposition,
        tier: Option<TierLevel>,
    ) -> Result<PricingBreakdown, PricingError> {
        let headcount = Decimal::from(pax.total);

        let base_price = mul(package.base_price, headcount, "base price")?;

        let rooms = Decimal::from(allocate_rooms_for(pax, self.config.persons_per_room).rooms);
        let mut hotel_cost = Decimal::ZERO;
        for (leg, hotel) in option.hotels.iter().enumerate() {
            let nights = Decimal::from(package.nights_for_leg(leg));
            let leg_cost = mul(mul(hotel.price_per_night, nights, "hotel cost")?, rooms, "hotel cost")?;
            hotel_cost = add(hotel_cost, leg_cost, "hotel cost")?;
        }

        let vehicle = select_vehicle(&self.config.vehicles, pax.total);
        let vehicle_cost = vehicle_cost(vehicle, package.duration);

        let mut addon_cost = Decimal::ZERO;
        for addon in &option.add_ons {
            addon_cost = add(addon_cost, mul(addon.price, headcount, "add-on cost")?, "add-on cost")?;
        }

        let subtotal = [hotel_cost, vehicle_cost, addon_cost]
            .into_iter()
            .try_fold(base_price, |sum, amount| add(sum, amount, "subtotal"))?;

        let tier_discount = tier_discount(&self.config.tier_discounts, tier, pax.total);
        let discounted = subtotal
            .checked_sub(tier_discount)
            .ok_or_else(|| overflow("discounted subtotal"))?;
        if discounted < Decimal::ZERO {
            warn!(
                "Tier discount {} exceeds subtotal {} for package {}",
                tier_discount, subtotal, package.id
            );
        }

        let markup = match option.markup_kind {
            MarkupKind::Percentage => {
                mul(discounted, option.markup, "markup")? / Decimal::ONE_HUNDRED
            }
            MarkupKind::Flat => option.markup,
        };

        let mut final_price = add(discounted, markup, "final price")?;
        if final_price < Decimal::ZERO {
            warn!("Negative final price {} for package {}", final_price, package.id);
            if self.config.clamp_negative_final_price {
                final_price = Decimal::ZERO;
            }
        }

        Ok(PricingBreakdown {
            base_price,
            hotel_cost,
            vehicle_cost,
            addon_cost,
            tier_discount,
            markup,
            final_price,
        })
    }
}

fn overflow(component: &str) -> PricingError {
    PricingError::InvalidInput {
        message: format!("{} is out of range", component),
        errors: vec![format!("{} exceeds the largest representable amount", component)],
    }
}

fn mul(a: Decimal, b: Decimal, component: &str) -> Result<Decimal, PricingError> {
    a.checked_mul(b).ok_or_else(|| overflow(component))
}

fn add(a: Decimal, b: Decimal, component: &str) -> Result<Decimal, PricingError> {
    a.checked_add(b).ok_or_else(|| overflow(component))
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
