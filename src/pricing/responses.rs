//! Response DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::round_money;
use super::models::{PricingBreakdown, SeasonalRate};
use super::quotes::QuoteDraft;
use super::seasonal::SeasonalPrice;

/// Money value for JSON responses.
///
/// `amount` is exact; `display` is rounded to cents.
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub display: String,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            display: format!("{:.2}", round_money(amount, 2)),
            currency: currency.to_string(),
        }
    }
}

/// Response for one priced option
#[derive(Debug, Clone, Serialize)]
pub struct PricingBreakdownResponse {
    pub option_index: usize,
    pub base_price: MoneyResponse,
    pub hotel_cost: MoneyResponse,
    pub vehicle_cost: MoneyResponse,
    pub addon_cost: MoneyResponse,
    pub tier_discount: MoneyResponse,
    pub markup: MoneyResponse,
    pub final_price: MoneyResponse,
}

impl PricingBreakdownResponse {
    pub fn new(option_index: usize, breakdown: &PricingBreakdown, currency: &str) -> Self {
        Self {
            option_index,
            base_price: MoneyResponse::new(breakdown.base_price, currency),
            hotel_cost: MoneyResponse::new(breakdown.hotel_cost, currency),
            vehicle_cost: MoneyResponse::new(breakdown.vehicle_cost, currency),
            addon_cost: MoneyResponse::new(breakdown.addon_cost, currency),
            tier_discount: MoneyResponse::new(breakdown.tier_discount, currency),
            markup: MoneyResponse::new(breakdown.markup, currency),
            final_price: MoneyResponse::new(breakdown.final_price, currency),
        }
    }

    pub fn list(pricing: &[PricingBreakdown], currency: &str) -> Vec<Self> {
        pricing
            .iter()
            .enumerate()
            .map(|(index, breakdown)| Self::new(index, breakdown, currency))
            .collect()
    }
}

/// Seasonal rate as shown in price-for-date responses
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalRateSummary {
    pub id: String,
    pub season_name: String,
    pub season_type: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_multiplier: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub fixed_price: Option<Decimal>,
}

impl From<&SeasonalRate> for SeasonalRateSummary {
    fn from(rate: &SeasonalRate) -> Self {
        Self {
            id: rate.id.clone(),
            season_name: rate.season_name.clone(),
            season_type: rate.season_type.as_str().to_string(),
            price_multiplier: rate.price_multiplier,
            fixed_price: rate.fixed_price,
        }
    }
}

/// Response for the price-for-date endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalPriceResponse {
    pub package_id: String,
    pub travel_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub seasonal_rate: Option<SeasonalRateSummary>,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_multiplier: Decimal,
    pub season_type: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub final_price: Decimal,
    pub currency: String,
}

impl SeasonalPriceResponse {
    pub fn new(price: &SeasonalPrice, currency: &str) -> Self {
        Self {
            package_id: price.package_id.clone(),
            travel_date: price.travel_date,
            base_price: price.base_price,
            seasonal_rate: price.seasonal_rate.as_ref().map(SeasonalRateSummary::from),
            price_multiplier: price.price_multiplier,
            season_type: price.season_label().to_string(),
            final_price: price.final_price,
            currency: currency.to_string(),
        }
    }
}

/// Response carrying a priced quote
#[derive(Debug, Clone, Serialize)]
pub struct QuotePricingResponse {
    pub quote: QuoteDraft,
    pub pricing: Vec<PricingBreakdownResponse>,
    /// Array to store in the quote's `pricing` column
    pub snapshot: serde_json::Value,
    pub repriced: bool,
}

impl QuotePricingResponse {
    pub fn new(quote: QuoteDraft, repriced: bool, currency: &str) -> Self {
        Self {
            pricing: PricingBreakdownResponse::list(&quote.pricing, currency),
            snapshot: quote.pricing_snapshot(),
            quote,
            repriced,
        }
    }
}

/// Response for seasonal rate validation
#[derive(Debug, Serialize)]
pub struct RateValidationResponse {
    pub valid: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
