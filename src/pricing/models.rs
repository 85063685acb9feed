//! Domain models for quote pricing.
//!
//! Row types use sqlx's FromRow derive for direct database deserialization.
//! The quote-side types (pax, options, hotels, add-ons) arrive as JSON from
//! the quote-management service and are never persisted by this crate.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Error raised when a stored enum label cannot be mapped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Package from packages
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    /// Package length in days; vehicle hire is charged per day.
    pub duration: i32,
    /// Night count per itinerary leg, in travel order.
    #[sqlx(json)]
    pub nights: Vec<u32>,
    pub base_price: Decimal,
    pub is_active: bool,
}

impl Package {
    pub fn leg_count(&self) -> usize {
        self.nights.len()
    }

    /// Nights charged for the hotel at `leg`. Entries past the last leg count as one night.
    pub fn nights_for_leg(&self, leg: usize) -> u32 {
        self.nights.get(leg).copied().unwrap_or(1)
    }

    pub fn total_nights(&self) -> u32 {
        self.nights.iter().sum()
    }

    /// Check the stored itinerary against the package invariants
    pub fn check_invariants(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.base_price < Decimal::ZERO {
            errors.push(format!("base_price {} is negative", self.base_price));
        }
        if self.duration < 0 {
            errors.push(format!("duration {} is negative", self.duration));
        }
        errors
    }

    /// Whether the legs add up to more nights than the package lasts.
    /// Such packages are still priced.
    pub fn nights_exceed_duration(&self) -> bool {
        i64::from(self.total_nights()) > i64::from(self.duration)
    }
}

/// Agent loyalty tier, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TierLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl TierLevel {
    pub const ALL: [TierLevel; 4] = [
        TierLevel::Bronze,
        TierLevel::Silver,
        TierLevel::Gold,
        TierLevel::Platinum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierLevel::Bronze => "Bronze",
            TierLevel::Silver => "Silver",
            TierLevel::Gold => "Gold",
            TierLevel::Platinum => "Platinum",
        }
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Postgres enum labels may be stored either as member names (BRONZE) or values (Bronze).
impl FromStr for TierLevel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TierLevel::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLabelError {
                kind: "tier",
                value: s.to_string(),
            })
    }
}

/// Agents table row (only the columns pricing needs)
#[derive(Debug, Clone, FromRow)]
pub struct AgentRow {
    pub id: String,
    pub company_name: String,
    pub tier: Option<String>,
}

/// Agent as seen by the pricing engine (read-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub company_name: String,
    /// `None` when the tier is missing or unrecognised; no discount applies.
    pub tier: Option<TierLevel>,
}

impl From<AgentRow> for Agent {
    fn from(row: AgentRow) -> Self {
        let tier = row.tier.as_deref().and_then(|label| match label.parse() {
            Ok(tier) => Some(tier),
            Err(e) => {
                tracing::debug!("Agent {} has {}; treating as untiered", row.id, e);
                None
            }
        });

        Self {
            id: row.id,
            company_name: row.company_name,
            tier,
        }
    }
}

/// Season classification of a seasonal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    Low,
    Medium,
    High,
    Peak,
}

impl SeasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Low => "low",
            SeasonType::Medium => "medium",
            SeasonType::High => "high",
            SeasonType::Peak => "peak",
        }
    }
}

impl FromStr for SeasonType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SeasonType::Low),
            "medium" => Ok(SeasonType::Medium),
            "high" => Ok(SeasonType::High),
            "peak" => Ok(SeasonType::Peak),
            _ => Err(ParseLabelError {
                kind: "season type",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SeasonType {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn default_multiplier() -> Decimal {
    Decimal::ONE
}

fn default_min_stay() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

/// SeasonalRate from seasonal_rates
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SeasonalRate {
    #[serde(default)]
    pub id: String,
    pub package_id: String,
    pub season_name: String,
    #[sqlx(try_from = "String")]
    pub season_type: SeasonType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_multiplier")]
    pub price_multiplier: Decimal,
    #[serde(default)]
    pub fixed_price: Option<Decimal>,
    #[serde(default = "default_min_stay")]
    pub min_stay: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SeasonalRate {
    /// Whether `date` falls within [start_date, end_date], both ends inclusive
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether this rate's inclusive range intersects [start, end]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date >= start
    }

    /// Per-pax price under this rate. A fixed price always wins over the multiplier,
    /// including a fixed price of zero.
    pub fn apply_to(&self, base_price: Decimal) -> Decimal {
        match self.fixed_price {
            Some(fixed) => fixed,
            None => base_price * self.price_multiplier,
        }
    }
}

/// Party composition of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaxComposition {
    pub adults: u32,
    #[serde(default, alias = "child_with_bed")]
    pub children_with_bed: u32,
    #[serde(default, alias = "child_without_bed")]
    pub children_without_bed: u32,
    pub total: u32,
}

impl PaxComposition {
    /// Build a composition whose total is derived from its parts
    pub fn new(adults: u32, children_with_bed: u32, children_without_bed: u32) -> Self {
        Self {
            adults,
            children_with_bed,
            children_without_bed,
            total: adults + children_with_bed + children_without_bed,
        }
    }

    pub fn is_consistent(&self) -> bool {
        u64::from(self.adults) + u64::from(self.children_with_bed) + u64::from(self.children_without_bed)
            == u64::from(self.total)
    }
}

/// Hotel chosen for one package leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelStay {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub price_per_night: Decimal,
}

/// Optional extra charged per head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub price: Decimal,
}

/// How an option's markup value is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupKind {
    Percentage,
    /// Anything other than "percentage" is treated as a flat amount.
    #[default]
    #[serde(other)]
    Flat,
}

/// One candidate option of a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteOption {
    pub hotels: Vec<HotelStay>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub markup: Decimal,
    #[serde(default, rename = "markup_type", alias = "markup_kind")]
    pub markup_kind: MarkupKind,
}

/// Travel window of a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Price breakdown for a single quote option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub base_price: Decimal,
    pub hotel_cost: Decimal,
    pub vehicle_cost: Decimal,
    pub addon_cost: Decimal,
    pub tier_discount: Decimal,
    pub markup: Decimal,
    pub final_price: Decimal,
}

impl PricingBreakdown {
    pub fn subtotal(&self) -> Decimal {
        self.base_price + self.hotel_cost + self.vehicle_cost + self.addon_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(start: (i32, u32, u32), end: (i32, u32, u32)) -> SeasonalRate {
        SeasonalRate {
            id: "r1".to_string(),
            package_id: "p1".to_string(),
            season_name: "Peak".to_string(),
            season_type: SeasonType::Peak,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            price_multiplier: dec!(1.5),
            fixed_price: None,
            min_stay: 1,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_tier_parse_accepts_member_names_and_values() {
        assert_eq!("Gold".parse::<TierLevel>().unwrap(), TierLevel::Gold);
        assert_eq!("PLATINUM".parse::<TierLevel>().unwrap(), TierLevel::Platinum);
        assert_eq!(" bronze ".parse::<TierLevel>().unwrap(), TierLevel::Bronze);
        assert!("Diamond".parse::<TierLevel>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(TierLevel::Bronze < TierLevel::Silver);
        assert!(TierLevel::Silver < TierLevel::Gold);
        assert!(TierLevel::Gold < TierLevel::Platinum);
    }

    #[test]
    fn test_agent_row_with_unknown_tier_is_untiered() {
        let agent: Agent = AgentRow {
            id: "a1".to_string(),
            company_name: "Kuta Travel".to_string(),
            tier: Some("DIAMOND".to_string()),
        }
        .into();
        assert_eq!(agent.tier, None);

        let agent: Agent = AgentRow {
            id: "a2".to_string(),
            company_name: "Ubud Tours".to_string(),
            tier: Some("SILVER".to_string()),
        }
        .into();
        assert_eq!(agent.tier, Some(TierLevel::Silver));
    }

    #[test]
    fn test_season_type_parse() {
        assert_eq!(SeasonType::try_from("PEAK".to_string()).unwrap(), SeasonType::Peak);
        assert_eq!("low".parse::<SeasonType>().unwrap(), SeasonType::Low);
        assert!("regular".parse::<SeasonType>().is_err());
    }

    #[test]
    fn test_rate_covers_both_ends() {
        let r = rate((2024, 12, 15), (2025, 1, 15));
        assert!(r.covers(NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()));
        assert!(r.covers(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()));
        assert!(r.covers(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()));
        assert!(!r.covers(NaiveDate::from_ymd_opt(2024, 12, 14).unwrap()));
        assert!(!r.covers(NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()));
    }

    #[test]
    fn test_fixed_price_wins_over_multiplier() {
        let mut r = rate((2024, 12, 15), (2025, 1, 15));
        assert_eq!(r.apply_to(dec!(1000)), dec!(1500));
        r.fixed_price = Some(dec!(1200));
        assert_eq!(r.apply_to(dec!(1000)), dec!(1200));
        r.fixed_price = Some(Decimal::ZERO);
        assert_eq!(r.apply_to(dec!(1000)), Decimal::ZERO);
    }

    #[test]
    fn test_markup_kind_parsing() {
        let parse = |value: serde_json::Value| serde_json::from_value::<MarkupKind>(value).unwrap();
        assert_eq!(parse(serde_json::json!("percentage")), MarkupKind::Percentage);
        assert_eq!(parse(serde_json::json!("flat")), MarkupKind::Flat);
        assert_eq!(parse(serde_json::json!("fixed")), MarkupKind::Flat);
        assert_eq!(MarkupKind::default(), MarkupKind::Flat);

        let option: QuoteOption = serde_json::from_value(serde_json::json!({
            "hotels": [],
            "markup": "12",
            "markup_type": "percentage"
        }))
        .unwrap();
        assert_eq!(option.markup_kind, MarkupKind::Percentage);
        assert!(option.add_ons.is_empty());
    }

    #[test]
    fn test_pax_consistency() {
        assert!(PaxComposition::new(2, 1, 1).is_consistent());
        let pax = PaxComposition {
            adults: 2,
            children_with_bed: 1,
            children_without_bed: 0,
            total: 4,
        };
        assert!(!pax.is_consistent());
    }

    #[test]
    fn test_pax_accepts_legacy_field_names() {
        let pax: PaxComposition = serde_json::from_value(serde_json::json!({
            "adults": 2,
            "children": 2,
            "child_with_bed": 1,
            "child_without_bed": 1,
            "total": 4
        }))
        .unwrap();
        assert_eq!(pax, PaxComposition::new(2, 1, 1));

        let pax: PaxComposition =
            serde_json::from_value(serde_json::json!({"adults": 3, "total": 3})).unwrap();
        assert_eq!(pax.children_with_bed, 0);
        assert_eq!(pax.children_without_bed, 0);
    }

    #[test]
    fn test_markup_kind_defaults_to_flat() {
        let option: QuoteOption = serde_json::from_value(serde_json::json!({
            "hotels": [{"price_per_night": 50}],
            "markup": 10,
            "markup_type": "percentage"
        }))
        .unwrap();
        assert_eq!(option.markup_kind, MarkupKind::Percentage);
        assert!(option.add_ons.is_empty());

        let option: QuoteOption = serde_json::from_value(serde_json::json!({
            "hotels": [],
            "markup": 25,
            "markup_type": "fixed"
        }))
        .unwrap();
        assert_eq!(option.markup_kind, MarkupKind::Flat);

        let option: QuoteOption =
            serde_json::from_value(serde_json::json!({"hotels": []})).unwrap();
        assert_eq!(option.markup_kind, MarkupKind::Flat);
        assert_eq!(option.markup, Decimal::ZERO);
    }

    #[test]
    fn test_package_nights_fallback_and_invariants() {
        let package = Package {
            id: "p1".to_string(),
            name: "Ubud & Kuta".to_string(),
            duration: 3,
            nights: vec![1, 2],
            base_price: dec!(100),
            is_active: true,
        };
        assert_eq!(package.nights_for_leg(0), 1);
        assert_eq!(package.nights_for_leg(1), 2);
        assert_eq!(package.nights_for_leg(2), 1);
        assert!(package.check_invariants().is_empty());
        assert!(!package.nights_exceed_duration());

        let long = Package {
            duration: 2,
            ..package.clone()
        };
        assert!(long.check_invariants().is_empty());
        assert!(long.nights_exceed_duration());

        let broken = Package {
            duration: -1,
            base_price: dec!(-1),
            ..package
        };
        assert_eq!(broken.check_invariants().len(), 2);
    }
}
