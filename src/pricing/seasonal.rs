//! Seasonal rate resolution.
//!
//! Resolution assumes at most one active rate covers any date of a package.
//! That invariant is enforced when rates are written (`validate_new_rate`);
//! reads only report a violation, they never repair it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{Package, SeasonType, SeasonalRate};
use super::services::PricingError;

/// Find the active rate of `package_id` covering `travel_date`.
///
/// Returns `DataIntegrityViolation` if more than one active rate matches.
pub fn resolve_rate<'a>(
    rates: &'a [SeasonalRate],
    package_id: &str,
    travel_date: NaiveDate,
) -> Result<Option<&'a SeasonalRate>, PricingError> {
    let mut matches = rates
        .iter()
        .filter(|rate| rate.package_id == package_id && rate.is_active && rate.covers(travel_date));

    let first = matches.next();
    let rest: Vec<&SeasonalRate> = matches.collect();
    if rest.is_empty() {
        return Ok(first);
    }

    let ids = first
        .into_iter()
        .chain(rest)
        .map(|rate| rate.id.clone())
        .collect();
    Err(PricingError::DataIntegrityViolation {
        package_id: package_id.to_string(),
        travel_date,
        matches: ids,
    })
}

/// Price of a package on a given travel date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPrice {
    pub package_id: String,
    pub travel_date: NaiveDate,
    pub base_price: Decimal,
    pub seasonal_rate: Option<SeasonalRate>,
    /// 1.0 when no rate applies.
    pub price_multiplier: Decimal,
    pub final_price: Decimal,
}

impl SeasonalPrice {
    /// "regular" when no seasonal rate applies
    pub fn season_label(&self) -> &'static str {
        self.seasonal_rate
            .as_ref()
            .map_or("regular", |rate| rate.season_type.as_str())
    }

    pub fn season_type(&self) -> Option<SeasonType> {
        self.seasonal_rate.as_ref().map(|rate| rate.season_type)
    }
}

/// Per-pax price of `package` on `travel_date` given the resolved rate (if any)
pub fn price_for_date(
    package: &Package,
    travel_date: NaiveDate,
    rate: Option<&SeasonalRate>,
) -> SeasonalPrice {
    let (price_multiplier, final_price) = match rate {
        Some(rate) => (rate.price_multiplier, rate.apply_to(package.base_price)),
        None => (Decimal::ONE, package.base_price),
    };

    SeasonalPrice {
        package_id: package.id.clone(),
        travel_date,
        base_price: package.base_price,
        seasonal_rate: rate.cloned(),
        price_multiplier,
        final_price,
    }
}

/// Start date must be strictly before end date
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), PricingError> {
    if start >= end {
        return Err(PricingError::InvalidSeasonalRate {
            message: format!("Start date {} must be before end date {}", start, end),
        });
    }
    Ok(())
}

/// First active rate of the candidate's package whose range intersects the candidate.
///
/// The candidate's own id is skipped so an update does not collide with itself.
pub fn find_overlap<'a>(
    existing: &'a [SeasonalRate],
    candidate: &SeasonalRate,
) -> Option<&'a SeasonalRate> {
    existing.iter().find(|rate| {
        rate.package_id == candidate.package_id
            && rate.is_active
            && (candidate.id.is_empty() || rate.id != candidate.id)
            && rate.overlaps(candidate.start_date, candidate.end_date)
    })
}

/// Write-time checks for a new or updated seasonal rate
pub fn validate_new_rate(
    existing: &[SeasonalRate],
    candidate: &SeasonalRate,
) -> Result<(), PricingError> {
    validate_date_range(candidate.start_date, candidate.end_date)?;

    if candidate.price_multiplier < Decimal::ZERO {
        return Err(PricingError::InvalidSeasonalRate {
            message: format!("Price multiplier {} is negative", candidate.price_multiplier),
        });
    }
    if candidate.fixed_price.is_some_and(|fixed| fixed < Decimal::ZERO) {
        return Err(PricingError::InvalidSeasonalRate {
            message: "Fixed price is negative".to_string(),
        });
    }
    if candidate.min_stay < 1 {
        return Err(PricingError::InvalidSeasonalRate {
            message: format!("Minimum stay {} must be at least 1 night", candidate.min_stay),
        });
    }

    // Inactive rates never take part in resolution, so they cannot conflict.
    if !candidate.is_active {
        return Ok(());
    }

    match find_overlap(existing, candidate) {
        Some(conflict) => Err(PricingError::OverlappingSeasonalRate {
            existing: conflict.season_name.clone(),
        }),
        None => Ok(()),
    }
}

/// Listing filter for seasonal rates, ordered by start date
pub fn filter_rates(
    rates: &[SeasonalRate],
    package_id: Option<&str>,
    active_only: bool,
    on_date: Option<NaiveDate>,
) -> Vec<SeasonalRate> {
    let mut selected: Vec<SeasonalRate> = rates
        .iter()
        .filter(|rate| package_id.map_or(true, |id| rate.package_id == id))
        .filter(|rate| !active_only || rate.is_active)
        .filter(|rate| on_date.map_or(true, |date| rate.covers(date)))
        .cloned()
        .collect();
    selected.sort_by_key(|rate| rate.start_date);
    selected
}
