//! Pricing service functions with database access.
//!
//! These functions resolve ids to entities (cache first, then database),
//! validate caller input and hand everything to the pure pricing core.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::AppCache;
use crate::error::Result;

use super::config::PricingConfig;
use super::engine::PricingEngine;
use super::models::{Agent, Package, PaxComposition, PricingBreakdown, QuoteOption, SeasonalRate};
use super::queries;
use super::quotes::{QuoteDraft, QuoteUpdate};
use super::requests::{CalculatePricingRequest, CreateQuotePricingRequest};
use super::seasonal::{self, SeasonalPrice};

/// Pricing calculation error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("Package {package_id} not found or inactive")]
    PackageNotFound { package_id: String },

    #[error("Agent {agent_id} not found")]
    AgentNotFound { agent_id: String },

    #[error(
        "{} active seasonal rates match package {package_id} on {travel_date}",
        .matches.len()
    )]
    DataIntegrityViolation {
        package_id: String,
        travel_date: NaiveDate,
        matches: Vec<String>,
    },

    #[error("Invalid seasonal rate: {message}")]
    InvalidSeasonalRate { message: String },

    #[error("Seasonal rate overlaps with existing rate: {existing}")]
    OverlappingSeasonalRate { existing: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String, errors: Vec<String> },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, errors: Vec<String> },
}

impl PricingError {
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::PackageNotFound { .. } => "package_not_found",
            PricingError::AgentNotFound { .. } => "agent_not_found",
            PricingError::DataIntegrityViolation { .. } => "data_integrity_violation",
            PricingError::InvalidSeasonalRate { .. } => "invalid_seasonal_rate",
            PricingError::OverlappingSeasonalRate { .. } => "overlapping_seasonal_rate",
            PricingError::InvalidInput { .. } => "invalid_input",
            PricingError::ConfigurationError { .. } => "configuration_error",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            PricingError::DataIntegrityViolation { matches, .. } => {
                Some(serde_json::json!({ "matching_rate_ids": matches }))
            }
            PricingError::InvalidInput { errors, .. }
            | PricingError::ConfigurationError { errors, .. }
                if !errors.is_empty() =>
            {
                Some(serde_json::json!({ "errors": errors }))
            }
            _ => None,
        }
    }
}

/// Boundary checks on caller-supplied pax and options.
///
/// Runs before any lookup so malformed requests never touch the database.
pub fn validate_request(pax: &PaxComposition, options: &[QuoteOption]) -> std::result::Result<(), PricingError> {
    let mut errors = Vec::new();

    if !pax.is_consistent() {
        errors.push(format!(
            "pax total {} does not equal adults {} + children with bed {} + children without bed {}",
            pax.total, pax.adults, pax.children_with_bed, pax.children_without_bed
        ));
    }
    if options.is_empty() {
        errors.push("at least one option is required".to_string());
    }
    for (index, option) in options.iter().enumerate() {
        if option.hotels.iter().any(|h| h.price_per_night < Decimal::ZERO) {
            errors.push(format!("option {} has a negative hotel price", index));
        }
        if option.add_ons.iter().any(|a| a.price < Decimal::ZERO) {
            errors.push(format!("option {} has a negative add-on price", index));
        }
        if option.markup < Decimal::ZERO {
            errors.push(format!("option {} has a negative markup", index));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidInput {
            message: "Invalid pricing request".to_string(),
            errors,
        })
    }
}

/// Checks that need the resolved package
pub fn validate_against_package(
    config: &PricingConfig,
    package: &Package,
    options: &[QuoteOption],
) -> std::result::Result<(), PricingError> {
    let invariants = package.check_invariants();
    if !invariants.is_empty() {
        return Err(PricingError::ConfigurationError {
            message: format!("Package {} violates its invariants", package.id),
            errors: invariants,
        });
    }
    if package.nights_exceed_duration() {
        warn!(
            "Package {} legs total {} nights but duration is {} days",
            package.id,
            package.total_nights(),
            package.duration
        );
    }

    if config.strict_hotel_legs {
        let errors: Vec<String> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.hotels.len() != package.leg_count())
            .map(|(index, option)| {
                format!(
                    "option {} has {} hotels but package has {} legs",
                    index,
                    option.hotels.len(),
                    package.leg_count()
                )
            })
            .collect();
        if !errors.is_empty() {
            return Err(PricingError::InvalidInput {
                message: "Hotel selection does not match package legs".to_string(),
                errors,
            });
        }
    }

    Ok(())
}

/// Load a package, cache first.
///
/// With `require_active`, inactive packages are reported as not found.
pub async fn load_package(
    pool: &PgPool,
    cache: &AppCache,
    package_id: &str,
    require_active: bool,
) -> Result<Arc<Package>> {
    let package = if let Some(cached) = cache.packages.get(package_id).await {
        debug!("Cache HIT for package: {}", package_id);
        cached
    } else {
        debug!("Cache MISS for package: {}", package_id);
        let package = queries::get_package(pool, package_id)
            .await?
            .ok_or_else(|| PricingError::PackageNotFound {
                package_id: package_id.to_string(),
            })?;
        let package = Arc::new(package);
        cache
            .packages
            .insert(package_id.to_string(), package.clone())
            .await;
        package
    };

    if require_active && !package.is_active {
        return Err(PricingError::PackageNotFound {
            package_id: package_id.to_string(),
        }
        .into());
    }

    Ok(package)
}

/// Load the agent whose tier drives the discount
pub async fn load_agent(pool: &PgPool, agent_id: &str) -> Result<Agent> {
    let agent = queries::get_agent(pool, agent_id)
        .await?
        .ok_or_else(|| PricingError::AgentNotFound {
            agent_id: agent_id.to_string(),
        })?;
    Ok(agent)
}

/// Find the active seasonal rate of a package covering `travel_date`.
///
/// Resolutions (including "none") are cached per package and date.
pub async fn resolve_seasonal_rate(
    pool: &PgPool,
    cache: &AppCache,
    package_id: &str,
    travel_date: NaiveDate,
) -> Result<Option<Arc<SeasonalRate>>> {
    let key = AppCache::seasonal_key(package_id, travel_date);
    if let Some(cached) = cache.seasonal_rates.get(&key).await {
        debug!("Cache HIT for seasonal rate: {}", key);
        return Ok(cached);
    }

    let candidates = queries::find_rates_covering(pool, package_id, travel_date).await?;
    let resolved = seasonal::resolve_rate(&candidates, package_id, travel_date)?
        .cloned()
        .map(Arc::new);

    cache.seasonal_rates.insert(key, resolved.clone()).await;
    Ok(resolved)
}

/// Per-pax price of a package on a travel date
pub async fn calculate_seasonal_price(
    pool: &PgPool,
    cache: &AppCache,
    package_id: &str,
    travel_date: NaiveDate,
) -> Result<SeasonalPrice> {
    let package = load_package(pool, cache, package_id, false).await?;
    let rate = resolve_seasonal_rate(pool, cache, package_id, travel_date).await?;
    Ok(seasonal::price_for_date(&package, travel_date, rate.as_deref()))
}

/// Stateless pricing preview for a set of options
pub async fn calculate_pricing(
    pool: &PgPool,
    cache: &AppCache,
    engine: &PricingEngine,
    request: &CalculatePricingRequest,
) -> Result<Vec<PricingBreakdown>> {
    validate_request(&request.pax, &request.options)?;

    let package = load_package(pool, cache, &request.package_id, true).await?;
    validate_against_package(engine.config(), &package, &request.options)?;
    let agent = load_agent(pool, &request.agent_id).await?;

    let pricing = engine.price(&package, &request.options, &request.pax, &agent)?;
    info!(
        "Priced {} options of package {} for agent {}",
        pricing.len(),
        package.id,
        agent.id
    );
    Ok(pricing)
}

/// Price a new quote and return its snapshot
pub async fn create_quote_pricing(
    pool: &PgPool,
    cache: &AppCache,
    engine: &PricingEngine,
    request: CreateQuotePricingRequest,
) -> Result<QuoteDraft> {
    validate_request(&request.pax, &request.options)?;

    let package = load_package(pool, cache, &request.package_id, true).await?;
    validate_against_package(engine.config(), &package, &request.options)?;
    let agent = load_agent(pool, &request.agent_id).await?;

    let draft = QuoteDraft::create(
        engine,
        &package,
        &agent,
        request.travel_dates,
        request.pax,
        request.options,
    )?;
    info!("Created pricing snapshot for package {} ({} options)", package.id, draft.pricing.len());
    Ok(draft)
}

/// Apply an update to a priced quote, repricing when pax, options or dates changed
pub async fn reprice_quote(
    pool: &PgPool,
    cache: &AppCache,
    engine: &PricingEngine,
    mut draft: QuoteDraft,
    update: QuoteUpdate,
) -> Result<(QuoteDraft, bool)> {
    if !update.requires_repricing() {
        return Ok((draft, false));
    }

    let pax = update.pax.unwrap_or(draft.pax);
    let options = update.options.as_deref().unwrap_or(&draft.options);
    validate_request(&pax, options)?;

    // Existing quotes keep their pricing even if the package was deactivated since.
    let package = load_package(pool, cache, &draft.package_id, false).await?;
    validate_against_package(engine.config(), &package, options)?;
    let agent = load_agent(pool, &draft.agent_id).await?;

    let repriced = draft.apply_update(update, engine, &package, &agent)?;
    Ok((draft, repriced))
}

/// Write-time check for a seasonal rate against the package's existing rates
pub async fn validate_seasonal_rate(pool: &PgPool, cache: &AppCache, candidate: &SeasonalRate) -> Result<()> {
    load_package(pool, cache, &candidate.package_id, false).await?;
    let existing = queries::get_rates_for_package(pool, &candidate.package_id).await?;
    seasonal::validate_new_rate(&existing, candidate)?;
    Ok(())
}

/// Seasonal rates of a package, optionally only active ones or those covering a date
pub async fn list_seasonal_rates(
    pool: &PgPool,
    cache: &AppCache,
    package_id: &str,
    active_only: bool,
    on_date: Option<NaiveDate>,
) -> Result<Vec<SeasonalRate>> {
    load_package(pool, cache, package_id, false).await?;
    let rates = queries::get_rates_for_package(pool, package_id).await?;
    Ok(seasonal::filter_rates(&rates, Some(package_id), active_only, on_date))
}
