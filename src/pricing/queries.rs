//! Database queries for the pricing engine.
//!
//! Float columns are cast to numeric so they decode straight into `Decimal`,
//! and enum columns are cast to text and parsed on our side.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::error::AppError;

use super::models::{Agent, AgentRow, Package, SeasonalRate};

/// Get a package by id, active or not
pub async fn get_package(pool: &PgPool, package_id: &str) -> Result<Option<Package>, AppError> {
    let package = sqlx::query_as::<_, Package>(
        r#"
        SELECT
            id, name, duration,
            COALESCE(nights, '[]'::json) AS nights,
            base_price::numeric AS base_price,
            COALESCE(is_active, true) AS is_active
        FROM packages
        WHERE id = $1
        "#,
    )
    .bind(package_id)
    .fetch_optional(pool)
    .await?;

    Ok(package)
}

/// Get all active packages (for cache warming)
pub async fn get_active_packages(pool: &PgPool) -> Result<Vec<Package>, AppError> {
    let packages = sqlx::query_as::<_, Package>(
        r#"
        SELECT
            id, name, duration,
            COALESCE(nights, '[]'::json) AS nights,
            base_price::numeric AS base_price,
            COALESCE(is_active, true) AS is_active
        FROM packages
        WHERE COALESCE(is_active, true) = true
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(packages)
}

/// Get an agent by id
pub async fn get_agent(pool: &PgPool, agent_id: &str) -> Result<Option<Agent>, AppError> {
    let row = sqlx::query_as::<_, AgentRow>(
        r#"
        SELECT id, company_name, tier::text AS tier
        FROM agents
        WHERE id = $1
        "#,
    )
    .bind(agent_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Agent::from))
}

/// Active seasonal rates of a package covering `travel_date`.
///
/// More than one row means the write-time overlap check was bypassed.
pub async fn find_rates_covering(
    pool: &PgPool,
    package_id: &str,
    travel_date: NaiveDate,
) -> Result<Vec<SeasonalRate>, AppError> {
    let rates = sqlx::query_as::<_, SeasonalRate>(
        r#"
        SELECT
            id, package_id, season_name,
            season_type::text AS season_type,
            start_date, end_date,
            price_multiplier::numeric AS price_multiplier,
            fixed_price::numeric AS fixed_price,
            COALESCE(min_stay, 1) AS min_stay,
            COALESCE(is_active, true) AS is_active,
            created_at::timestamptz AS created_at
        FROM seasonal_rates
        WHERE package_id = $1
          AND COALESCE(is_active, true) = true
          AND start_date <= $2
          AND end_date >= $2
        ORDER BY created_at DESC NULLS LAST
        "#,
    )
    .bind(package_id)
    .bind(travel_date)
    .fetch_all(pool)
    .await?;

    Ok(rates)
}

/// All seasonal rates of a package, ordered by start date
pub async fn get_rates_for_package(
    pool: &PgPool,
    package_id: &str,
) -> Result<Vec<SeasonalRate>, AppError> {
    let rates = sqlx::query_as::<_, SeasonalRate>(
        r#"
        SELECT
            id, package_id, season_name,
            season_type::text AS season_type,
            start_date, end_date,
            price_multiplier::numeric AS price_multiplier,
            fixed_price::numeric AS fixed_price,
            COALESCE(min_stay, 1) AS min_stay,
            COALESCE(is_active, true) AS is_active,
            created_at::timestamptz AS created_at
        FROM seasonal_rates
        WHERE package_id = $1
        ORDER BY start_date
        "#,
    )
    .bind(package_id)
    .fetch_all(pool)
    .await?;

    Ok(rates)
}
