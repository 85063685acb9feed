//! Pricing route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::cache::CacheStats;
use crate::error::Result;
use crate::AppState;

use super::models::SeasonalRate;
use super::requests::{
    CalculatePricingRequest, CreateQuotePricingRequest, PriceForDateQuery, RepriceQuoteRequest,
    SeasonalRateListQuery, ValidateSeasonalRateRequest,
};
use super::responses::{
    PricingBreakdownResponse, QuotePricingResponse, RateValidationResponse, SeasonalPriceResponse,
};
use super::services;

/// Pricing API, mounted under /api/pricing
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/calculate", post(calculate))
        .route("/quotes", post(create_quote))
        .route("/quotes/reprice", post(reprice_quote))
        .route("/packages/:package_id/price", get(price_for_date))
        .route("/packages/:package_id/seasonal-rates", get(list_seasonal_rates))
        .route("/seasonal-rates/validate", post(validate_seasonal_rate))
        .route("/packages/:package_id/cache/invalidate", post(invalidate_package_cache))
        .route("/cache/invalidate", post(invalidate_cache))
        .route("/cache/stats", get(cache_stats))
}

/// Preview pricing for quote options without creating a quote
async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculatePricingRequest>,
) -> Result<Json<Vec<PricingBreakdownResponse>>> {
    let pricing = services::calculate_pricing(&state.db, &state.cache, &state.engine, &request).await?;
    Ok(Json(PricingBreakdownResponse::list(
        &pricing,
        &state.engine.config().currency,
    )))
}

/// Price a new quote
async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<CreateQuotePricingRequest>,
) -> Result<(StatusCode, Json<QuotePricingResponse>)> {
    let draft = services::create_quote_pricing(&state.db, &state.cache, &state.engine, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(QuotePricingResponse::new(draft, true, &state.engine.config().currency)),
    ))
}

/// Apply an update to a priced quote
async fn reprice_quote(
    State(state): State<AppState>,
    Json(request): Json<RepriceQuoteRequest>,
) -> Result<Json<QuotePricingResponse>> {
    let (draft, repriced) =
        services::reprice_quote(&state.db, &state.cache, &state.engine, request.quote, request.update).await?;
    Ok(Json(QuotePricingResponse::new(
        draft,
        repriced,
        &state.engine.config().currency,
    )))
}

/// Per-pax package price on a travel date
async fn price_for_date(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
    Query(query): Query<PriceForDateQuery>,
) -> Result<Json<SeasonalPriceResponse>> {
    let price =
        services::calculate_seasonal_price(&state.db, &state.cache, &package_id, query.travel_date).await?;
    Ok(Json(SeasonalPriceResponse::new(
        &price,
        &state.engine.config().currency,
    )))
}

/// Seasonal rates of a package
async fn list_seasonal_rates(
    State(state): State<AppState>,
    Path(package_id): Path<String>,
    Query(query): Query<SeasonalRateListQuery>,
) -> Result<Json<Vec<SeasonalRate>>> {
    let rates = services::list_seasonal_rates(
        &state.db,
        &state.cache,
        &package_id,
        query.active_only,
        query.on_date,
    )
    .await?;
    Ok(Json(rates))
}

/// Check a seasonal rate before the CRUD layer writes it
async fn validate_seasonal_rate(
    State(state): State<AppState>,
    Json(request): Json<ValidateSeasonalRateRequest>,
) -> Result<Json<RateValidationResponse>> {
    services::validate_seasonal_rate(&state.db, &state.cache, &request.rate).await?;
    Ok(Json(RateValidationResponse { valid: true }))
}

/// Drop cached data for a package after the CRUD layer changed it or its rates
async fn invalidate_package_cache(State(state): State<AppState>, Path(package_id): Path<String>) -> StatusCode {
    state.cache.invalidate_package(&package_id).await;
    StatusCode::NO_CONTENT
}

async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
