//! Pricing service for the DMC agent backend.
//!
//! Computes per-option price breakdowns for agent quotes and resolves
//! seasonal package rates. Quote, booking and inventory CRUD live in the
//! main backend, which calls this service over HTTP.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;

use axum::{routing::get, Json, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::cache::AppCache;
use crate::error::AppError;
use crate::pricing::responses::HealthResponse;
use crate::pricing::PricingEngine;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub engine: PricingEngine,
}

impl AppState {
    pub fn new(db: PgPool, cache: AppCache, engine: PricingEngine) -> Self {
        Self { db, cache, engine }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn not_found() -> AppError {
    AppError::NotFound
}
