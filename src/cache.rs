//! In-memory caching using moka
//!
//! Packages and resolved seasonal rates are read on every pricing call but
//! change only through the admin CRUD layer, so short TTLs are enough to keep
//! them fresh. Rate resolutions are cached per (package, date), including
//! "no rate applies".

use chrono::NaiveDate;
use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::{Package, SeasonalRate};
use crate::pricing::queries;

/// Application cache holding packages and seasonal rate resolutions
#[derive(Clone)]
pub struct AppCache {
    /// Packages (id -> Package)
    pub packages: Cache<String, Arc<Package>>,
    /// Seasonal rate resolutions ("package_id:date" -> matched rate, if any)
    pub seasonal_rates: Cache<String, Option<Arc<SeasonalRate>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Packages: 500 entries, 10 min TTL
            packages: Cache::builder()
                .max_capacity(500)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Rate resolutions: 10k entries, 5 min TTL
            seasonal_rates: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(5 * 60))
                .time_to_idle(Duration::from_secs(2 * 60))
                .support_invalidation_closures()
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            packages_size: self.packages.entry_count(),
            seasonal_rates_size: self.seasonal_rates.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.packages.invalidate_all();
        self.seasonal_rates.invalidate_all();
        info!("All caches invalidated");
    }

    /// Drop a package and every rate resolution cached for it
    pub async fn invalidate_package(&self, package_id: &str) {
        self.packages.invalidate(package_id).await;

        let prefix = format!("{}:", package_id);
        if let Err(e) = self
            .seasonal_rates
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            warn!("Falling back to full rate cache flush: {}", e);
            self.seasonal_rates.invalidate_all();
        }
        info!("Cache invalidated for package: {}", package_id);
    }

    /// Generate cache key for a seasonal rate resolution
    pub fn seasonal_key(package_id: &str, travel_date: NaiveDate) -> String {
        format!("{}:{}", package_id, travel_date)
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub packages_size: u64,
    pub seasonal_rates_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // first tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with active packages
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::get_active_packages(db).await {
        Ok(packages) => {
            for package in packages {
                cache
                    .packages
                    .insert(package.id.clone(), Arc::new(package))
                    .await;
            }
        }
        Err(e) => warn!("Failed to warm package cache: {}", e),
    }

    cache.packages.run_pending_tasks().await;
    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
