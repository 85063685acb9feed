//! Process configuration from the environment
//!
//! `.env` is loaded by `main` through dotenvy before `Settings::from_env` runs.
//! Pricing tables come from the JSON file named by PRICING_CONFIG, or the
//! built-in reference tables when it is unset.

use anyhow::{anyhow, Context};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

use crate::pricing::PricingConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub pricing_config_path: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            non_empty("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let bind_addr = non_empty("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            pricing_config_path: non_empty("PRICING_CONFIG").map(PathBuf::from),
            cors_origin: non_empty("CORS_ORIGIN"),
        })
    }

    /// Pricing tables for the engine
    pub fn load_pricing_config(&self) -> anyhow::Result<PricingConfig> {
        match &self.pricing_config_path {
            Some(path) => {
                let config = PricingConfig::from_file(path)?;
                info!("Loaded pricing config from {}", path.display());
                Ok(config)
            }
            None => {
                info!("PRICING_CONFIG not set, using reference pricing tables");
                Ok(PricingConfig::default())
            }
        }
    }
}
