use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

/// Settings shared by every service: where to listen and how to log.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Loads `configuration.*` (optional), then `APP__*` variables, then `PORT`.
    pub fn load() -> Result<Self, AppError> {
        Self::from_settings(settings()?)
    }

    /// Reads the shared fields out of already layered settings, then applies `PORT`.
    pub fn from_settings(settings: Cfg) -> Result<Self, AppError> {
        let mut config: Config = settings.try_deserialize()?;

        if let Some(port) = port_override(env::var("PORT").ok().as_deref())? {
            config.port = port;
        }

        Ok(config)
    }
}

/// Layered settings: `.env`, optional `configuration.*`, then `APP__*` variables.
///
/// Services read their own sections (e.g. `APP__IDENTITY__USER_ID` becomes
/// `identity.user_id`) from the same layers as [`Config`].
pub fn settings() -> Result<Cfg, AppError> {
    dotenvy::dotenv().ok();

    Ok(Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?)
}

fn port_override(raw: Option<&str>) -> Result<Option<u16>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("PORT must be a valid port number: {}", e))
        }),
    }
}
