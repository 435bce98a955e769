use ::config::Config as Settings;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Default request body cap. Attachments arrive inline as base64.
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct BfhlConfig {
    pub common: core_config::Config,
    pub identity: IdentityConfig,
    pub body_limit_bytes: usize,
}

/// Static identity echoed in every classification response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub user_id: String,
    pub email: String,
    pub roll_number: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: "john_doe_17091999".to_string(),
            email: "john@xyz.com".to_string(),
            roll_number: "ABCD123".to_string(),
        }
    }
}

/// The `identity` section as found in the layered settings.
#[derive(Debug, Default, Deserialize)]
struct IdentitySection {
    user_id: Option<String>,
    email: Option<String>,
    roll_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceSections {
    #[serde(default)]
    identity: IdentitySection,
}

impl IdentityConfig {
    /// Reads `identity.*` (`APP__IDENTITY__*` in the environment).
    /// Production refuses the placeholder defaults.
    pub fn from_settings(settings: Settings, is_prod: bool) -> Result<Self, AppError> {
        let section = settings.try_deserialize::<ServiceSections>()?.identity;
        let defaults = IdentityConfig::default();

        Ok(IdentityConfig {
            user_id: resolve("APP__IDENTITY__USER_ID", section.user_id, defaults.user_id, is_prod)?,
            email: resolve("APP__IDENTITY__EMAIL", section.email, defaults.email, is_prod)?,
            roll_number: resolve(
                "APP__IDENTITY__ROLL_NUMBER",
                section.roll_number,
                defaults.roll_number,
                is_prod,
            )?,
        })
    }
}

impl BfhlConfig {
    pub fn load() -> Result<Self, AppError> {
        // Shared layers: .env, configuration file, APP__ prefix
        let settings = core_config::settings()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(BfhlConfig {
            common: core_config::Config::from_settings(settings.clone())?,
            identity: IdentityConfig::from_settings(settings, is_prod)?,
            body_limit_bytes: parse_body_limit(env::var("BODY_LIMIT_BYTES").ok().as_deref())?,
        })
    }
}

fn parse_body_limit(raw: Option<&str>) -> Result<usize, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(DEFAULT_BODY_LIMIT_BYTES),
        Some(value) => value.parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "BODY_LIMIT_BYTES must be a positive integer: {}",
                e
            ))
        }),
    }
}

fn resolve(
    key: &str,
    value: Option<String>,
    default: String,
    is_prod: bool,
) -> Result<String, AppError> {
    match value {
        Some(val) => Ok(val),
        None if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        None => Ok(default),
    }
}
