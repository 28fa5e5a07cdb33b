use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost/happyThoughts";
pub const DEFAULT_DATABASE: &str = "happyThoughts";

#[derive(Debug, Clone)]
pub struct ThoughtsConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    /// Used only when `uri` names no default database.
    pub database: String,
}

/// Which [`ThoughtStore`](crate::services::ThoughtStore) implementation to boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "unknown THOUGHTS_STORE backend '{}', expected 'mongodb' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl ThoughtsConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = common.is_prod();

        Ok(ThoughtsConfig {
            mongodb: MongoConfig {
                uri: get_env("MONGO_URL", Some(DEFAULT_MONGO_URL), is_prod)?,
                database: get_env("MONGO_DATABASE", Some(DEFAULT_DATABASE), false)?,
            },
            store: get_env("THOUGHTS_STORE", Some("mongodb"), false)?.parse()?,
            cors: CorsConfig {
                allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|v| parse_origins(&v))
                    .unwrap_or_default(),
            },
            common,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
