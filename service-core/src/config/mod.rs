use crate::error::AppError;
use config::{Config as Cfg, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

/// Settings shared by every service in the workspace.
///
/// Values are layered: an optional `configuration.{toml,yaml,json}` file in the
/// working directory, then the process environment (`PORT`, `ENVIRONMENT`,
/// `LOG_LEVEL`, `OTLP_ENDPOINT`). A `.env` file is loaded first when present.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let builder = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(Environment::default().try_parsing(true));

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn is_prod(&self) -> bool {
        self.environment.eq_ignore_ascii_case("prod")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_builder(Cfg::builder()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "dev");
        assert_eq!(config.log_level, "info");
        assert!(config.otlp_endpoint.is_none());
        assert!(!config.is_prod());
    }

    #[test]
    fn overrides_take_precedence() {
        let builder = Cfg::builder()
            .set_override("port", 9000)
            .unwrap()
            .set_override("environment", "PROD")
            .unwrap();
        let config = Config::from_builder(builder).unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.is_prod());
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let builder = Cfg::builder().set_override("port", "not-a-port").unwrap();
        let err = Config::from_builder(builder).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
