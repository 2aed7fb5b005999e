use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.general.host.trim(), self.general.port)
    }
}

impl EnvConfig for AppConfig {
    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use ::config as config_rs;

    use super::AppConfig;
    use crate::config::EnvConfig;

    fn source(vars: &[(&str, &str)]) -> config_rs::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        config_rs::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn falls_back_to_defaults() {
        let cfg = AppConfig::from_source(source(&[])).expect("defaults should be valid");

        assert_eq!(cfg.bind_address(), "127.0.0.1:3000");
        assert_eq!(cfg.database.url, "sqlite://fyyur.db?mode=rwc");
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.database.min_idle, 2);
    }

    #[test]
    fn reads_nested_keys() {
        let cfg = AppConfig::from_source(source(&[
            ("APP_GENERAL__PORT", "8080"),
            ("APP_DATABASE__URL", "postgres://localhost/fyyur"),
            ("APP_LOGGING__RUST_LOG", "debug"),
        ]))
        .expect("config should load");

        assert_eq!(cfg.general.port, 8080);
        assert_eq!(cfg.database.url, "postgres://localhost/fyyur");
        assert_eq!(cfg.logging.rust_log, "debug");
    }

    #[test]
    fn rejects_invalid_pool_bounds() {
        let err = AppConfig::from_source(source(&[
            ("APP_DATABASE__MAX_CONNECTIONS", "1"),
            ("APP_DATABASE__MIN_IDLE", "4"),
        ]))
        .expect_err("min_idle above max_connections should fail");

        assert!(err.to_string().contains("database.min_idle"));
    }
}
