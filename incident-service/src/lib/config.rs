use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
}

/// Which adapter backs the user and incident stores.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub users_table: String,
    pub incidents_table: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, STORE__INCIDENTS_TABLE, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::from_sources(&run_mode, Environment::default())
    }

    /// Build from the config directory and the given environment source.
    ///
    /// No file ships a signing secret, so `jwt.secret` must come from the
    /// environment (`JWT__SECRET`) or a deployment-specific file.
    pub fn from_sources(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // STORE__USERS_TABLE=accounts overrides store.users_table
            .add_source(environment.separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings that would only fail later at request time.
    ///
    /// Table names are interpolated into SQL, so they must be plain
    /// identifiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }

        for (key, table) in [
            ("store.users_table", &self.store.users_table),
            ("store.incidents_table", &self.store.incidents_table),
        ] {
            if !is_sql_identifier(table) {
                return Err(ConfigError::Message(format!(
                    "{key} must be a plain SQL identifier, got {table:?}"
                )));
            }
        }

        if self.store.backend == StoreBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres store".into(),
            ));
        }

        Ok(())
    }
}

fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }

    name.len() <= 63 && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: StoreBackend) -> Config {
        Config {
            server: ServerConfig { http_port: 3000 },
            jwt: JwtConfig {
                secret: "secret".to_string(),
            },
            store: StoreConfig {
                backend,
                users_table: "users".to_string(),
                incidents_table: "incidents".to_string(),
            },
            database: DatabaseConfig::default(),
        }
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        assert!(config(StoreBackend::Memory).validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_url() {
        let mut config = config(StoreBackend::Postgres);
        assert!(config.validate().is_err());

        config.database.url = "postgres://localhost/incidents".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = config(StoreBackend::Memory);
        config.jwt.secret = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_names_must_be_identifiers() {
        let mut config = config(StoreBackend::Memory);
        config.store.incidents_table = "incidents; DROP TABLE users".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_sql_identifier() {
        assert!(is_sql_identifier("incidents"));
        assert!(is_sql_identifier("_users_v2"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("2incidents"));
        assert!(!is_sql_identifier("incident-table"));
        assert!(!is_sql_identifier("public.incidents"));
    }

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        Environment::default().source(Some(source))
    }

    #[test]
    fn test_load_without_secret_fails() {
        for run_mode in ["development", "production"] {
            let result = Config::from_sources(run_mode, environment(&[]));
            assert!(result.is_err(), "run mode {run_mode}");
        }
    }

    #[test]
    fn test_load_with_secret_from_environment() {
        let config = Config::from_sources(
            "production",
            environment(&[("JWT__SECRET", "injected-at-startup")]),
        )
        .expect("Configuration should load");

        assert_eq!(config.jwt.secret, "injected-at-startup");
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_backend_deserializes_lowercase() {
        let backend: StoreBackend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }
}
