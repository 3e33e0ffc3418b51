use serde::Deserialize;

use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

/// Which store backs the repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let defaults = PostgresConfig::default();

        Self {
            url: defaults.url,
            max_connections: defaults.max_connections,
            min_connections: defaults.min_connections,
            connect_timeout_secs: defaults.connect_timeout_secs,
            idle_timeout_secs: defaults.idle_timeout_secs,
        }
    }
}

impl DatabaseConfig {
    pub fn to_postgres_config(&self) -> PostgresConfig {
        PostgresConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_min_connections(self.min_connections)
            .with_connect_timeout(self.connect_timeout_secs)
            .with_idle_timeout(self.idle_timeout_secs)
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local`, then `APP__*` environment
    /// variables. `DATABASE_URL` overrides `database.url`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let database_url = std::env::var("DATABASE_URL").ok();
        Self::load_with(database_url)
    }

    fn load_with(database_url: Option<String>) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", database_url)?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_database_url_override() {
        let config = AppConfig::load_with(Some("postgres://db/override".to_string())).unwrap();

        assert_eq!(config.database.url, "postgres://db/override");
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = config::Config::builder()
            .set_override("storage.backend", "memory")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_postgres_config_conversion() {
        let database = DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 4,
            ..Default::default()
        };

        let pg = database.to_postgres_config();
        assert_eq!(pg.url, "postgres://localhost/test");
        assert_eq!(pg.max_connections, 4);
        assert_eq!(pg.idle_timeout_secs, 600);
    }
}
