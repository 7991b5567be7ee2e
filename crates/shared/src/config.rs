//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Token verification configuration.
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    50056
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Run pending migrations at startup.
    #[serde(default)]
    pub migrate_on_start: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Bearer token verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Path to the PEM encoded RSA public key.
    pub public_key_file: String,
    /// The only signing algorithm accepted.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Request metadata header carrying the token.
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Clock skew tolerated when checking expiry.
    #[serde(default)]
    pub leeway_secs: u64,
}

fn default_algorithm() -> String {
    "PS256".to_string()
}

fn default_token_header() -> String {
    "token".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("GLEDGER__DATABASE__URL", Some("sqlite::memory:")),
                ("GLEDGER__AUTH__PUBLIC_KEY_FILE", Some("/etc/gledger/jwt.pub")),
                ("RUN_MODE", Some("unit-test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert!(!config.database.migrate_on_start);
                assert_eq!(config.server.port, 50056);
                assert_eq!(config.auth.algorithm, "PS256");
                assert_eq!(config.auth.token_header, "token");
                assert_eq!(config.auth.public_key_file, "/etc/gledger/jwt.pub");
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("GLEDGER__DATABASE__URL", None::<&str>),
                ("GLEDGER__AUTH__PUBLIC_KEY_FILE", Some("/etc/gledger/jwt.pub")),
                ("RUN_MODE", Some("unit-test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
