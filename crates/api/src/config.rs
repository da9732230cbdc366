//! Application configuration loaded from files and environment variables.

use std::net::SocketAddr;

use serde::Deserialize;
use thiserror::Error;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub jwt: JwtSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" for local development, "json" for production.
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins. Empty means allow any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Rate limiting for the register and login endpoints.
    #[serde(default = "default_true")]
    pub auth_rate_limit_enabled: bool,
    /// Allowed auth attempts per client per minute.
    #[serde(default = "default_auth_rate_limit_per_minute")]
    pub auth_rate_limit_per_minute: u32,
    /// Burst capacity on top of the steady rate.
    #[serde(default = "default_auth_rate_limit_burst")]
    pub auth_rate_limit_burst: u32,
    /// Upper bound for the `limit` query parameter on list endpoints.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_expiry_secs")]
    pub token_expiry_secs: u64,
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn default_auth_rate_limit_per_minute() -> u32 {
    10
}

fn default_auth_rate_limit_burst() -> u32 {
    5
}

fn default_max_page_size() -> i64 {
    100
}

fn default_token_expiry_secs() -> u64 {
    shared::jwt::DEFAULT_TOKEN_EXPIRY_SECS as u64
}

fn default_leeway_secs() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            auth_rate_limit_enabled: default_true(),
            auth_rate_limit_per_minute: default_auth_rate_limit_per_minute(),
            auth_rate_limit_burst: default_auth_rate_limit_burst(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_expiry_secs: default_token_expiry_secs(),
            leeway_secs: default_leeway_secs(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("database.url must be set (FLIRT__DATABASE__URL)")]
    MissingDatabaseUrl,

    #[error("jwt.secret must be set (FLIRT__JWT__SECRET)")]
    MissingJwtSecret,

    #[error("jwt.secret must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("security.max_page_size must be positive")]
    InvalidMaxPageSize,
}

impl Config {
    /// Loads configuration in layers: `config/default.toml`, then an optional
    /// `config/local.toml`, then `FLIRT__` prefixed environment variables
    /// (double underscore separates nesting, e.g. `FLIRT__SERVER__PORT`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("FLIRT").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Test configuration: in-memory defaults plus a database URL override,
    /// never touching config files on disk.
    pub fn load_for_test(database_url: &str) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 0

            [logging]
            level = "warn"
            format = "pretty"

            [security]
            auth_rate_limit_enabled = false

            [jwt]
            secret = "test-secret-key-that-is-long-enough!"
            token_expiry_secs = 3600
        "#;

        let settings = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml))
            .set_override("database.url", database_url)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }
        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingJwtSecret);
        }
        if self.jwt.secret.len() < 32 {
            return Err(ConfigValidationError::WeakJwtSecret);
        }
        if self.security.max_page_size <= 0 {
            return Err(ConfigValidationError::InvalidMaxPageSize);
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Pool settings in the shape the persistence crate expects.
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
            idle_timeout_secs: self.database.idle_timeout_secs,
        }
    }

    /// JWT configuration for issuing and validating tokens.
    pub fn jwt_config(&self) -> shared::jwt::JwtConfig {
        shared::jwt::JwtConfig::with_leeway(
            &self.jwt.secret,
            self.jwt.token_expiry_secs as i64,
            self.jwt.leeway_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::load_for_test("postgres://localhost/test").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.url, "postgres://localhost/test");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.security.max_page_size, 100);
        assert!(!config.security.auth_rate_limit_enabled);
        assert_eq!(config.jwt.token_expiry_secs, 3600);
    }

    #[test]
    fn test_validate_requires_database_url() {
        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            security: SecurityConfig::default(),
            jwt: JwtSettings::default(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingDatabaseUrl)
        ));
    }

    #[test]
    fn test_validate_requires_jwt_secret() {
        let mut config = Config::load_for_test("postgres://localhost/test").unwrap();
        config.jwt.secret = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingJwtSecret)
        ));
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = Config::load_for_test("postgres://localhost/test").unwrap();
        config.jwt.secret = "short".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::WeakJwtSecret)
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::load_for_test("postgres://localhost/test").unwrap();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
    }
}
