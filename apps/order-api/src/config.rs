//! Service configuration, loaded from environment variables.

use std::net::SocketAddr;

use sqlx::mysql::MySqlConnectOptions;

use crate::store::ConnectRetryPolicy;

/// Default HTTP server port.
const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default Prometheus listener address.
const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:9090";

/// MySQL connection settings.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database user.
    pub user: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "mysql".to_string(),
            port: 3306,
            user: "app".to_string(),
            password: "apppass".to_string(),
            database: "pedidos_db".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASS`, `DB_NAME`,
    /// falling back to built-in defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("DB_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            user: std::env::var("DB_USER").unwrap_or(defaults.user),
            password: std::env::var("DB_PASS").unwrap_or(defaults.password),
            database: std::env::var("DB_NAME").unwrap_or(defaults.database),
        }
    }

    /// Build sqlx connect options for this configuration.
    #[must_use]
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// HTTP and metrics listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the business HTTP API.
    pub http_port: u16,
    /// Address for the Prometheus exporter.
    pub metrics_addr: SocketAddr,
}

impl Default for ServerConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            metrics_addr: DEFAULT_METRICS_ADDR
                .parse()
                .expect("static default metrics address is valid"),
        }
    }
}

impl ServerConfig {
    /// Load from `HTTP_PORT` and `METRICS_ADDR` with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_port),
            metrics_addr: std::env::var("METRICS_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_addr),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Store connection settings.
    pub store: StoreConfig,
    /// Listener settings.
    pub server: ServerConfig,
    /// Startup connect retry budget.
    pub retry: ConnectRetryPolicy,
}

impl AppConfig {
    /// Load the whole configuration from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            store: StoreConfig::from_env(),
            server: ServerConfig::from_env(),
            retry: ConnectRetryPolicy::default(),
        }
    }
}
