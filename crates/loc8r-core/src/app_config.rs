use std::net::SocketAddr;

/// API base used when `NODE_ENV` is `production`.
pub const PRODUCTION_API_BASE: &str = "https://loc8r-api-gayp.onrender.com";

/// API base used for every other environment.
pub const LOCAL_API_BASE: &str = "http://localhost:3000";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Default upstream API base for this environment.
    #[must_use]
    pub fn default_api_base(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_API_BASE,
            Environment::Development | Environment::Test => LOCAL_API_BASE,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Connection string for the backing store. `None` leaves the store
    /// connection manager stopped.
    pub store_uri: Option<String>,
    pub env: Environment,
    pub api_base: String,
    pub google_api_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base", &self.api_base)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_uri", &self.store_uri.as_ref().map(|_| "[redacted]"))
            .field(
                "google_api_key",
                &self.google_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
