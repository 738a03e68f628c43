use std::time::Duration;

use crate::types::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
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
    pub env: Environment,
    pub log_level: String,
    /// POST endpoint of the places-search proxy.
    pub proxy_url: String,
    /// Coordinate used whenever the device location cannot be obtained.
    pub fallback_location: Location,
    /// Backstop timer racing the device location signal.
    pub location_timeout_ms: u64,
    /// Timeout handed to the device source itself.
    pub device_timeout_ms: u64,
    pub search_timeout_secs: u64,
    pub user_agent: String,
    /// Result window size `N`.
    pub max_results: usize,
    pub geoip_url: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    #[must_use]
    pub fn device_timeout(&self) -> Duration {
        Duration::from_millis(self.device_timeout_ms)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("proxy_url", &redact_query(&self.proxy_url))
            .field("fallback_location", &self.fallback_location)
            .field("location_timeout_ms", &self.location_timeout_ms)
            .field("device_timeout_ms", &self.device_timeout_ms)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_results", &self.max_results)
            .field("geoip_url", &self.geoip_url.as_deref().map(redact_query))
            .finish()
    }
}

/// Proxy URLs may carry an access token in the query string.
fn redact_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?[redacted]"),
        None => url.to_string(),
    }
}
