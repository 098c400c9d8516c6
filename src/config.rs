//! Environment configuration: provider keys, bind address, config paths.
//! Loaded once at startup into an immutable snapshot.

use std::net::SocketAddr;

pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_NEWSDATA_API_KEY: &str = "NEWSDATA_API_KEY";
pub const ENV_BIND_ADDR: &str = "FLOODGUARD_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Default map center when the client omits coordinates (India centroid,
/// matching the dashboard's initial view).
pub const DEFAULT_LAT: f64 = 20.5937;
pub const DEFAULT_LON: f64 = 78.9629;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openweather_api_key: Option<String>,
    pub newsdata_api_key: Option<String>,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Snapshot the environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Self {
        Self {
            openweather_api_key: non_empty_env(ENV_OPENWEATHER_API_KEY),
            newsdata_api_key: non_empty_env(ENV_NEWSDATA_API_KEY),
            bind_addr: parse_bind_env(std::env::var(ENV_BIND_ADDR).ok()),
        }
    }

    pub fn weather_api_configured(&self) -> bool {
        self.openweather_api_key.is_some()
    }

    pub fn news_api_configured(&self) -> bool {
        self.newsdata_api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openweather_api_key: None,
            newsdata_api_key: None,
            bind_addr: parse_bind_env(None),
        }
    }
}

/// Treat unset and blank the same; keys pasted with stray whitespace happen.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the bind address, falling back to the default on anything odd.
fn parse_bind_env(raw: Option<String>) -> SocketAddr {
    raw.and_then(|s| s.trim().parse::<SocketAddr>().ok())
        .unwrap_or_else(|| {
            DEFAULT_BIND_ADDR
                .parse()
                .expect("default bind addr parses")
        })
}
