use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,
    pub base_url: String,

    // Portal calls
    pub portal_timeout_ms: u64,

    // Misc - browser-style UA; some portals reject obvious bot agents
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env::var("PORT")
                .unwrap_or_else(|_| "7000".to_string())
                .parse()
                .unwrap_or(7000),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:7000".to_string()),

            // Portal calls
            portal_timeout_ms: env::var("PORTAL_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".to_string())
                .parse()
                .unwrap_or(15_000), // 15 seconds

            // Misc
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| "Mozilla/5.0".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
