//! Environment-based configuration.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Post-login persistence-barrier delay (see `FixedDelayBarrier`).
    pub persistence_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let persistence_delay = std::env::var("LOGIN_PERSISTENCE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(100));

        Self {
            bind_addr,
            persistence_delay,
        }
    }
}
