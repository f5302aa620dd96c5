//! Environment-driven configuration for relay clients.
//!
//! Mirrors the env-var-with-defaults loading style used elsewhere in
//! this codebase's ambient config layer, minus the file-watching
//! machinery: none of these values benefit from being hot-reloaded, so
//! a one-shot `from_env` is all this module does.

use std::time::Duration;

pub const ENV_RELAY_URL: &str = "RELAY_URL";
pub const ENV_EMAIL_DOMAIN: &str = "EMAIL_DOMAIN";
pub const ENV_HEARTBEAT_INTERVAL_SEC: &str = "HEARTBEAT_INTERVAL_SEC";
pub const ENV_REQUEST_DEADLINE_SEC: &str = "REQUEST_DEADLINE_SEC";

const DEFAULT_RELAY_URL: &str = "ws://127.0.0.1:8765";
const DEFAULT_EMAIL_DOMAIN: &str = "agents.local";
const DEFAULT_HEARTBEAT_INTERVAL_SEC: u64 = 60;
const DEFAULT_REQUEST_DEADLINE_SEC: u64 = 300;

/// Client-side configuration: where to find the relay, and the two
/// timing knobs that govern the endpoint loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base WebSocket URL of the relay, e.g. `ws://host:port`. Endpoint
    /// paths (`/ws/announce`, `/ws/input`, `/ws/lookup`) are appended by
    /// callers.
    pub relay_url: String,
    pub email_domain: String,
    pub heartbeat_interval: Duration,
    pub request_deadline: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SEC),
            request_deadline: Duration::from_secs(DEFAULT_REQUEST_DEADLINE_SEC),
        }
    }
}

impl ClientConfig {
    /// Load from the environment, falling back to defaults for unset or
    /// unparseable variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            relay_url: std::env::var(ENV_RELAY_URL).unwrap_or(defaults.relay_url),
            email_domain: std::env::var(ENV_EMAIL_DOMAIN).unwrap_or(defaults.email_domain),
            heartbeat_interval: std::env::var(ENV_HEARTBEAT_INTERVAL_SEC)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.heartbeat_interval),
            request_deadline: std::env::var(ENV_REQUEST_DEADLINE_SEC)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_deadline),
        }
    }

    pub fn announce_url(&self) -> String {
        format!("{}/ws/announce", self.relay_url)
    }

    pub fn input_url(&self) -> String {
        format!("{}/ws/input", self.relay_url)
    }

    pub fn lookup_url(&self) -> String {
        format!("{}/ws/lookup", self.relay_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = ClientConfig::default();
        assert_eq!(config.relay_url, "ws://127.0.0.1:8765");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
        assert_eq!(config.request_deadline, Duration::from_secs(300));
    }

    #[test]
    fn derives_endpoint_urls_from_base() {
        let config = ClientConfig {
            relay_url: "ws://example.com:9000".into(),
            ..ClientConfig::default()
        };
        assert_eq!(config.announce_url(), "ws://example.com:9000/ws/announce");
        assert_eq!(config.input_url(), "ws://example.com:9000/ws/input");
        assert_eq!(config.lookup_url(), "ws://example.com:9000/ws/lookup");
    }
}
