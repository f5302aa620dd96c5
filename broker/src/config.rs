//! Broker-side configuration, loaded the same way as the client config
//! in `relay-core`: env vars with defaults, no file, no hot reload.

use std::time::Duration;

pub const ENV_BIND_ADDR: &str = "RELAY_BIND_ADDR";
pub const ENV_STALE_AGENT_SEC: &str = "STALE_AGENT_SEC";
pub const ENV_REQUEST_DEADLINE_SEC: &str = "REQUEST_DEADLINE_SEC";
pub const ENV_SWEEP_INTERVAL_SEC: &str = "SWEEP_INTERVAL_SEC";
pub const ENV_LOOKUP_LIMIT: &str = "LOOKUP_LIMIT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8765";
const DEFAULT_STALE_AGENT_SEC: u64 = 120;
const DEFAULT_REQUEST_DEADLINE_SEC: u64 = 300;
const DEFAULT_SWEEP_INTERVAL_SEC: u64 = 30;
const DEFAULT_LOOKUP_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub bind_addr: String,
    /// `last_announce_ts` age after which the sweeper evicts an agent.
    pub stale_agent: Duration,
    /// How long a dispatch task waits for OUTPUT before timing out.
    pub request_deadline: Duration,
    /// Sweeper cadence.
    pub sweep_interval: Duration,
    /// Default cap on FIND/LIST_ALL results.
    pub lookup_limit: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            stale_agent: Duration::from_secs(DEFAULT_STALE_AGENT_SEC),
            request_deadline: Duration::from_secs(DEFAULT_REQUEST_DEADLINE_SEC),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SEC),
            lookup_limit: DEFAULT_LOOKUP_LIMIT,
        }
    }
}

impl BrokerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var(ENV_BIND_ADDR).unwrap_or(defaults.bind_addr),
            stale_agent: std::env::var(ENV_STALE_AGENT_SEC)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.stale_agent),
            request_deadline: std::env::var(ENV_REQUEST_DEADLINE_SEC)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_deadline),
            sweep_interval: std::env::var(ENV_SWEEP_INTERVAL_SEC)
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            lookup_limit: std::env::var(ENV_LOOKUP_LIMIT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lookup_limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = BrokerConfig::default();
        assert_eq!(config.stale_agent, Duration::from_secs(120));
        assert_eq!(config.request_deadline, Duration::from_secs(300));
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert_eq!(config.lookup_limit, 10);
    }
}
