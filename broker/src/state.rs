//! Shared broker state: the two maps described in §5, plus config.

use {
    crate::{config::BrokerConfig, pending::PendingTable, registry::Registry},
    std::sync::Arc,
};

pub struct BrokerState {
    pub registry: Registry,
    pub pending: Arc<PendingTable>,
    pub config: BrokerConfig,
}

impl BrokerState {
    pub fn new(config: BrokerConfig) -> Arc<Self> {
        Arc::new(Self {
            registry: Registry::new(),
            pending: Arc::new(PendingTable::new()),
            config,
        })
    }
}
