//! Background liveness sweep: evicts any Announce Record whose
//! `last_announce_ts` has exceeded the stale threshold. Heartbeats
//! count as announces (the registry folds both into the same
//! timestamp), so a steadily-heartbeating agent is never swept.

use {crate::state::BrokerState, std::sync::Arc};

pub async fn run(state: Arc<BrokerState>) {
    let mut ticker = tokio::time::interval(state.config.sweep_interval);
    ticker.tick().await; // first tick fires immediately; skip it

    loop {
        ticker.tick().await;
        let evicted = state.registry.evict_stale(state.config.stale_agent);
        if !evicted.is_empty() {
            log::info!("sweeper evicted {} stale agent(s)", evicted.len());
        }
    }
}
