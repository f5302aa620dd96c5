//! The registry: the broker's live view of announced agents, keyed by
//! address. Single lock, O(1) critical sections per §5.

use {
    crate::connection::ConnectionHandle,
    relay_core::Address,
    serde::{Deserialize, Serialize},
    std::{
        collections::HashMap,
        sync::Mutex,
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

struct AnnounceRecord {
    summary: String,
    endpoints: Vec<String>,
    last_announce_ts: u64,
    last_heartbeat_ts: u64,
    handle: ConnectionHandle,
}

/// A registry entry as exposed outside this module: no connection
/// handle, just the data a lookup caller or monitoring endpoint cares
/// about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSummary {
    pub address: Address,
    pub summary: String,
    pub endpoints: Vec<String>,
    pub last_announce_ts: u64,
    pub last_heartbeat_ts: u64,
}

impl AgentSummary {
    fn from_record(address: Address, record: &AnnounceRecord) -> Self {
        Self {
            address,
            summary: record.summary.clone(),
            endpoints: record.endpoints.clone(),
            last_announce_ts: record.last_announce_ts,
            last_heartbeat_ts: record.last_heartbeat_ts,
        }
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

pub struct Registry {
    inner: Mutex<HashMap<Address, AnnounceRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Create or refresh the record for `address`. If a different,
    /// still-live connection already holds this address, it is closed:
    /// the newest ANNOUNCE always wins, atomically evicting the
    /// predecessor rather than leaving it orphaned (see DESIGN.md).
    pub fn announce(
        &self,
        address: Address,
        summary: String,
        endpoints: Vec<String>,
        timestamp: u64,
        handle: ConnectionHandle,
    ) {
        let mut map = self.inner.lock().expect("registry mutex poisoned");
        if let Some(existing) = map.get(&address) {
            if existing.handle.id() != handle.id() {
                existing.handle.close();
            }
        }
        map.insert(
            address,
            AnnounceRecord {
                summary,
                endpoints,
                last_announce_ts: timestamp,
                last_heartbeat_ts: timestamp,
                handle,
            },
        );
    }

    /// Update `last_heartbeat_ts` for a bound address. Returns `false`
    /// if the address has no live record (e.g. evicted concurrently).
    ///
    /// Heartbeats count as announces for liveness purposes (§4.3):
    /// `last_announce_ts` is folded forward alongside `last_heartbeat_ts`
    /// so `evict_stale` and the ordering in `find`/`list_all` see the
    /// heartbeat too.
    pub fn heartbeat(&self, address: &Address, timestamp: u64) -> bool {
        let mut map = self.inner.lock().expect("registry mutex poisoned");
        match map.get_mut(address) {
            Some(record) => {
                record.last_heartbeat_ts = record.last_heartbeat_ts.max(timestamp);
                record.last_announce_ts = record.last_announce_ts.max(timestamp);
                true
            }
            None => false,
        }
    }

    /// Remove `address` only if its current connection id is still
    /// `conn_id` — guards against a closing connection clobbering a
    /// newer one that has since taken over the same address.
    pub fn remove_if_current(&self, address: &Address, conn_id: u64) {
        let mut map = self.inner.lock().expect("registry mutex poisoned");
        if let Some(existing) = map.get(address) {
            if existing.handle.id() == conn_id {
                map.remove(address);
            }
        }
    }

    pub fn handle_for(&self, address: &Address) -> Option<ConnectionHandle> {
        let map = self.inner.lock().expect("registry mutex poisoned");
        map.get(address).map(|r| r.handle.clone())
    }

    pub fn get(&self, address: &Address) -> Option<AgentSummary> {
        let map = self.inner.lock().expect("registry mutex poisoned");
        map.get(address).map(|r| AgentSummary::from_record(*address, r))
    }

    /// Up to `limit` records whose summary contains `query`
    /// case-insensitively, ordered most-recently-announced first.
    pub fn find(&self, query: &str, limit: usize) -> Vec<AgentSummary> {
        let needle = query.to_lowercase();
        let map = self.inner.lock().expect("registry mutex poisoned");
        let mut matches: Vec<_> = map
            .iter()
            .filter(|(_, r)| r.summary.to_lowercase().contains(&needle))
            .map(|(addr, r)| AgentSummary::from_record(*addr, r))
            .collect();
        matches.sort_by(|a, b| b.last_announce_ts.cmp(&a.last_announce_ts));
        matches.truncate(limit);
        matches
    }

    /// Capped snapshot of every bound address, most-recently-announced
    /// first.
    pub fn list_all(&self, limit: usize) -> Vec<AgentSummary> {
        let map = self.inner.lock().expect("registry mutex poisoned");
        let mut all: Vec<_> = map
            .iter()
            .map(|(addr, r)| AgentSummary::from_record(*addr, r))
            .collect();
        all.sort_by(|a, b| b.last_announce_ts.cmp(&a.last_announce_ts));
        all.truncate(limit);
        all
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("registry mutex poisoned").len()
    }

    /// Evict every record whose `last_announce_ts` is older than
    /// `stale_after`, closing each evicted connection. Releases and
    /// reacquires the lock between evictions per §5.
    pub fn evict_stale(&self, stale_after: Duration) -> Vec<Address> {
        let threshold = unix_now().saturating_sub(stale_after.as_secs());
        let stale: Vec<Address> = {
            let map = self.inner.lock().expect("registry mutex poisoned");
            map.iter()
                .filter(|(_, r)| r.last_announce_ts < threshold)
                .map(|(addr, _)| *addr)
                .collect()
        };

        let mut evicted = Vec::with_capacity(stale.len());
        for address in stale {
            let mut map = self.inner.lock().expect("registry mutex poisoned");
            if let Some(record) = map.remove(&address) {
                record.handle.close();
                evicted.push(address);
            }
        }
        evicted
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
