//! The pending-request table: the broker's correlation record for one
//! in-flight caller/agent exchange, keyed by `input_id`.

use {
    crate::connection::ConnectionHandle,
    std::{collections::HashMap, sync::Arc, sync::Mutex, time::Instant},
    thiserror::Error,
    tokio::sync::oneshot,
};

struct PendingRequest {
    caller: ConnectionHandle,
    started_at: Instant,
    /// Fired when the matching OUTPUT has been forwarded, so the
    /// dispatch task waiting on this request knows to close up.
    completed: oneshot::Sender<()>,
}

#[derive(Debug, Error)]
#[error("input_id already has a pending request")]
pub struct DuplicateId;

pub struct PendingTable {
    inner: Mutex<HashMap<String, PendingRequest>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a fresh pending entry, failing if `input_id` already
    /// exists. Returns a guard that removes the entry on drop unless
    /// [`PendingGuard::disarm`] is called first, plus the receiver half
    /// of the completion signal.
    pub fn try_insert(
        self: &Arc<Self>,
        input_id: String,
        caller: ConnectionHandle,
    ) -> Result<(PendingGuard, oneshot::Receiver<()>), DuplicateId> {
        let (tx, rx) = oneshot::channel();
        let mut map = self.inner.lock().expect("pending mutex poisoned");
        if map.contains_key(&input_id) {
            return Err(DuplicateId);
        }
        map.insert(
            input_id.clone(),
            PendingRequest {
                caller,
                started_at: Instant::now(),
                completed: tx,
            },
        );
        Ok((
            PendingGuard {
                table: Arc::clone(self),
                input_id,
                armed: true,
            },
            rx,
        ))
    }

    /// Remove and return the caller handle for `input_id`, firing its
    /// completion signal. Returns `None` if there is no such entry
    /// (unknown, already completed, or evicted) — the caller should
    /// treat that as "silently drop", per the broker's OUTPUT-routing
    /// rule.
    pub fn complete(&self, input_id: &str) -> Option<ConnectionHandle> {
        let mut map = self.inner.lock().expect("pending mutex poisoned");
        let request = map.remove(input_id)?;
        let _ = request.completed.send(());
        Some(request.caller)
    }

    fn remove(&self, input_id: &str) {
        self.inner.lock().expect("pending mutex poisoned").remove(input_id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("pending mutex poisoned").len()
    }

    /// Age of the longest-outstanding entry, for monitoring only;
    /// eviction of pending entries happens per-request via the dispatch
    /// task's own deadline timer, not a sweep.
    pub fn oldest_age(&self) -> Option<std::time::Duration> {
        self.inner
            .lock()
            .expect("pending mutex poisoned")
            .values()
            .map(|r| r.started_at.elapsed())
            .max()
    }
}

impl Default for PendingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes its `input_id` from the table on drop unless disarmed.
/// Mirrors the in-flight-guard idiom used elsewhere in this codebase for
/// "remove unless someone already claimed completion".
pub struct PendingGuard {
    table: Arc<PendingTable>,
    input_id: String,
    armed: bool,
}

impl PendingGuard {
    /// Prevent the guard from removing the entry on drop — used once
    /// [`PendingTable::complete`] has already consumed it.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.armed {
            self.table.remove(&self.input_id);
        }
    }
}
