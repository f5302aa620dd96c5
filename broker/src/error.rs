//! Broker-internal errors. Per the propagation rules this core follows:
//! wire/protocol errors become ERROR frames and never reach here. What
//! does reach here is startup configuration the broker cannot run with.
//!
//! Invariant violations in the registry's own bookkeeping (a poisoned
//! mutex, a corrupted map) are not modeled as a `BrokerError` variant:
//! they panic at the lock site instead, since there is no way to keep
//! serving requests once that invariant is gone and no caller could
//! recover from a returned error either.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("bind address {0} is invalid")]
    InvalidBindAddress(String),
}
