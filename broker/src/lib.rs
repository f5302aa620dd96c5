//! The relay broker: registry, pending-request correlation, liveness
//! sweeping, and the three WebSocket endpoint protocols that sit in
//! front of them.
//!
//! Agent identity and the wire codec live in `relay-core`; this crate
//! is the server side that holds state across connections.

mod config;
mod connection;
mod control;
mod dispatch;
mod error;
mod frame;
mod lookup;
mod pending;
mod registry;
mod server;
mod state;
mod sweeper;

pub mod http;

pub use {
    config::BrokerConfig,
    error::BrokerError,
    registry::AgentSummary,
    server::{routes, serve},
    state::BrokerState,
};
