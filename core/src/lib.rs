//! Agent identity, the ANNOUNCE/HEARTBEAT/INPUT/OUTPUT/ERROR wire
//! protocol, and the two endpoint loops (serving agent, calling client)
//! that sit on either side of a relay broker.
//!
//! The broker itself lives in the `relay-broker` crate; this crate has
//! no server-side state and no knowledge of the registry or pending
//! table.

pub mod canonical;
pub mod client;
pub mod config;
pub mod error;
pub mod identity;
pub mod wire;

pub use {
    client::{CallingClient, ServingAgent},
    config::ClientConfig,
    identity::{Address, Identity},
};
