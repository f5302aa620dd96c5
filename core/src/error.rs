//! Error kinds shared by identity, wire codec, and endpoint loops.

use thiserror::Error;

/// Errors raised by the identity module (generation, recovery, disk I/O).
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("recovery phrase failed BIP39 checksum validation")]
    InvalidMnemonic,

    #[error("key file at {path} is {len} bytes, expected 32")]
    CorruptKey { path: String, len: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building, parsing, or verifying wire messages.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("unknown message type {0:?}")]
    UnknownType(String),

    #[error("ANNOUNCE signature does not verify")]
    BadSignature,
}

/// Errors surfaced to a caller of the relay (conceptually, the `error`
/// string carried on an ERROR frame). `Display` renders the exact token
/// expected on the wire.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("AgentOffline")]
    AgentOffline,
    #[error("AgentUnreachable")]
    AgentUnreachable,
    #[error("DuplicateId")]
    DuplicateId,
    #[error("Timeout")]
    Timeout,
    #[error("ProtocolError")]
    ProtocolError,
    #[error("BadSignature")]
    BadSignature,
    #[error("MalformedMessage")]
    MalformedMessage,
    #[error("UnknownType")]
    UnknownType,
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Parse the wire token back into a typed variant, falling back to
    /// `Other` for anything not in the known set.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "AgentOffline" => Self::AgentOffline,
            "AgentUnreachable" => Self::AgentUnreachable,
            "DuplicateId" => Self::DuplicateId,
            "Timeout" => Self::Timeout,
            "ProtocolError" => Self::ProtocolError,
            "BadSignature" => Self::BadSignature,
            "MalformedMessage" => Self::MalformedMessage,
            "UnknownType" => Self::UnknownType,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Errors raised by the endpoint loops (serving-agent loop, calling client).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("relay returned an error: {0}")]
    Relay(RelayError),

    #[error("socket closed before a response arrived")]
    ConnectionClosed,
}
