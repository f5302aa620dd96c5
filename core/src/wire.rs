//! The ANNOUNCE/HEARTBEAT/INPUT/OUTPUT/ERROR wire protocol: message
//! shapes, canonical-form signing, and the parsing policy that turns
//! malformed input into typed errors instead of panics.

use {
    crate::{
        canonical::to_canonical_bytes,
        error::WireError,
        identity::{self, Address, Identity},
    },
    serde::{Deserialize, Serialize},
};

fn default_true() -> bool {
    true
}

/// The part of an ANNOUNCE that is covered by the signature. `type` is
/// included deliberately: it is a required field of the signed payload,
/// not metadata layered on top of it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnounceBody {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub address: Address,
    pub timestamp: u64,
    pub summary: String,
    pub endpoints: Vec<String>,
}

/// A signed ANNOUNCE/re-ANNOUNCE frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announce {
    #[serde(flatten)]
    pub body: AnnounceBody,
    pub signature: String,
}

impl Announce {
    /// Build and sign a fresh ANNOUNCE at `timestamp` (unix seconds).
    pub fn build(identity: &Identity, timestamp: u64, summary: String, endpoints: Vec<String>) -> Self {
        let body = AnnounceBody {
            msg_type: "ANNOUNCE".to_string(),
            address: identity.address(),
            timestamp,
            summary,
            endpoints,
        };
        let signature = sign_announce_body(identity, &body);
        Self { body, signature }
    }

    /// Re-verify the signature against the address embedded in the body.
    /// Returns `false` (never errors) on any mismatch.
    pub fn verify(&self) -> bool {
        let Ok(bytes) = to_canonical_bytes(&self.body) else {
            return false;
        };
        let Ok(sig_bytes) = hex::decode(&self.signature) else {
            return false;
        };
        identity::verify(&self.body.address, &bytes, &sig_bytes)
    }
}

fn sign_announce_body(identity: &Identity, body: &AnnounceBody) -> String {
    let bytes = to_canonical_bytes(body).expect("AnnounceBody is always serializable");
    hex::encode(identity.sign(&bytes))
}

/// Unsigned liveness ping. Only accepted over a connection whose initial
/// ANNOUNCE already verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub address: Address,
    pub timestamp: u64,
}

impl Heartbeat {
    pub fn new(address: Address, timestamp: u64) -> Self {
        Self {
            msg_type: "HEARTBEAT".to_string(),
            address,
            timestamp,
        }
    }
}

/// A task request travelling caller -> relay -> agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Input {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub input_id: String,
    pub to: Address,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Input {
    pub fn new(input_id: String, to: Address, prompt: String, from: Option<String>) -> Self {
        Self {
            msg_type: "INPUT".to_string(),
            input_id,
            to,
            prompt,
            from,
        }
    }
}

/// A task result travelling agent -> relay -> caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub input_id: String,
    pub result: String,
    #[serde(default = "default_true")]
    pub success: bool,
}

impl Output {
    pub fn new(input_id: String, result: String, success: bool) -> Self {
        Self {
            msg_type: "OUTPUT".to_string(),
            input_id,
            result,
            success,
        }
    }
}

/// An error frame, sent by the relay to either side. May optionally
/// correlate to an in-flight `input_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorFrame {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_id: Option<String>,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>, input_id: Option<String>) -> Self {
        Self {
            msg_type: "ERROR".to_string(),
            error: error.into(),
            input_id,
        }
    }
}

/// A parsed, dispatch-ready wire message.
#[derive(Debug, Clone)]
pub enum Message {
    Announce(Announce),
    Heartbeat(Heartbeat),
    Input(Input),
    Output(Output),
    Error(ErrorFrame),
}

impl Message {
    pub fn to_json_bytes(&self) -> Vec<u8> {
        let value = match self {
            Message::Announce(m) => serde_json::to_vec(m),
            Message::Heartbeat(m) => serde_json::to_vec(m),
            Message::Input(m) => serde_json::to_vec(m),
            Message::Output(m) => serde_json::to_vec(m),
            Message::Error(m) => serde_json::to_vec(m),
        };
        value.expect("wire messages are always serializable")
    }
}

impl From<Announce> for Message {
    fn from(m: Announce) -> Self {
        Message::Announce(m)
    }
}
impl From<Heartbeat> for Message {
    fn from(m: Heartbeat) -> Self {
        Message::Heartbeat(m)
    }
}
impl From<Input> for Message {
    fn from(m: Input) -> Self {
        Message::Input(m)
    }
}
impl From<Output> for Message {
    fn from(m: Output) -> Self {
        Message::Output(m)
    }
}
impl From<ErrorFrame> for Message {
    fn from(m: ErrorFrame) -> Self {
        Message::Error(m)
    }
}

/// Parse policy: malformed JSON or a missing `type` is `MalformedMessage`;
/// a `type` outside the known set is `UnknownType`; a known type missing
/// one of its required fields is also `MalformedMessage`.
pub fn parse_message(bytes: &[u8]) -> Result<Message, WireError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| WireError::MalformedMessage(e.to_string()))?;

    let msg_type = value
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| WireError::MalformedMessage("missing `type` field".to_string()))?
        .to_string();

    let from_value = |v: serde_json::Value| serde_json::from_value(v).map_err(|e| WireError::MalformedMessage(e.to_string()));

    match msg_type.as_str() {
        "ANNOUNCE" => from_value::<Announce>(value).map(Message::Announce),
        "HEARTBEAT" => from_value::<Heartbeat>(value).map(Message::Heartbeat),
        "INPUT" => from_value::<Input>(value).map(Message::Input),
        "OUTPUT" => from_value::<Output>(value).map(Message::Output),
        "ERROR" => from_value::<ErrorFrame>(value).map(Message::Error),
        other => Err(WireError::UnknownType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_signed_by_owner_verifies() {
        let identity = Identity::generate();
        let announce = Announce::build(&identity, 1_700_000_000, "echoes input".into(), vec![]);
        assert!(announce.verify());
    }

    #[test]
    fn announce_with_tampered_summary_fails_verification() {
        let identity = Identity::generate();
        let mut announce = Announce::build(&identity, 1_700_000_000, "echoes input".into(), vec![]);
        announce.body.summary = "something else".into();
        assert!(!announce.verify());
    }

    #[test]
    fn announce_signed_by_non_owner_fails_verification() {
        let signer = Identity::generate();
        let impostor = Identity::generate();
        let mut announce = Announce::build(&signer, 1_700_000_000, "hi".into(), vec![]);
        announce.body.address = impostor.address();
        assert!(!announce.verify());
    }

    #[test]
    fn canonical_round_trip_is_stable() {
        let identity = Identity::generate();
        let announce = Announce::build(&identity, 42, "s".into(), vec!["a".into(), "b".into()]);
        let bytes = Message::from(announce.clone()).to_json_bytes();
        let reparsed = parse_message(&bytes).unwrap();
        let Message::Announce(reparsed) = reparsed else {
            panic!("expected announce");
        };
        assert!(reparsed.verify());
        assert_eq!(reparsed.body, announce.body);
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(matches!(
            parse_message(b"not json"),
            Err(WireError::MalformedMessage(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_type() {
        assert!(matches!(
            parse_message(br#"{"type":"PING"}"#),
            Err(WireError::UnknownType(t)) if t == "PING"
        ));
    }

    #[test]
    fn parse_rejects_missing_required_field() {
        assert!(matches!(
            parse_message(br#"{"type":"INPUT","input_id":"u1"}"#),
            Err(WireError::MalformedMessage(_))
        ));
    }

    #[test]
    fn output_success_defaults_to_true() {
        let parsed = parse_message(br#"{"type":"OUTPUT","input_id":"u1","result":"hi"}"#).unwrap();
        let Message::Output(out) = parsed else {
            panic!("expected output");
        };
        assert!(out.success);
    }
}
