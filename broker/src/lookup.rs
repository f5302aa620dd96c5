//! Lookup endpoint (`/ws/lookup`): one discovery request, one response,
//! then close.
//!
//! The spec defines the three operations (`GET_AGENT`, `FIND`,
//! `LIST_ALL`) but not their wire shape, since discovery sits outside
//! the signed ANNOUNCE/INPUT/OUTPUT protocol. This module picks a
//! tagged-JSON request and a bare JSON response, matching the "one
//! frame in, one frame out" shape of the dispatch endpoint.

use {
    crate::{connection::spawn_connection, frame::to_ws, registry::AgentSummary, state::BrokerState},
    futures::StreamExt,
    relay_core::{identity::Address, wire::ErrorFrame},
    serde::{Deserialize, Serialize},
    std::sync::Arc,
    warp::ws::WebSocket,
};

#[derive(Debug, Deserialize)]
#[serde(tag = "op")]
enum LookupRequest {
    #[serde(rename = "GET_AGENT")]
    GetAgent { address: Address },
    #[serde(rename = "FIND")]
    Find {
        query: String,
        #[serde(default)]
        limit: Option<usize>,
    },
    #[serde(rename = "LIST_ALL")]
    ListAll {
        #[serde(default)]
        limit: Option<usize>,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum LookupResponse {
    One(Option<AgentSummary>),
    Many(Vec<AgentSummary>),
}

pub async fn handle(ws: WebSocket, state: Arc<BrokerState>) {
    let (handle, mut stream) = spawn_connection(ws);

    if let Some(Ok(frame)) = stream.next().await {
        if frame.is_text() {
            match serde_json::from_slice::<LookupRequest>(frame.as_bytes()) {
                Ok(LookupRequest::GetAgent { address }) => {
                    let record = state.registry.get(&address);
                    handle.send(json_message(&LookupResponse::One(record)));
                }
                Ok(LookupRequest::Find { query, limit }) => {
                    let limit = limit.unwrap_or(state.config.lookup_limit);
                    let records = state.registry.find(&query, limit);
                    handle.send(json_message(&LookupResponse::Many(records)));
                }
                Ok(LookupRequest::ListAll { limit }) => {
                    let limit = limit.unwrap_or(state.config.lookup_limit);
                    let records = state.registry.list_all(limit);
                    handle.send(json_message(&LookupResponse::Many(records)));
                }
                Err(e) => {
                    handle.send(to_ws(ErrorFrame::new(format!("MalformedMessage: {e}"), None)));
                }
            }
        } else {
            handle.send(to_ws(ErrorFrame::new("MalformedMessage", None)));
        }
    }

    handle.close();
}

fn json_message(value: &LookupResponse) -> warp::ws::Message {
    warp::ws::Message::text(serde_json::to_string(value).expect("LookupResponse always serializes"))
}
