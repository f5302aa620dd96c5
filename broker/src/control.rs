//! Control endpoint (`/ws/announce`): one long-lived connection per
//! announced agent.

use {
    crate::{connection::spawn_connection, frame::to_ws, state::BrokerState},
    futures::StreamExt,
    relay_core::{
        error::RelayError,
        identity::Address,
        wire::{self, ErrorFrame},
    },
    std::sync::Arc,
    warp::ws::WebSocket,
};

pub async fn handle(ws: WebSocket, state: Arc<BrokerState>) {
    let (handle, mut stream) = spawn_connection(ws);
    let mut bound: Option<Address> = None;

    while let Some(next) = stream.next().await {
        let frame = match next {
            Ok(f) => f,
            Err(e) => {
                log::debug!("control connection read error: {e}");
                break;
            }
        };
        if frame.is_close() {
            break;
        }
        if !frame.is_text() {
            continue;
        }

        match wire::parse_message(frame.as_bytes()) {
            Err(e) => {
                handle.send(to_ws(ErrorFrame::new(e.to_string(), None)));
            }
            Ok(wire::Message::Announce(announce)) => {
                if !announce.verify() {
                    handle.send(to_ws(ErrorFrame::new(RelayError::BadSignature.to_string(), None)));
                    continue;
                }

                let address = announce.body.address;
                if let Some(previous) = bound {
                    if previous != address {
                        state.registry.remove_if_current(&previous, handle.id());
                    }
                }

                state.registry.announce(
                    address,
                    announce.body.summary.clone(),
                    announce.body.endpoints.clone(),
                    announce.body.timestamp,
                    handle.clone(),
                );
                bound = Some(address);
            }
            Ok(wire::Message::Heartbeat(heartbeat)) => match bound {
                Some(address) if address == heartbeat.address => {
                    state.registry.heartbeat(&address, heartbeat.timestamp);
                }
                _ => {
                    handle.send(to_ws(ErrorFrame::new(RelayError::ProtocolError.to_string(), None)));
                }
            },
            Ok(wire::Message::Output(output)) => {
                if let Some(caller) = state.pending.complete(&output.input_id) {
                    caller.send(to_ws(output));
                } else {
                    log::warn!("OUTPUT for unknown or already-resolved input_id {}", output.input_id);
                }
            }
            Ok(wire::Message::Input(_)) | Ok(wire::Message::Error(_)) => {
                handle.send(to_ws(ErrorFrame::new(RelayError::ProtocolError.to_string(), None)));
            }
        }
    }

    if let Some(address) = bound {
        state.registry.remove_if_current(&address, handle.id());
    }
    handle.close();
}
