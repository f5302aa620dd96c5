//! Dispatch endpoint (`/ws/input`): exactly one INPUT in, one OUTPUT or
//! ERROR out, per connection.

use {
    crate::{connection::spawn_connection, frame::to_ws, state::BrokerState},
    futures::StreamExt,
    relay_core::{
        error::RelayError,
        wire::{self, ErrorFrame, Input},
    },
    std::sync::Arc,
    warp::ws::WebSocket,
};

pub async fn handle(ws: WebSocket, state: Arc<BrokerState>) {
    let (handle, mut stream) = spawn_connection(ws);

    let input = match read_input(&mut stream).await {
        Ok(input) => input,
        Err(error) => {
            handle.send(to_ws(ErrorFrame::new(error.to_string(), None)));
            handle.close();
            return;
        }
    };

    let Some(target) = state.registry.handle_for(&input.to) else {
        handle.send(to_ws(ErrorFrame::new(
            RelayError::AgentOffline.to_string(),
            Some(input.input_id.clone()),
        )));
        handle.close();
        return;
    };

    let (guard, done) = match state.pending.try_insert(input.input_id.clone(), handle.clone()) {
        Ok(v) => v,
        Err(_) => {
            handle.send(to_ws(ErrorFrame::new(
                RelayError::DuplicateId.to_string(),
                Some(input.input_id.clone()),
            )));
            handle.close();
            return;
        }
    };

    let forwarded = Input::new(input.input_id.clone(), input.to, input.prompt.clone(), input.from.clone());
    if !target.send(to_ws(forwarded)) {
        drop(guard);
        handle.send(to_ws(ErrorFrame::new(
            RelayError::AgentUnreachable.to_string(),
            Some(input.input_id.clone()),
        )));
        handle.close();
        return;
    }

    tokio::select! {
        _ = done => {
            guard.disarm();
        }
        _ = tokio::time::sleep(state.config.request_deadline) => {
            // Remove before sending ERROR, so a late OUTPUT racing in on
            // the agent's control connection finds nothing and is
            // silently dropped instead of matching a stale entry.
            drop(guard);
            handle.send(to_ws(ErrorFrame::new(
                RelayError::Timeout.to_string(),
                Some(input.input_id.clone()),
            )));
        }
    }

    handle.close();
}

async fn read_input(
    stream: &mut futures::stream::SplitStream<WebSocket>,
) -> Result<Input, RelayError> {
    let Some(next) = stream.next().await else {
        return Err(RelayError::ProtocolError);
    };
    let frame = next.map_err(|_| RelayError::ProtocolError)?;
    if !frame.is_text() {
        return Err(RelayError::ProtocolError);
    }

    match wire::parse_message(frame.as_bytes()) {
        Ok(wire::Message::Input(input)) => Ok(input),
        Ok(_) => Err(RelayError::ProtocolError),
        Err(_) => Err(RelayError::MalformedMessage),
    }
}
