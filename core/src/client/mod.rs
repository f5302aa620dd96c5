//! Endpoint loops: the serving-agent loop and the calling client.

mod calling;
mod serving;

pub use calling::CallingClient;
pub use serving::ServingAgent;

use {crate::wire, futures::SinkExt, tokio_tungstenite::tungstenite::Message as WsMessage};

fn to_ws_text(msg: impl Into<wire::Message>) -> WsMessage {
    let bytes = msg.into().to_json_bytes();
    WsMessage::text(String::from_utf8(bytes).expect("wire JSON is always valid UTF-8"))
}

async fn send<S>(sink: &mut S, msg: impl Into<wire::Message>) -> Result<(), tokio_tungstenite::tungstenite::Error>
where
    S: futures::Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    sink.send(to_ws_text(msg)).await
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock is after 1970")
        .as_secs()
}
