//! Converts an outbound wire message into a `warp` websocket frame.

pub fn to_ws(msg: impl Into<relay_core::wire::Message>) -> warp::ws::Message {
    let bytes = msg.into().to_json_bytes();
    warp::ws::Message::text(String::from_utf8(bytes).expect("wire JSON is always valid UTF-8"))
}
