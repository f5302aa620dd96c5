//! The serving-agent loop: announce, heartbeat via re-signed re-ANNOUNCE,
//! receive INPUT, reply OUTPUT.

use {
    super::{send, unix_now},
    crate::{
        config::ClientConfig,
        error::ClientError,
        identity::Identity,
        wire::{self, Announce, Output},
    },
    futures::StreamExt,
    std::future::Future,
    tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage},
};

/// A serving agent: an identity plus the summary/endpoints it announces
/// with. Owns nothing about what its handler actually does.
pub struct ServingAgent {
    identity: Identity,
    config: ClientConfig,
    summary: String,
    endpoints: Vec<String>,
}

impl ServingAgent {
    pub fn new(identity: Identity, config: ClientConfig, summary: String, endpoints: Vec<String>) -> Self {
        Self {
            identity,
            config,
            summary,
            endpoints,
        }
    }

    fn build_announce(&self) -> Announce {
        Announce::build(&self.identity, unix_now(), self.summary.clone(), self.endpoints.clone())
    }

    /// Run the loop until the connection closes or a fatal transport
    /// error occurs. `handler` is invoked serially, in order of arrival;
    /// pool it yourself if concurrent handling is needed.
    ///
    /// The relay's heartbeat mechanism is a re-signed re-ANNOUNCE, not a
    /// separate HEARTBEAT frame: the timestamp is covered by the
    /// signature, so a stale-but-unsigned ping would tell the broker
    /// nothing a verifier could trust. The wire protocol still defines
    /// HEARTBEAT for other implementations that accept that trade-off.
    pub async fn run<F, Fut>(&self, mut handler: F) -> Result<(), ClientError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = String>,
    {
        let (ws_stream, _) = connect_async(self.config.announce_url()).await?;
        let (mut write, mut read) = ws_stream.split();

        send(&mut write, self.build_announce()).await?;

        loop {
            match tokio::time::timeout(self.config.heartbeat_interval, read.next()).await {
                Ok(Some(Ok(WsMessage::Text(text)))) => match wire::parse_message(text.as_bytes()) {
                    Ok(wire::Message::Input(input)) => {
                        let result = handler(input.prompt.clone()).await;
                        let output = Output::new(input.input_id, result, true);
                        send(&mut write, output).await?;
                    }
                    Ok(wire::Message::Error(err)) => {
                        log::warn!("relay sent error frame: {}", err.error);
                    }
                    Ok(other) => {
                        log::debug!("ignoring unexpected frame on control connection: {other:?}");
                    }
                    Err(e) => {
                        log::warn!("unparseable frame on control connection: {e}");
                    }
                },
                Ok(Some(Ok(WsMessage::Close(_)))) | Ok(None) => return Err(ClientError::ConnectionClosed),
                Ok(Some(Ok(_))) => {}
                Ok(Some(Err(e))) => return Err(e.into()),
                Err(_elapsed) => {
                    send(&mut write, self.build_announce()).await?;
                }
            }
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
