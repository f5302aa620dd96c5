//! The calling client: a short-lived dispatch-endpoint session that
//! sends one INPUT and awaits its matching OUTPUT or an ERROR.

use {
    super::send,
    crate::{
        config::ClientConfig,
        error::{ClientError, RelayError},
        identity::Address,
        wire::{self, Input},
    },
    futures::StreamExt,
    std::time::Duration,
    tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage},
};

/// A synchronous-feeling façade over one dispatch exchange. Each call to
/// [`CallingClient::input`]/[`input_async`](Self::input_async) opens a
/// fresh connection, per the relay's one-exchange-per-connection design.
pub struct CallingClient {
    config: ClientConfig,
}

impl CallingClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Dispatch `prompt` to `to` and block the current thread for the
    /// result, using a dedicated single-threaded Tokio runtime. Intended
    /// for callers that are not themselves async.
    pub fn input(&self, to: Address, prompt: String) -> Result<String, ClientError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to start a runtime for the synchronous calling client");
        runtime.block_on(self.input_async(to, prompt))
    }

    /// Async form of [`Self::input`], using the configured request
    /// deadline as the per-call timeout.
    pub async fn input_async(&self, to: Address, prompt: String) -> Result<String, ClientError> {
        self.input_with_timeout(to, prompt, self.config.request_deadline).await
    }

    /// Async form with an explicit timeout, overriding the configured
    /// default.
    pub async fn input_with_timeout(
        &self,
        to: Address,
        prompt: String,
        timeout: Duration,
    ) -> Result<String, ClientError> {
        let (ws_stream, _) = connect_async(self.config.input_url()).await?;
        let (mut write, mut read) = ws_stream.split();

        let input_id = uuid::Uuid::new_v4().to_string();
        let input = Input::new(input_id.clone(), to, prompt, None);
        send(&mut write, input).await?;

        let next_frame = tokio::time::timeout(timeout, read.next()).await;

        let frame = match next_frame {
            Ok(Some(Ok(WsMessage::Text(text)))) => text,
            Ok(Some(Ok(WsMessage::Close(_)))) | Ok(None) => return Err(ClientError::ConnectionClosed),
            Ok(Some(Ok(_))) => return Err(ClientError::Relay(RelayError::ProtocolError)),
            Ok(Some(Err(e))) => return Err(e.into()),
            Err(_elapsed) => return Err(ClientError::Relay(RelayError::Timeout)),
        };

        match wire::parse_message(frame.as_bytes())? {
            wire::Message::Output(output) if output.input_id == input_id => Ok(output.result),
            wire::Message::Error(err) => Err(ClientError::Relay(RelayError::from_wire(&err.error))),
            _ => Err(ClientError::Relay(RelayError::ProtocolError)),
        }
    }
}
