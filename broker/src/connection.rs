//! A connection handle is a cheap, `Clone`, `Send` proxy for "write a
//! frame to this websocket, or close it" that can be stashed in the
//! registry or a pending entry and used from a different task than the
//! one reading the socket.
//!
//! Every handed-out connection spawns one writer task that owns the
//! actual `SplitSink` and drains a command channel into it; all other
//! tasks only ever see the `ConnectionHandle` (sender half).

use {
    futures::{stream::SplitSink, SinkExt, StreamExt},
    std::sync::atomic::{AtomicU64, Ordering},
    tokio::sync::mpsc,
    warp::ws::{Message, WebSocket},
};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

pub fn next_connection_id() -> u64 {
    NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed)
}

enum Command {
    Send(Message),
    Close,
}

/// A handle to one open websocket connection's write side.
#[derive(Clone)]
pub struct ConnectionHandle {
    id: u64,
    tx: mpsc::UnboundedSender<Command>,
}

impl ConnectionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Enqueue a frame for delivery. Returns `false` if the connection's
    /// writer task has already exited (socket gone); this is never an
    /// error the caller needs to propagate, only a signal.
    pub fn send(&self, msg: Message) -> bool {
        self.tx.send(Command::Send(msg)).is_ok()
    }

    /// Ask the connection to close. Idempotent; a connection that is
    /// already gone silently ignores this.
    pub fn close(&self) {
        let _ = self.tx.send(Command::Close);
    }
}

/// Split a websocket, spawn its writer task, and return the connection's
/// handle alongside the read half for the caller to drive.
pub fn spawn_connection(ws: WebSocket) -> (ConnectionHandle, futures::stream::SplitStream<WebSocket>) {
    let (sink, stream) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let id = next_connection_id();

    tokio::spawn(run_writer(sink, rx));

    (ConnectionHandle { id, tx }, stream)
}

async fn run_writer(mut sink: SplitSink<WebSocket, Message>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            Command::Send(msg) => {
                if sink.send(msg).await.is_err() {
                    break;
                }
            }
            Command::Close => {
                let _ = sink.close().await;
                break;
            }
        }
    }
}
