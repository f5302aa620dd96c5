//! End-to-end tests: real `tokio-tungstenite` clients and a real
//! `relay-core` serving agent / calling client, driven against a broker
//! bound to an ephemeral local port.

use {
    futures::{SinkExt, StreamExt},
    relay_broker::{routes, BrokerConfig, BrokerState},
    relay_core::{client::ServingAgent, config::ClientConfig, identity::Identity, wire},
    std::time::Duration,
    tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage},
};

async fn spawn_broker(config: BrokerConfig) -> ClientConfig {
    let port = portpicker::pick_unused_port().expect("no free port available for test");
    let bind_addr = format!("127.0.0.1:{port}");
    let state = BrokerState::new(BrokerConfig { bind_addr: bind_addr.clone(), ..config });
    let addr: std::net::SocketAddr = bind_addr.parse().unwrap();

    tokio::spawn(warp::serve(routes(state)).run(addr));
    // give the listener a moment to bind before tests start connecting.
    tokio::time::sleep(Duration::from_millis(50)).await;

    ClientConfig {
        relay_url: format!("ws://127.0.0.1:{port}"),
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn happy_path_round_trip() {
    let client_config = spawn_broker(BrokerConfig::default()).await;
    let identity = Identity::generate();
    let address = identity.address();

    let agent = ServingAgent::new(identity, client_config.clone(), "echoes input".into(), vec![]);
    tokio::spawn(async move {
        let _ = agent.run(|prompt| async move { format!("echo: {prompt}") }).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let caller = relay_core::client::CallingClient::new(client_config);
    let result = caller.input_async(address, "hello".into()).await.unwrap();
    assert_eq!(result, "echo: hello");
}

#[tokio::test]
async fn dispatch_to_unknown_agent_is_offline() {
    let client_config = spawn_broker(BrokerConfig::default()).await;
    let unknown = Identity::generate().address();

    let caller = relay_core::client::CallingClient::new(client_config);
    let err = caller.input_async(unknown, "hello".into()).await.unwrap_err();
    assert!(matches!(
        err,
        relay_core::error::ClientError::Relay(relay_core::error::RelayError::AgentOffline)
    ));
}

#[tokio::test]
async fn tampered_announce_signature_is_rejected() {
    let client_config = spawn_broker(BrokerConfig::default()).await;
    let identity = Identity::generate();

    let (ws_stream, _) = connect_async(client_config.announce_url()).await.unwrap();
    let (mut write, mut read) = ws_stream.split();

    let mut announce = wire::Announce::build(&identity, 1_700_000_000, "tamper test".into(), vec![]);
    announce.body.summary = "swapped after signing".into();
    let bytes = wire::Message::from(announce).to_json_bytes();
    write.send(WsMessage::text(String::from_utf8(bytes).unwrap())).await.unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(2), read.next())
        .await
        .expect("broker should respond")
        .expect("stream should yield a frame")
        .unwrap();
    let WsMessage::Text(text) = frame else { panic!("expected text frame") };
    let wire::Message::Error(err) = wire::parse_message(text.as_bytes()).unwrap() else {
        panic!("expected an ERROR frame");
    };
    assert_eq!(err.error, "BadSignature");
}

#[tokio::test]
async fn caller_times_out_when_agent_never_answers() {
    let mut config = BrokerConfig::default();
    config.request_deadline = Duration::from_millis(200);
    let client_config = spawn_broker(config).await;

    let identity = Identity::generate();
    let address = identity.address();

    // Announce, but never read/answer an INPUT.
    let (ws_stream, _) = connect_async(client_config.announce_url()).await.unwrap();
    let (mut write, _read) = ws_stream.split();
    let announce = wire::Announce::build(&identity, 1_700_000_000, "never answers".into(), vec![]);
    write
        .send(WsMessage::text(String::from_utf8(wire::Message::from(announce).to_json_bytes()).unwrap()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let caller = relay_core::client::CallingClient::new(client_config);
    let err = caller
        .input_with_timeout(address, "hello".into(), Duration::from_secs(2))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        relay_core::error::ClientError::Relay(relay_core::error::RelayError::Timeout)
    ));
}

#[tokio::test]
async fn heartbeat_keeps_a_quiet_agent_alive() {
    let mut config = BrokerConfig::default();
    config.stale_agent = Duration::from_millis(300);
    config.sweep_interval = Duration::from_millis(100);
    let client_config = spawn_broker(config).await;

    let identity = Identity::generate();
    let address = identity.address();
    let mut agent_config = client_config.clone();
    agent_config.heartbeat_interval = Duration::from_millis(100);

    let agent = ServingAgent::new(identity, agent_config, "stays alive".into(), vec![]);
    tokio::spawn(async move {
        let _ = agent.run(|prompt| async move { prompt }).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Outlive the stale threshold several times over via re-announces.
    tokio::time::sleep(Duration::from_millis(700)).await;

    let caller = relay_core::client::CallingClient::new(client_config);
    let result = caller.input_async(address, "ping".into()).await.unwrap();
    assert_eq!(result, "ping");
}

#[tokio::test]
async fn lookup_find_matches_summary_substring() {
    let client_config = spawn_broker(BrokerConfig::default()).await;
    let identity = Identity::generate();
    let address = identity.address();

    let agent = ServingAgent::new(identity, client_config.clone(), "translates documents".into(), vec![]);
    tokio::spawn(async move {
        let _ = agent.run(|prompt| async move { prompt }).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let (ws_stream, _) = connect_async(client_config.lookup_url()).await.unwrap();
    let (mut write, mut read) = ws_stream.split();
    write
        .send(WsMessage::text(r#"{"op":"FIND","query":"translat"}"#.to_string()))
        .await
        .unwrap();
    let frame = tokio::time::timeout(Duration::from_secs(2), read.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let WsMessage::Text(text) = frame else { panic!("expected text frame") };
    let parsed: Vec<relay_broker::AgentSummary> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].address, address);
}
