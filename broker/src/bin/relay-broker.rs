use relay_broker::{serve, BrokerConfig, BrokerState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let state = BrokerState::new(BrokerConfig::from_env());
    serve(state).await
}
