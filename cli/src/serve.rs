use {crate::prelude::*, relay_broker::BrokerConfig};

pub(crate) async fn run() -> AnyResult<(), RelayCliError> {
    command_title!("Starting the relay broker");

    let config = BrokerConfig::from_env();
    notify_success!("binding {}", config.bind_addr);

    let state = relay_broker::BrokerState::new(config);
    relay_broker::serve(state).await.map_err(RelayCliError::Any)
}
