use {
    crate::prelude::*,
    relay_core::{client::CallingClient, config::ClientConfig, identity::Address},
    std::str::FromStr,
};

#[derive(Debug, Args)]
pub(crate) struct CallArgs {
    /// Address of the agent to dispatch to.
    to: String,
    /// Prompt text to send.
    prompt: String,
}

pub(crate) async fn run(args: CallArgs) -> AnyResult<(), RelayCliError> {
    command_title!("Dispatching one request");

    let to = Address::from_str(&args.to).map_err(|_| RelayCliError::Any(anyhow!("invalid address: {}", args.to)))?;

    let client = CallingClient::new(ClientConfig::from_env());
    let result = client.input_async(to, args.prompt).await?;

    notify_success!("result: {result}");
    Ok(())
}
