use {
    crate::prelude::*,
    relay_core::{client::ServingAgent, config::ClientConfig, identity::Identity},
};

#[derive(Debug, Args)]
pub(crate) struct DemoArgs {
    /// Directory to load (or generate, if absent) the demo agent's
    /// identity from.
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// Run a reference serving agent that echoes every prompt back,
/// prefixed with `"echo: "`. Useful for exercising a broker by hand.
pub(crate) async fn demo(args: DemoArgs) -> AnyResult<(), RelayCliError> {
    command_title!("Running the demo echo agent");

    let dir = args.dir.unwrap_or_else(default_identity_dir);
    let identity = match Identity::load(&dir)? {
        Some(identity) => identity,
        None => {
            let identity = Identity::generate();
            identity.save(&dir)?;
            identity
        }
    };

    notify_success!("address: {}", identity.address());

    let config = ClientConfig::from_env();
    let agent = ServingAgent::new(identity, config, "echoes input".to_string(), vec![]);

    agent.run(|prompt| async move { format!("echo: {prompt}") }).await?;
    Ok(())
}
