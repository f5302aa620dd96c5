use {crate::prelude::*, relay_core::{config::ClientConfig, identity::Identity}};

#[derive(Debug, Subcommand)]
pub(crate) enum IdentityCommand {
    /// Generate a fresh identity and save it to disk.
    Generate(IdentityDirArgs),
    /// Recover an identity from a previously captured recovery phrase.
    Recover {
        /// The 12-word BIP39 recovery phrase.
        #[arg(long)]
        mnemonic: String,
        #[command(flatten)]
        dir: IdentityDirArgs,
    },
    /// Print the address of the identity saved at `--dir`.
    Show(IdentityDirArgs),
}

#[derive(Debug, Args)]
pub(crate) struct IdentityDirArgs {
    /// Directory the identity's keys are stored under. Defaults to the
    /// platform's standard data directory for this application.
    #[arg(long)]
    pub(crate) dir: Option<PathBuf>,
}

impl IdentityDirArgs {
    fn resolve(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_identity_dir)
    }
}

pub(crate) async fn run(cmd: IdentityCommand) -> AnyResult<(), RelayCliError> {
    match cmd {
        IdentityCommand::Generate(args) => generate(args).await,
        IdentityCommand::Recover { mnemonic, dir } => recover(mnemonic, dir).await,
        IdentityCommand::Show(args) => show(args).await,
    }
}

async fn generate(args: IdentityDirArgs) -> AnyResult<(), RelayCliError> {
    command_title!("Generating a fresh agent identity");

    let identity = Identity::generate();
    identity.save(&args.resolve())?;

    notify_success!("address: {}", identity.address());
    if let Some(phrase) = identity.mnemonic() {
        notify_success!("recovery phrase (write this down, it will not be shown again):");
        println!("{}", phrase.yellow());
    }

    Ok(())
}

async fn recover(mnemonic: String, args: IdentityDirArgs) -> AnyResult<(), RelayCliError> {
    command_title!("Recovering an agent identity");

    let identity = Identity::recover(&mnemonic)?;
    identity.save(&args.resolve())?;

    notify_success!("recovered address: {}", identity.address());
    Ok(())
}

async fn show(args: IdentityDirArgs) -> AnyResult<(), RelayCliError> {
    command_title!("Showing the saved agent identity");

    match Identity::load(&args.resolve())? {
        Some(identity) => {
            let domain = ClientConfig::from_env().email_domain;
            notify_success!("address: {}", identity.address());
            notify_success!("short: {}", identity.address().short());
            notify_success!("email alias: {}", identity.address().email(&domain));
        }
        None => {
            return Err(RelayCliError::Any(anyhow!(
                "no identity found at {}",
                args.resolve().display()
            )));
        }
    }

    Ok(())
}
