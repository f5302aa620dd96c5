mod agent;
mod call;
mod display;
mod error;
mod identity;
mod prelude;
mod serve;

use prelude::*;

#[derive(Debug, Parser)]
#[command(name = "relay", about = "Agent identities, the relay broker, and ad hoc dispatch")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate, recover, or inspect an agent identity.
    Identity {
        #[command(subcommand)]
        command: identity::IdentityCommand,
    },
    /// Run the relay broker.
    Serve,
    /// Run a reference echo agent against a broker.
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },
    /// Dispatch one request to an announced agent and print the result.
    Call(call::CallArgs),
}

#[derive(Debug, Subcommand)]
enum AgentCommand {
    Demo(agent::DemoArgs),
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Identity { command } => identity::run(command).await,
        Command::Serve => serve::run().await,
        Command::Agent {
            command: AgentCommand::Demo(args),
        } => agent::demo(args).await,
        Command::Call(args) => call::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}
