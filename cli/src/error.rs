use {
    crate::{display::*, prelude::*},
    thiserror::Error,
};

/// CLI-level errors. Takes care of displaying a colored summary in the
/// console; every other error kind is wrapped with context by the
/// command that raised it.
#[derive(Debug, Error)]
pub(crate) enum RelayCliError {
    #[error("{label}{separator}\n{0}", label = "Identity Error".red().bold(), separator = separator())]
    Identity(#[from] relay_core::error::IdentityError),

    #[error("{label}{separator}\n{0}", label = "Relay Error".red().bold(), separator = separator())]
    Client(#[from] relay_core::error::ClientError),

    #[error("{label}{separator}\n{0}", label = "Error".red().bold(), separator = separator())]
    Any(#[from] anyhow::Error),
}
