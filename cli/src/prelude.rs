pub(crate) use {
    crate::{command_title, error::RelayCliError, notify_success},
    anyhow::{anyhow, Result as AnyResult},
    clap::{Args, Parser, Subcommand},
    colored::Colorize,
    std::path::PathBuf,
};

/// Default directory an identity is generated into or loaded from when
/// `--dir` is not given.
pub(crate) fn default_identity_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agent-relay")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".agent-relay"))
}
