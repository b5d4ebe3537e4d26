//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Turns positional hashes and flags into engine options
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT run git directly.

mod completion;
mod delete;
mod list;
mod pull;
mod push;
mod show;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use delete::delete;
pub use list::list;
pub use pull::pull;
pub use push::push;
pub use show::show;

use crate::cli::args::Command;
use crate::core::config::{Config, ConfigSources};
use crate::git::command as git;
use anyhow::{Context as _, Result};

/// Base used wherever a FROM argument is omitted.
pub(crate) const DEFAULT_FROM: &str = "HEAD";

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, sources: ConfigSources) -> Result<()> {
    match command {
        Command::Completion { shell } => completion(shell),
        Command::Push(args) => push(args, &load_config(sources)?),
        Command::Pull(args) => pull(args, &load_config(sources)?),
        Command::Show(args) => show(args, &load_config(sources)?),
        Command::List(args) => list(args, &load_config(sources)?),
        Command::Delete(args) => delete(args, &load_config(sources)?),
    }
}

/// Check that git is usable and resolve configuration.
fn load_config(sources: ConfigSources) -> Result<Config> {
    let version = git::version().context("git is required but could not be run")?;
    tracing::debug!(%version, "found git");
    let config = Config::resolve(sources).context("Invalid configuration")?;
    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}
