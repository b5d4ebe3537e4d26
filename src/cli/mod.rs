//! cli
//!
//! Command-line interface layer for git-ghost.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the log subscriber for the requested verbosity
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::ui::output::Verbosity;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(Verbosity::from_count(cli.verbose));

    let sources = cli.config_sources();
    commands::dispatch(cli.command, sources).inspect_err(|err| tracing::trace!("{err:?}"))
}

/// Log to stderr at the level given by `-v`, unless `RUST_LOG` says otherwise.
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();

    // A subscriber may already be installed when running under a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
