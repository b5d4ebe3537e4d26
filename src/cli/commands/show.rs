//! show command - Print the patch carried by ghost branches

use std::io::Write;

use crate::cli::args::ShowArgs;
use crate::core::config::Config;
use crate::engine::{self, ShowOptions};
use anyhow::{Context as _, Result};

use super::pull::targets;

/// Print the patch of each ghost branch named on the command line.
pub fn show(args: ShowArgs, config: &Config) -> Result<()> {
    let targets = targets(args.kind, args.hashes, config.ghost_prefix())?;
    let options = ShowOptions {
        commits: targets.commits,
        diff: targets.diff,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    engine::show(config, &options, &mut out).context("Failed to show ghost branches")?;
    out.flush()?;
    Ok(())
}
