//! delete command - Delete ghost branches from the ghost repository

use crate::cli::args::DeleteArgs;
use crate::core::config::Config;
use crate::engine::{self, DeleteOptions};
use anyhow::{bail, Context as _, Result};

use super::list::list_options;

/// Delete matching ghost branches, diff branches unless another kind is given.
pub fn delete(args: DeleteArgs, config: &Config) -> Result<()> {
    check_selection(&args)?;
    let options = DeleteOptions {
        list: list_options(args.kind, &args.filter, config.ghost_prefix()),
        dry_run: args.dry_run,
    };
    let result = engine::delete(config, &options).context("Failed to delete ghost branches")?;
    print!("{}", result.pretty_string());
    Ok(())
}

/// Deleting anything broader than one exact branch needs `--all` (or a dry run).
fn check_selection(args: &DeleteArgs) -> Result<()> {
    let exact = args.filter.from.as_ref().is_some_and(|v| !v.is_empty())
        && args.filter.to.as_ref().is_some_and(|v| !v.is_empty());
    if !exact && !args.all && !args.dry_run {
        bail!("--all is required to delete more than one ghost branch (or use --dry-run)");
    }
    Ok(())
}
