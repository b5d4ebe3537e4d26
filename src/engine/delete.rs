//! engine::delete
//!
//! Remove ghost branches from the ghost repository.

use crate::core::config::Config;
use crate::ghost::{GhostBranchList, GhostError, WorkingEnvSpec};
use crate::git::command;

use super::list::{self, ListColumns, ListOptions, ListResult};

/// Which branches to delete. Uses the same filters as listing.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    pub list: ListOptions,
    /// Report what would be deleted without touching the remote.
    pub dry_run: bool,
}

/// Branches deleted, or that would be deleted under dry run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub branches: ListResult,
    pub dry_run: bool,
}

impl DeleteResult {
    pub fn pretty_string(&self) -> String {
        let title = if self.dry_run {
            "Would delete (dry run):"
        } else {
            "Deleted:"
        };
        format!(
            "{title}\n\n{}",
            self.branches.pretty_string(true, ListColumns::Both)
        )
    }
}

/// Delete every ghost branch matching `options`, one push per branch.
pub fn delete(config: &Config, options: &DeleteOptions) -> Result<DeleteResult, GhostError> {
    let resolved = list::resolve(config, &options.list)?;
    let found = GhostBranchList::fetch(
        config.ghost_repo(),
        resolved.commits.as_ref(),
        resolved.diff.as_ref(),
    )?;

    let names: Vec<String> = found
        .commits
        .iter()
        .map(|b| b.branch_name())
        .chain(found.diffs.iter().map(|b| b.branch_name()))
        .collect();

    tracing::info!(branches = ?names, dry_run = options.dry_run, "deleting branches");

    if !options.dry_run && !names.is_empty() {
        let env = WorkingEnvSpec::from_config(config).initialize()?;
        for name in &names {
            command::delete_remote_branch(env.ghost_dir(), name)?;
            tracing::debug!(branch = %name, "deleted branch");
        }
    }

    Ok(DeleteResult {
        branches: ListResult::from_list(found, &resolved),
        dry_run: options.dry_run,
    })
}
