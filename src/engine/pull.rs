//! engine::pull
//!
//! Fetch ghost branches and apply them to the source directory.

use crate::core::config::Config;
use crate::core::types::CommitHash;
use crate::ghost::{
    CommitsBranchSpec, GhostError, HeadCheck, PullBranch, PullableDiffBranchSpec, WorkingEnvSpec,
};

/// What to pull.
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    pub commits: Option<CommitsBranchSpec>,
    pub diff: Option<PullableDiffBranchSpec>,
    /// Apply even when HEAD is not the branch's base.
    pub force: bool,
}

/// Pull and apply the requested ghost branches.
///
/// Both specs share one working environment. Commits are applied first
/// since a diff pulled alongside them is based on their target.
pub fn pull(config: &Config, options: &PullOptions) -> Result<(), GhostError> {
    if options.commits.is_none() && options.diff.is_none() {
        return Ok(());
    }
    let env = WorkingEnvSpec::from_config(config).initialize()?;
    let check = HeadCheck::from_force(options.force);

    let mut applied_to: Option<CommitHash> = None;
    if let Some(spec) = &options.commits {
        if let Some(branch) = spec.pull_branch(&env)?.into_branch() {
            branch.apply(&env, check)?;
            applied_to = branch.as_commits().map(|b| b.hash_to.clone());
        }
    }

    if let Some(spec) = &options.diff {
        if let Some(branch) = spec.pull_branch(&env)?.into_branch() {
            let check = if applied_to.as_ref() == Some(branch.expected_base()) {
                HeadCheck::FollowsCommits
            } else {
                check
            };
            branch.apply(&env, check)?;
        }
    }
    Ok(())
}
