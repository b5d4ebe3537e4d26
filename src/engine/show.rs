//! engine::show
//!
//! Print the patch carried by ghost branches.

use std::io::Write;

use crate::core::config::Config;
use crate::ghost::{
    CommitsBranchSpec, GhostError, PullBranch, PullableDiffBranchSpec, SpecOutcome,
    WorkingEnvSpec,
};

/// What to show.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    pub commits: Option<CommitsBranchSpec>,
    pub diff: Option<PullableDiffBranchSpec>,
}

/// Stream the patch file of each requested branch into `writer`, commits
/// first. Each spec gets its own working environment.
pub fn show(config: &Config, options: &ShowOptions, writer: &mut dyn Write) -> Result<(), GhostError> {
    if let Some(spec) = &options.commits {
        show_branch(config, spec, writer)?;
    }
    if let Some(spec) = &options.diff {
        show_branch(config, spec, writer)?;
    }
    Ok(())
}

fn show_branch<S: PullBranch>(
    config: &Config,
    spec: &S,
    writer: &mut dyn Write,
) -> Result<(), GhostError> {
    let env = WorkingEnvSpec::from_config(config).initialize()?;
    match spec.pull_branch(&env)? {
        SpecOutcome::Branch(branch) => branch.show(&env, writer),
        SpecOutcome::NoOp(_) => Ok(()),
    }
}
