//! engine::push
//!
//! Create ghost branches from the source directory and push the new ones.

use crate::core::branch::{CommitsBranch, DiffBranch, GhostBranch};
use crate::core::config::Config;
use crate::ghost::{
    CommitsBranchSpec, CreateBranch, DiffBranchSpec, GhostError, SpecOutcome, WorkingEnv,
    WorkingEnvSpec,
};
use crate::git::command;
use crate::ui::output::format_row;

/// What to push.
#[derive(Debug, Clone, Default)]
pub struct PushOptions {
    pub commits: Option<CommitsBranchSpec>,
    pub diff: Option<DiffBranchSpec>,
}

/// Branches that were pushed or already existed. `None` when the spec was
/// not requested or produced nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushResult {
    pub commits: Option<CommitsBranch>,
    pub diff: Option<DiffBranch>,
}

impl PushResult {
    /// One `<from> <to>` line per branch, commits first.
    pub fn pretty_string(&self) -> String {
        let mut out = String::new();
        if let Some(branch) = &self.commits {
            out.push_str(&format_row(&[branch.hash_from.as_str(), branch.hash_to.as_str()]));
            out.push('\n');
        }
        if let Some(branch) = &self.diff {
            out.push_str(&format_row(&[branch.hash_from.as_str(), branch.diff_hash.as_str()]));
            out.push('\n');
        }
        out
    }
}

/// Push the requested ghost branches.
///
/// Each spec gets its own working environment. Specs that produce nothing
/// are skipped, and branches already on the ghost repository are reported
/// without being pushed again.
pub fn push(config: &Config, options: &PushOptions) -> Result<PushResult, GhostError> {
    let mut result = PushResult::default();

    if let Some(spec) = &options.commits {
        result.commits = push_branch(config, spec)?
            .as_ref()
            .and_then(GhostBranch::as_commits)
            .cloned();
    }

    if let Some(spec) = &options.diff {
        result.diff = push_branch(config, spec)?
            .as_ref()
            .and_then(GhostBranch::as_diff)
            .cloned();
    }

    Ok(result)
}

fn push_branch<S: CreateBranch>(config: &Config, spec: &S) -> Result<Option<GhostBranch>, GhostError> {
    let env = WorkingEnvSpec::from_config(config).initialize()?;

    let branch = match spec.create_branch(&env)? {
        SpecOutcome::Branch(branch) => branch,
        SpecOutcome::NoOp(reason) => {
            tracing::info!(%reason, "nothing to push");
            return Ok(None);
        }
    };

    publish(config, &env, &branch)?;
    Ok(Some(branch))
}

/// Push `branch` from `env` to the ghost repository unless it is already
/// there.
///
/// Names are content addressed, so losing a race to another invocation
/// pushing the same name is not an error.
pub fn publish(config: &Config, env: &WorkingEnv, branch: &GhostBranch) -> Result<(), GhostError> {
    let branch_name = branch.branch_name();
    if command::remote_branch_exists(config.ghost_repo(), &branch_name)? {
        tracing::info!(
            branch = %branch_name,
            ghost_repo = %config.ghost_repo(),
            "skipped pushing existing branch"
        );
        return Ok(());
    }

    tracing::info!(
        branch = %branch_name,
        ghost_repo = %config.ghost_repo(),
        "pushing branch"
    );
    push_new(config, env, &branch_name)
}

/// Push a branch the ghost repository did not have when last checked. A
/// rejected push is accepted when the branch turns out to exist by now.
fn push_new(config: &Config, env: &WorkingEnv, branch_name: &str) -> Result<(), GhostError> {
    let Err(err) = command::push_branch(env.ghost_dir(), branch_name) else {
        return Ok(());
    };
    if command::remote_branch_exists(config.ghost_repo(), branch_name)? {
        tracing::info!(
            branch = %branch_name,
            ghost_repo = %config.ghost_repo(),
            "branch was pushed concurrently"
        );
        return Ok(());
    }
    Err(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CommitHash, ContentHash, Prefix};

    #[test]
    fn pretty_string_lists_commits_then_diff() {
        let result = PushResult {
            commits: Some(CommitsBranch {
                prefix: Prefix::default(),
                hash_from: CommitHash::new("aaa").unwrap(),
                hash_to: CommitHash::new("bbb").unwrap(),
            }),
            diff: Some(DiffBranch {
                prefix: Prefix::default(),
                hash_from: CommitHash::new("bbb").unwrap(),
                diff_hash: ContentHash::new("ccc").unwrap(),
            }),
        };
        assert_eq!(result.pretty_string(), "aaa bbb\nbbb ccc\n");
    }

    #[test]
    fn pretty_string_empty_when_nothing_pushed() {
        assert_eq!(PushResult::default().pretty_string(), "");
    }

    fn run_git(dir: &std::path::Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(output.status.success(), "git {:?} failed", args);
    }

    #[test]
    fn losing_push_race_is_not_an_error() {
        use crate::core::config::ConfigSources;
        use tempfile::TempDir;

        let ghost = TempDir::new().unwrap();
        run_git(ghost.path(), &["init", "-q", "--bare"]);
        let src = TempDir::new().unwrap();
        run_git(src.path(), &["init", "-q", "-b", "main"]);
        run_git(src.path(), &["config", "user.email", "test@example.com"]);
        run_git(src.path(), &["config", "user.name", "Test User"]);
        std::fs::write(src.path().join("sample.txt"), "a\n").unwrap();
        run_git(src.path(), &["add", "sample.txt"]);
        run_git(src.path(), &["commit", "-q", "-m", "a"]);
        std::fs::write(src.path().join("sample.txt"), "b\n").unwrap();
        let work = TempDir::new().unwrap();

        let config = Config::resolve(ConfigSources {
            src_dir: Some(src.path().to_path_buf()),
            ghost_working_dir: Some(work.path().to_path_buf()),
            ghost_prefix: None,
            ghost_repo: Some(ghost.path().display().to_string()),
        })
        .unwrap();
        let spec = DiffBranchSpec {
            prefix: Prefix::default(),
            committish_from: "HEAD".to_string(),
            included_paths: Vec::new(),
            follow_symlinks: false,
        };

        // Build the branch, then let another push publish the same name first.
        let env = WorkingEnvSpec::from_config(&config).initialize().unwrap();
        let branch = spec.create_branch(&env).unwrap().into_branch().unwrap();
        let pushed = push(
            &config,
            &PushOptions {
                commits: None,
                diff: Some(spec),
            },
        )
        .unwrap();
        assert_eq!(pushed.diff.as_ref(), branch.as_diff());

        // The stale clone's push is rejected unless both orphan commits
        // happen to be identical.
        push_new(&config, &env, &branch.branch_name()).unwrap();
        publish(&config, &env, &branch).unwrap();
    }
}
