//! ghost::apply
//!
//! Replaying a pulled ghost branch onto the source directory, or printing it.
//!
//! Before anything touches the target tree its HEAD is compared with the
//! commit the branch was made against. A mismatch aborts unless the caller
//! forces the apply, in which case it is only logged.

use std::io::Write;
use std::path::Path;

use super::workenv::WorkingEnv;
use super::GhostError;
use crate::core::branch::GhostBranch;
use crate::git::{command, Git};

/// How [`GhostBranch::apply`] treats the target's HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadCheck {
    /// HEAD must equal the branch's base.
    Strict,
    /// A mismatch is logged as a warning.
    Force,
    /// The base was produced by a commits branch applied in the same pull.
    /// `git am` rewrites commits, so HEAD cannot match by hash.
    FollowsCommits,
}

impl HeadCheck {
    pub fn from_force(force: bool) -> Self {
        if force {
            HeadCheck::Force
        } else {
            HeadCheck::Strict
        }
    }
}

impl GhostBranch {
    /// Apply the branch's patch file from `env` onto `env.src_dir()`.
    ///
    /// A commits branch is applied with `git am`, a diff branch with
    /// `git apply`. Full history is restored into a freshly initialized
    /// repository, so the target must not be one already.
    ///
    /// # Errors
    ///
    /// - [`GhostError::HeadMismatch`] if HEAD is not the expected base under
    ///   [`HeadCheck::Strict`]
    /// - [`GhostError::AlreadyGitRepo`] when restoring full history into a
    ///   repository
    /// - [`GhostError::Git`] if the patch does not apply
    pub fn apply(&self, env: &WorkingEnv, check: HeadCheck) -> Result<(), GhostError> {
        let src_dir = env.src_dir();
        let patch = env.ghost_dir().join(self.file_name());

        match self {
            GhostBranch::Commits(branch) if branch.is_full_history() => {
                if src_dir.join(".git").exists() {
                    return Err(GhostError::AlreadyGitRepo {
                        path: src_dir.to_path_buf(),
                    });
                }
                std::fs::create_dir_all(src_dir)?;
                command::init(src_dir)?;
            }
            _ => self.check_head(src_dir, check)?,
        }

        match self {
            GhostBranch::Commits(_) => command::am(src_dir, &patch)?,
            GhostBranch::Diff(_) => command::apply(src_dir, &patch)?,
        }

        tracing::info!(
            branch = %self.branch_name(),
            src_dir = %src_dir.display(),
            "applied ghost branch"
        );
        Ok(())
    }

    /// Stream the branch's patch file from `env` into `writer`.
    pub fn show(&self, env: &WorkingEnv, writer: &mut dyn Write) -> Result<(), GhostError> {
        command::cat_head_file(env.ghost_dir(), self.file_name(), writer)?;
        Ok(())
    }

    fn check_head(&self, src_dir: &Path, check: HeadCheck) -> Result<(), GhostError> {
        let expected = self.expected_base().as_str();
        let actual = Git::open(src_dir)?.head()?;
        if actual == expected {
            return Ok(());
        }
        if check == HeadCheck::FollowsCommits {
            tracing::debug!(
                branch = %self.branch_name(),
                expected,
                actual = %actual,
                "applying on top of commits pulled just now"
            );
            return Ok(());
        }
        if check == HeadCheck::Force {
            tracing::warn!(
                branch = %self.branch_name(),
                expected,
                actual = %actual,
                "HEAD does not match the base of the ghost branch, applying anyway"
            );
            return Ok(());
        }
        Err(GhostError::HeadMismatch {
            branch: self.branch_name(),
            expected: expected.to_string(),
            actual,
        })
    }
}
