//! ghost::spec
//!
//! Branch specs: what the user asked for, before it becomes a ghost branch.
//!
//! A spec resolves its commit-ishes against the source repository and then
//! either creates a ghost branch inside a [`WorkingEnv`] ([`CreateBranch`]) or
//! checks out an existing one from the ghost repository ([`PullBranch`]).
//! Pushing a created branch is left to the caller.
//!
//! Empty commit ranges and empty diffs never become branches; both sides
//! report them as [`SpecOutcome::NoOp`].

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::resolve::{resolve_included_paths, resolve_or_passthrough, validate_committish};
use super::workenv::WorkingEnv;
use super::GhostError;
use crate::core::branch::{CommitsBranch, DiffBranch, GhostBranch};
use crate::core::types::{CommitHash, ContentHash, Prefix, FULL_HISTORY};
use crate::git::{command, Git};

/// Commit message of every ghost branch commit.
const GHOST_COMMIT_MESSAGE: &str = "Create ghost commit";

/// Why a spec produced no branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// `from` and `to` resolve to the same commit.
    EmptyRange,
    /// The working tree has no changes against `from`.
    EmptyDiff,
}

impl std::fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoOpReason::EmptyRange => f.write_str("from and to are the same commit"),
            NoOpReason::EmptyDiff => f.write_str("no local modifications"),
        }
    }
}

/// Result of creating or pulling a ghost branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecOutcome {
    Branch(GhostBranch),
    NoOp(NoOpReason),
}

impl SpecOutcome {
    pub fn into_branch(self) -> Option<GhostBranch> {
        match self {
            SpecOutcome::Branch(branch) => Some(branch),
            SpecOutcome::NoOp(_) => None,
        }
    }
}

/// Creates a ghost branch in a working environment.
pub trait CreateBranch {
    fn create_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError>;
}

/// Checks out an existing ghost branch in a working environment.
pub trait PullBranch {
    fn pull_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError>;
}

// =============================================================================
// Commits
// =============================================================================

/// A range of commits, `from..to`, or full history up to `to` when `from`
/// is `_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitsBranchSpec {
    pub prefix: Prefix,
    pub committish_from: String,
    pub committish_to: String,
}

impl CommitsBranchSpec {
    /// Validate and resolve both ends of the range.
    ///
    /// For a range both commit-ishes must exist locally. Full history skips
    /// validation because the target of a full-history pull is not a
    /// repository yet.
    pub fn resolve(&self, src_dir: &Path) -> Result<CommitsBranch, GhostError> {
        if self.committish_from != FULL_HISTORY {
            validate_committish(src_dir, &self.committish_from)?;
            validate_committish(src_dir, &self.committish_to)?;
        }
        Ok(CommitsBranch {
            prefix: self.prefix.clone(),
            hash_from: resolve_or_passthrough(src_dir, &self.committish_from)?,
            hash_to: resolve_or_passthrough(src_dir, &self.committish_to)?,
        })
    }
}

impl CreateBranch for CommitsBranchSpec {
    fn create_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError> {
        let branch = self.resolve(env.src_dir())?;
        if branch.hash_from == branch.hash_to {
            return Ok(SpecOutcome::NoOp(NoOpReason::EmptyRange));
        }

        let revision = if branch.is_full_history() {
            branch.hash_to.to_string()
        } else {
            format!("{}..{}", branch.hash_from, branch.hash_to)
        };
        let patch = NamedTempFile::new_in(env.ghost_working_dir())?;
        command::write_log_patches(env.src_dir(), &revision, patch.reopen()?)?;

        let branch = GhostBranch::Commits(branch);
        commit_ghost_file(env, patch, &branch)?;
        Ok(SpecOutcome::Branch(branch))
    }
}

impl PullBranch for CommitsBranchSpec {
    fn pull_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError> {
        let branch = self.resolve(env.src_dir())?;
        if branch.hash_from == branch.hash_to {
            tracing::warn!(
                from = %branch.hash_from,
                to = %branch.hash_to,
                "skipping pull of commits branch, from and to are the same commit"
            );
            return Ok(SpecOutcome::NoOp(NoOpReason::EmptyRange));
        }
        let branch = GhostBranch::Commits(branch);
        checkout_remote_branch(env, &branch)?;
        Ok(SpecOutcome::Branch(branch))
    }
}

// =============================================================================
// Diff
// =============================================================================

/// Local modifications against `from`, plus explicitly included files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffBranchSpec {
    pub prefix: Prefix,
    pub committish_from: String,
    pub included_paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
}

/// A diff spec after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDiffSpec {
    pub prefix: Prefix,
    pub hash_from: CommitHash,
    pub included_paths: Vec<PathBuf>,
}

impl DiffBranchSpec {
    pub fn resolve(&self, src_dir: &Path) -> Result<ResolvedDiffSpec, GhostError> {
        validate_committish(src_dir, &self.committish_from)?;
        let hash_from = resolve_or_passthrough(src_dir, &self.committish_from)?;
        let included_paths =
            resolve_included_paths(src_dir, &self.included_paths, self.follow_symlinks)?;
        Ok(ResolvedDiffSpec {
            prefix: self.prefix.clone(),
            hash_from,
            included_paths,
        })
    }
}

impl CreateBranch for DiffBranchSpec {
    fn create_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError> {
        let resolved = self.resolve(env.src_dir())?;

        let patch = NamedTempFile::new_in(env.ghost_working_dir())?;
        command::write_diff(env.src_dir(), resolved.hash_from.as_str(), patch.reopen()?)?;
        for path in &resolved.included_paths {
            let out = OpenOptions::new().append(true).open(patch.path())?;
            command::write_file_addition(env.src_dir(), path, out)?;
        }

        let content = fs::read(patch.path())?;
        if content.is_empty() {
            return Ok(SpecOutcome::NoOp(NoOpReason::EmptyDiff));
        }

        let branch = GhostBranch::Diff(DiffBranch {
            prefix: resolved.prefix,
            hash_from: resolved.hash_from,
            diff_hash: ContentHash::of(&content),
        });
        commit_ghost_file(env, patch, &branch)?;
        Ok(SpecOutcome::Branch(branch))
    }
}

/// An existing diff branch, identified by a diff hash obtained from `push`
/// or `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullableDiffBranchSpec {
    pub prefix: Prefix,
    pub committish_from: String,
    pub diff_hash: ContentHash,
}

impl PullableDiffBranchSpec {
    pub fn resolve(&self, src_dir: &Path) -> Result<DiffBranch, GhostError> {
        validate_committish(src_dir, &self.committish_from)?;
        Ok(DiffBranch {
            prefix: self.prefix.clone(),
            hash_from: resolve_or_passthrough(src_dir, &self.committish_from)?,
            diff_hash: self.diff_hash.clone(),
        })
    }
}

impl PullBranch for PullableDiffBranchSpec {
    fn pull_branch(&self, env: &WorkingEnv) -> Result<SpecOutcome, GhostError> {
        let branch = GhostBranch::Diff(self.resolve(env.src_dir())?);
        checkout_remote_branch(env, &branch)?;
        Ok(SpecOutcome::Branch(branch))
    }
}

// =============================================================================
// Shared steps
// =============================================================================

/// Move the finished patch into the clone and commit it on a new orphan branch.
fn commit_ghost_file(
    env: &WorkingEnv,
    patch: NamedTempFile,
    branch: &GhostBranch,
) -> Result<(), GhostError> {
    let ghost_dir = env.ghost_dir();
    let file_name = branch.file_name();
    patch
        .persist(ghost_dir.join(file_name))
        .map_err(|e| GhostError::Io(e.error))?;

    let branch_name = branch.branch_name();
    command::checkout_orphan(ghost_dir, &branch_name)?;
    command::commit_file(ghost_dir, file_name, GHOST_COMMIT_MESSAGE)?;
    tracing::debug!(branch = %branch_name, file = file_name, "created ghost branch");
    Ok(())
}

/// Point the clone at `origin/<branch>`.
fn checkout_remote_branch(env: &WorkingEnv, branch: &GhostBranch) -> Result<(), GhostError> {
    let branch_name = branch.branch_name();
    let remote_ref = format!("origin/{branch_name}");

    let git = Git::open(env.ghost_dir())?;
    if git
        .verify_exists(&format!("refs/remotes/{remote_ref}"))
        .is_err()
    {
        return Err(GhostError::BranchNotFound {
            branch: branch_name,
            repo: env.ghost_repo().to_string(),
        });
    }

    command::reset_hard(env.ghost_dir(), &remote_ref)?;
    tracing::debug!(branch = %branch_name, "pulled ghost branch");
    Ok(())
}
