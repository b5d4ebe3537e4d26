//! ghost
//!
//! Creating, pulling, applying and enumerating ghost branches.
//!
//! # Modules
//!
//! - [`resolve`] - Commit-ish resolution and included-path resolution
//! - [`workenv`] - Ephemeral clone of the ghost repository
//! - [`spec`] - Branch specs that create or pull ghost branches
//! - [`apply`] - Applying and showing a pulled ghost branch
//! - [`list`] - Pattern-based enumeration of ghost branches on the remote
//!
//! # Lifecycle
//!
//! ```text
//! BranchSpec --resolve--> WorkingEnv --create/pull--> GhostBranch --apply/show-->
//! ```
//!
//! Every value here is built fresh per command. The only durable state is the
//! set of branch names on the ghost repository.

pub mod apply;
pub mod list;
pub mod resolve;
pub mod spec;
pub mod workenv;

pub use apply::HeadCheck;
pub use list::{GhostBranchList, ListCommitsBranchSpec, ListDiffBranchSpec};
pub use spec::{
    CommitsBranchSpec, CreateBranch, DiffBranchSpec, NoOpReason, PullBranch,
    PullableDiffBranchSpec, SpecOutcome,
};
pub use workenv::{WorkingEnv, WorkingEnvSpec};

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::TypeError;
use crate::git::GitError;

/// Errors from ghost branch operations.
#[derive(Debug, Error)]
pub enum GhostError {
    /// A commit-ish that must exist locally does not.
    #[error("commit-ish '{committish}' does not exist in {repo}")]
    InvalidCommittish { committish: String, repo: PathBuf },

    /// An included path resolves outside the source directory.
    #[error("'{path}' is not inside source directory '{src_dir}'")]
    OutsideSourceDir { path: PathBuf, src_dir: PathBuf },

    /// Directories cannot be included in a diff.
    #[error("'{path}' is a directory, only files can be included")]
    DirectoryNotSupported { path: PathBuf },

    /// An included path could not be inspected.
    #[error("cannot access included path '{path}': {source}")]
    IncludedPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A symlink chain is longer than allowed.
    #[error("symlink chain is deeper than {max}: {chain}")]
    SymlinkTooDeep { chain: String, max: usize },

    /// A symlink points to an absolute path.
    #[error("symlink to absolute path is not supported: {chain} -> {target}")]
    AbsoluteSymlink { chain: String, target: PathBuf },

    /// The target tree is not at the commit the branch was made against.
    #[error("HEAD is at {actual} but {branch} expects {expected} (use --force to apply anyway)")]
    HeadMismatch {
        branch: String,
        expected: String,
        actual: String,
    },

    /// Full history cannot be restored into an existing repository.
    #[error("'{path}' is already a git repository, full history can only be restored into a new directory")]
    AlreadyGitRepo { path: PathBuf },

    /// The ghost branch to pull does not exist on the remote.
    #[error("ghost branch '{branch}' not found in {repo}")]
    BranchNotFound { branch: String, repo: String },

    /// Several independent failures.
    #[error("{}", join_errors(.0))]
    Multiple(Vec<GhostError>),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl GhostError {
    /// Collapse a list of errors into one, or `None` if empty.
    pub fn from_many(mut errors: Vec<GhostError>) -> Option<GhostError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(GhostError::Multiple(errors)),
        }
    }
}

fn join_errors(errors: &[GhostError]) -> String {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("{} errors occurred: {}", errors.len(), messages.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_many_collapses() {
        assert!(GhostError::from_many(vec![]).is_none());

        let single = GhostError::from_many(vec![GhostError::DirectoryNotSupported {
            path: "dir".into(),
        }])
        .unwrap();
        assert!(matches!(single, GhostError::DirectoryNotSupported { .. }));

        let many = GhostError::from_many(vec![
            GhostError::DirectoryNotSupported { path: "a".into() },
            GhostError::DirectoryNotSupported { path: "b".into() },
        ])
        .unwrap();
        let message = many.to_string();
        assert!(message.starts_with("2 errors occurred"));
        assert!(message.contains("'a'"));
        assert!(message.contains("'b'"));
    }
}
