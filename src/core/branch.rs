//! core::branch
//!
//! Value model for ghost branches.
//!
//! A ghost branch is an orphan, single-commit branch on the ghost repository
//! holding exactly one patch file. Its identity is fully encoded in its name;
//! see [`crate::core::naming`] for the grammar.

use std::fmt;

use super::naming;
use super::types::{CommitHash, ContentHash, Prefix};

/// File carried by a commits branch.
pub const COMMITS_PATCH_FILE: &str = "commits.patch";

/// File carried by a diff branch.
pub const DIFF_PATCH_FILE: &str = "local-mod.patch";

/// A captured linear commit range `hash_from..hash_to`.
///
/// When `hash_from` is the full-history token the branch carries every
/// commit reachable (first-parent) from `hash_to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitsBranch {
    pub prefix: Prefix,
    pub hash_from: CommitHash,
    pub hash_to: CommitHash,
}

impl CommitsBranch {
    /// Branch name on the ghost repository.
    pub fn branch_name(&self) -> String {
        naming::commits_branch_name(&self.prefix, &self.hash_from, &self.hash_to)
    }

    /// Whether this branch carries full history rather than a range.
    pub fn is_full_history(&self) -> bool {
        self.hash_from.is_full_history()
    }
}

/// A working-tree diff against `hash_from`, addressed by its content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffBranch {
    pub prefix: Prefix,
    pub hash_from: CommitHash,
    pub diff_hash: ContentHash,
}

impl DiffBranch {
    /// Branch name on the ghost repository.
    pub fn branch_name(&self) -> String {
        naming::diff_branch_name(&self.prefix, &self.hash_from, &self.diff_hash)
    }
}

/// Kind of ghost branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Commits,
    Diff,
}

impl BranchKind {
    /// Name of the single file the branch carries.
    pub fn file_name(self) -> &'static str {
        match self {
            BranchKind::Commits => COMMITS_PATCH_FILE,
            BranchKind::Diff => DIFF_PATCH_FILE,
        }
    }
}

/// A ghost branch of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GhostBranch {
    Commits(CommitsBranch),
    Diff(DiffBranch),
}

impl GhostBranch {
    pub fn kind(&self) -> BranchKind {
        match self {
            GhostBranch::Commits(_) => BranchKind::Commits,
            GhostBranch::Diff(_) => BranchKind::Diff,
        }
    }

    pub fn branch_name(&self) -> String {
        match self {
            GhostBranch::Commits(branch) => branch.branch_name(),
            GhostBranch::Diff(branch) => branch.branch_name(),
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.kind().file_name()
    }

    /// Commit the target tree must be at before this branch is applied.
    pub fn expected_base(&self) -> &CommitHash {
        match self {
            GhostBranch::Commits(branch) => &branch.hash_from,
            GhostBranch::Diff(branch) => &branch.hash_from,
        }
    }

    /// Parse a branch name back into a ghost branch.
    ///
    /// Returns `None` for names matching neither grammar.
    pub fn parse(name: &str) -> Option<Self> {
        naming::decode(name)
    }

    pub fn as_commits(&self) -> Option<&CommitsBranch> {
        match self {
            GhostBranch::Commits(branch) => Some(branch),
            GhostBranch::Diff(_) => None,
        }
    }

    pub fn as_diff(&self) -> Option<&DiffBranch> {
        match self {
            GhostBranch::Diff(branch) => Some(branch),
            GhostBranch::Commits(_) => None,
        }
    }
}

impl From<CommitsBranch> for GhostBranch {
    fn from(branch: CommitsBranch) -> Self {
        GhostBranch::Commits(branch)
    }
}

impl From<DiffBranch> for GhostBranch {
    fn from(branch: DiffBranch) -> Self {
        GhostBranch::Diff(branch)
    }
}

impl fmt::Display for GhostBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.branch_name())
    }
}
