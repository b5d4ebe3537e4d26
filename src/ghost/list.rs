//! ghost::list
//!
//! Enumerating ghost branches on the ghost repository by name pattern.
//!
//! Listing never looks at branch content. Ref globs narrow the remote's
//! `refs/heads/` namespace, and each match is decoded with
//! [`crate::core::naming`]; anything that does not decode is skipped.

use std::path::Path;

use super::resolve::resolve_or_passthrough;
use super::GhostError;
use crate::core::branch::{CommitsBranch, DiffBranch};
use crate::core::naming;
use crate::core::types::Prefix;
use crate::git::command;

/// Filter for commits branches. Unset ends match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCommitsBranchSpec {
    pub prefix: Prefix,
    pub hash_from: Option<String>,
    pub hash_to: Option<String>,
}

impl ListCommitsBranchSpec {
    /// Resolve both filters against the source repository where possible.
    pub fn resolve(&self, src_dir: &Path) -> Result<Self, GhostError> {
        Ok(Self {
            prefix: self.prefix.clone(),
            hash_from: resolve_filter(src_dir, self.hash_from.as_deref())?,
            hash_to: resolve_filter(src_dir, self.hash_to.as_deref())?,
        })
    }

    pub fn ref_pattern(&self) -> String {
        naming::commits_ref_pattern(
            &self.prefix,
            self.hash_from.as_deref(),
            self.hash_to.as_deref(),
        )
    }
}

/// Filter for diff branches. Unset parts match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiffBranchSpec {
    pub prefix: Prefix,
    pub hash_from: Option<String>,
    pub diff_hash: Option<String>,
}

impl ListDiffBranchSpec {
    /// Resolve the base filter. The diff hash is used as given.
    pub fn resolve(&self, src_dir: &Path) -> Result<Self, GhostError> {
        Ok(Self {
            prefix: self.prefix.clone(),
            hash_from: resolve_filter(src_dir, self.hash_from.as_deref())?,
            diff_hash: self.diff_hash.clone(),
        })
    }

    pub fn ref_pattern(&self) -> String {
        naming::diff_ref_pattern(
            &self.prefix,
            self.hash_from.as_deref(),
            self.diff_hash.as_deref(),
        )
    }
}

fn resolve_filter(src_dir: &Path, filter: Option<&str>) -> Result<Option<String>, GhostError> {
    match filter {
        Some(committish) => Ok(Some(
            resolve_or_passthrough(src_dir, committish)?.to_string(),
        )),
        None => Ok(None),
    }
}

/// Ghost branches found on the ghost repository, each kind sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GhostBranchList {
    pub commits: Vec<CommitsBranch>,
    pub diffs: Vec<DiffBranch>,
}

impl GhostBranchList {
    /// Query `repo` for branches matching the given (already resolved) specs.
    ///
    /// A kind whose spec is `None` is not queried and stays empty.
    pub fn fetch(
        repo: &str,
        commits: Option<&ListCommitsBranchSpec>,
        diff: Option<&ListDiffBranchSpec>,
    ) -> Result<Self, GhostError> {
        let patterns: Vec<String> = commits
            .map(ListCommitsBranchSpec::ref_pattern)
            .into_iter()
            .chain(diff.map(ListDiffBranchSpec::ref_pattern))
            .collect();
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        tracing::debug!(repo, ?patterns, "listing ghost branches");
        let names = command::ls_remote_heads(repo, &patterns)?;
        Ok(Self::from_names(
            names.iter().map(String::as_str),
            commits.is_some(),
            diff.is_some(),
        ))
    }

    /// Decode branch names, keeping only the requested kinds.
    pub fn from_names<'a>(
        names: impl IntoIterator<Item = &'a str>,
        commits: bool,
        diffs: bool,
    ) -> Self {
        let mut list = Self::default();
        for name in names {
            if commits {
                if let Some(branch) = naming::decode_commits(name) {
                    list.commits.push(branch);
                    continue;
                }
            }
            if diffs {
                if let Some(branch) = naming::decode_diff(name) {
                    list.diffs.push(branch);
                }
            }
        }
        list.commits.sort_by_key(CommitsBranch::branch_name);
        list.diffs.sort_by_key(DiffBranch::branch_name);
        list
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.diffs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commits.len() + self.diffs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_sorts() {
        let list = GhostBranchList::from_names(
            ["ghost/bbb-ccc", "ghost/aaa/fff", "ghost/aaa-ccc", "ghost/aaa/eee"],
            true,
            true,
        );
        let commits: Vec<String> = list.commits.iter().map(|b| b.branch_name()).collect();
        let diffs: Vec<String> = list.diffs.iter().map(|b| b.branch_name()).collect();
        assert_eq!(commits, vec!["ghost/aaa-ccc", "ghost/bbb-ccc"]);
        assert_eq!(diffs, vec!["ghost/aaa/eee", "ghost/aaa/fff"]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn unrelated_names_skipped() {
        let list = GhostBranchList::from_names(
            ["ghost/feature-x", "ghost/readme", "main", "ghost/aaa/bbb/ccc"],
            true,
            true,
        );
        assert!(list.is_empty());
    }

    #[test]
    fn only_requested_kinds_kept() {
        let names = ["ghost/aaa-bbb", "ghost/aaa/ccc"];
        let list = GhostBranchList::from_names(names, true, false);
        assert_eq!(list.commits.len(), 1);
        assert!(list.diffs.is_empty());

        let list = GhostBranchList::from_names(names, false, true);
        assert!(list.commits.is_empty());
        assert_eq!(list.diffs.len(), 1);
    }

    #[test]
    fn patterns_use_filters() {
        let commits = ListCommitsBranchSpec {
            prefix: Prefix::default(),
            hash_from: Some("aaa".into()),
            hash_to: None,
        };
        assert_eq!(commits.ref_pattern(), "refs/heads/ghost/aaa-*");

        let diff = ListDiffBranchSpec {
            prefix: Prefix::new("ci").unwrap(),
            hash_from: None,
            diff_hash: Some("ddd".into()),
        };
        assert_eq!(diff.ref_pattern(), "refs/heads/ci/*/ddd");
    }

    #[test]
    fn nothing_requested_queries_nothing() {
        let list = GhostBranchList::fetch("/nonexistent/repo", None, None).unwrap();
        assert!(list.is_empty());
    }
}
