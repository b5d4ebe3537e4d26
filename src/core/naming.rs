//! core::naming
//!
//! Ghost branch naming rules.
//!
//! # Grammar
//!
//! - Commits branch: `{prefix}/{hash_from}-{hash_to}` where `hash_from` may be
//!   the full-history token `_`
//! - Diff branch: `{prefix}/{hash_from}/{diff_hash}`
//!
//! Branch names are the only index the ghost repository has. Listing and
//! deletion work purely on these names, so decoding is strict: anything that
//! does not match one of the two grammars is ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::branch::{CommitsBranch, DiffBranch, GhostBranch};
use super::types::{CommitHash, ContentHash, Prefix};

static COMMITS_BRANCH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]+)/([a-f0-9]+|_)-([a-f0-9]+)$").expect("valid regex")
});

static DIFF_BRANCH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z0-9]+)/([a-f0-9]+)/([a-f0-9]+)$").expect("valid regex")
});

/// Wildcard used for unset list filters.
const ANY: &str = "*";

/// Encode a commits branch name.
///
/// # Example
///
/// ```
/// use git_ghost::core::naming::commits_branch_name;
/// use git_ghost::core::types::{CommitHash, Prefix};
///
/// let name = commits_branch_name(
///     &Prefix::default(),
///     &CommitHash::full_history(),
///     &CommitHash::new("abc").unwrap(),
/// );
/// assert_eq!(name, "ghost/_-abc");
/// ```
pub fn commits_branch_name(prefix: &Prefix, from: &CommitHash, to: &CommitHash) -> String {
    format!("{prefix}/{from}-{to}")
}

/// Encode a diff branch name.
pub fn diff_branch_name(prefix: &Prefix, from: &CommitHash, diff_hash: &ContentHash) -> String {
    format!("{prefix}/{from}/{diff_hash}")
}

/// Decode a commits branch name.
pub fn decode_commits(name: &str) -> Option<CommitsBranch> {
    let caps = COMMITS_BRANCH_NAME.captures(name)?;
    Some(CommitsBranch {
        prefix: Prefix::new(&caps[1]).ok()?,
        hash_from: CommitHash::new(&caps[2]).ok()?,
        hash_to: CommitHash::new(&caps[3]).ok()?,
    })
}

/// Decode a diff branch name.
pub fn decode_diff(name: &str) -> Option<DiffBranch> {
    let caps = DIFF_BRANCH_NAME.captures(name)?;
    Some(DiffBranch {
        prefix: Prefix::new(&caps[1]).ok()?,
        hash_from: CommitHash::new(&caps[2]).ok()?,
        diff_hash: ContentHash::new(&caps[3]).ok()?,
    })
}

/// Decode a branch name of either grammar.
///
/// # Example
///
/// ```
/// use git_ghost::core::naming::decode;
///
/// assert!(decode("ghost/abc-def").is_some());
/// assert!(decode("ghost/abc/def").is_some());
/// assert!(decode("feature/login").is_none());
/// ```
pub fn decode(name: &str) -> Option<GhostBranch> {
    decode_commits(name)
        .map(GhostBranch::Commits)
        .or_else(|| decode_diff(name).map(GhostBranch::Diff))
}

/// Ref glob matching commits branches, with unset filters as wildcards.
///
/// # Example
///
/// ```
/// use git_ghost::core::naming::commits_ref_pattern;
/// use git_ghost::core::types::Prefix;
///
/// assert_eq!(
///     commits_ref_pattern(&Prefix::default(), None, Some("abc")),
///     "refs/heads/ghost/*-abc"
/// );
/// ```
pub fn commits_ref_pattern(prefix: &Prefix, from: Option<&str>, to: Option<&str>) -> String {
    format!(
        "refs/heads/{prefix}/{}-{}",
        from.unwrap_or(ANY),
        to.unwrap_or(ANY)
    )
}

/// Ref glob matching diff branches, with unset filters as wildcards.
pub fn diff_ref_pattern(prefix: &Prefix, from: Option<&str>, diff_hash: Option<&str>) -> String {
    format!(
        "refs/heads/{prefix}/{}/{}",
        from.unwrap_or(ANY),
        diff_hash.unwrap_or(ANY)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FROM: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";
    const TO: &str = "b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2";

    #[test]
    fn commits_round_trip() {
        let branch = CommitsBranch {
            prefix: Prefix::default(),
            hash_from: CommitHash::new(FROM).unwrap(),
            hash_to: CommitHash::new(TO).unwrap(),
        };
        assert_eq!(decode_commits(&branch.branch_name()), Some(branch));
    }

    #[test]
    fn full_history_round_trip() {
        let name = format!("ghost/_-{TO}");
        let branch = decode_commits(&name).unwrap();
        assert!(branch.is_full_history());
        assert_eq!(branch.branch_name(), name);
    }

    #[test]
    fn diff_round_trip() {
        let branch = DiffBranch {
            prefix: Prefix::new("ci").unwrap(),
            hash_from: CommitHash::new(FROM).unwrap(),
            diff_hash: ContentHash::new(TO).unwrap(),
        };
        assert_eq!(decode_diff(&branch.branch_name()), Some(branch));
    }

    #[test]
    fn grammars_do_not_overlap() {
        assert!(decode_diff(&format!("ghost/{FROM}-{TO}")).is_none());
        assert!(decode_commits(&format!("ghost/{FROM}/{TO}")).is_none());
    }

    #[test]
    fn unrelated_names_rejected() {
        for name in [
            "main",
            "ghost",
            "ghost/",
            "ghost/abc",
            "ghost/abc-",
            "ghost/-abc",
            "ghost/xyz-abc",
            "Ghost/abc-def",
            "ghost/abc/def/123",
            "ghost/abc/_",
            "ghost/_/abc",
            "refs/heads/ghost/abc-def",
            "ghost/abc-def\n",
        ] {
            assert!(decode(name).is_none(), "{name:?} should not decode");
        }
    }

    #[test]
    fn full_history_only_valid_as_base() {
        assert!(decode("ghost/_-abc").is_some());
        assert!(decode("ghost/abc-_").is_none());
    }

    #[test]
    fn patterns_default_to_wildcards() {
        let prefix = Prefix::default();
        assert_eq!(
            commits_ref_pattern(&prefix, None, None),
            "refs/heads/ghost/*-*"
        );
        assert_eq!(diff_ref_pattern(&prefix, None, None), "refs/heads/ghost/*/*");
        assert_eq!(
            diff_ref_pattern(&prefix, Some("abc"), None),
            "refs/heads/ghost/abc/*"
        );
    }
}
