//! push command - Create ghost branches and push them to the ghost repository

use crate::cli::args::{PushArgs, PushKind};
use crate::core::config::Config;
use crate::core::types::Prefix;
use crate::engine::{self, PushOptions};
use crate::ghost::{CommitsBranchSpec, DiffBranchSpec};
use anyhow::{Context as _, Result};

use super::DEFAULT_FROM;

/// Push commits and/or local modifications, printing `<from> <hash>` per branch.
pub fn push(args: PushArgs, config: &Config) -> Result<()> {
    let options = push_options(args, config.ghost_prefix());
    let result = engine::push(config, &options).context("Failed to push ghost branches")?;
    print!("{}", result.pretty_string());
    Ok(())
}

fn push_options(args: PushArgs, prefix: &Prefix) -> PushOptions {
    let commits = |from: String, to: Option<String>| CommitsBranchSpec {
        prefix: prefix.clone(),
        committish_from: from,
        committish_to: to.unwrap_or_else(|| DEFAULT_FROM.to_string()),
    };
    let diff = |from: Option<String>| DiffBranchSpec {
        prefix: prefix.clone(),
        committish_from: from.unwrap_or_else(|| DEFAULT_FROM.to_string()),
        included_paths: args.include.paths.clone(),
        follow_symlinks: args.include.follow_symlinks,
    };

    match args.kind {
        None => PushOptions {
            commits: None,
            diff: Some(diff(args.from.clone())),
        },
        Some(PushKind::Diff { from }) => PushOptions {
            commits: None,
            diff: Some(diff(from)),
        },
        Some(PushKind::Commits { from, to }) => PushOptions {
            commits: Some(commits(from, to)),
            diff: None,
        },
        Some(PushKind::All {
            commits_from,
            diff_from,
        }) => PushOptions {
            commits: Some(commits(commits_from, None)),
            diff: Some(diff(diff_from)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::IncludeArgs;
    use std::path::PathBuf;

    fn args(kind: Option<PushKind>, from: Option<&str>) -> PushArgs {
        PushArgs {
            kind,
            from: from.map(str::to_string),
            include: IncludeArgs {
                paths: vec![PathBuf::from("extra.txt")],
                follow_symlinks: true,
            },
        }
    }

    #[test]
    fn default_is_diff_against_head() {
        let options = push_options(args(None, None), &Prefix::default());
        assert!(options.commits.is_none());
        let diff = options.diff.unwrap();
        assert_eq!(diff.committish_from, "HEAD");
        assert_eq!(diff.included_paths, vec![PathBuf::from("extra.txt")]);
        assert!(diff.follow_symlinks);
    }

    #[test]
    fn default_diff_uses_given_base() {
        let options = push_options(args(None, Some("HEAD~2")), &Prefix::default());
        assert_eq!(options.diff.unwrap().committish_from, "HEAD~2");
    }

    #[test]
    fn commits_default_to_head() {
        let kind = PushKind::Commits {
            from: "origin/main".into(),
            to: None,
        };
        let options = push_options(args(Some(kind), None), &Prefix::default());
        assert!(options.diff.is_none());
        let commits = options.commits.unwrap();
        assert_eq!(commits.committish_from, "origin/main");
        assert_eq!(commits.committish_to, "HEAD");
    }

    #[test]
    fn all_pushes_both() {
        let kind = PushKind::All {
            commits_from: "_".into(),
            diff_from: None,
        };
        let options = push_options(args(Some(kind), None), &Prefix::new("ci").unwrap());
        let commits = options.commits.unwrap();
        let diff = options.diff.unwrap();
        assert_eq!(commits.committish_from, "_");
        assert_eq!(commits.committish_to, "HEAD");
        assert_eq!(diff.committish_from, "HEAD");
        assert_eq!(diff.prefix.as_str(), "ci");
    }
}
