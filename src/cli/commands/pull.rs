//! pull command - Apply ghost branches to the source directory

use crate::cli::args::{PullArgs, TargetKind};
use crate::core::config::Config;
use crate::core::types::{ContentHash, Prefix};
use crate::engine::{self, PullOptions};
use crate::ghost::{CommitsBranchSpec, PullableDiffBranchSpec};
use anyhow::{bail, Context as _, Result};

use super::DEFAULT_FROM;

/// Pull and apply the ghost branches named on the command line.
pub fn pull(args: PullArgs, config: &Config) -> Result<()> {
    let targets = targets(args.kind, args.hashes, config.ghost_prefix())?;
    let options = PullOptions {
        commits: targets.commits,
        diff: targets.diff,
        force: args.force,
    };
    engine::pull(config, &options).context("Failed to pull ghost branches")
}

/// Ghost branches addressed by positional hashes.
#[derive(Debug)]
pub(super) struct Targets {
    pub commits: Option<CommitsBranchSpec>,
    pub diff: Option<PullableDiffBranchSpec>,
}

/// Interpret positional hashes for pull and show.
///
/// - diff (default): `[FROM] DIFF_HASH`
/// - commits: `[FROM] TO`
/// - all: `[FROM] TO DIFF_HASH`, where the diff is based on TO
///
/// An omitted FROM is `HEAD`.
pub(super) fn targets(
    kind: Option<TargetKind>,
    hashes: Vec<String>,
    prefix: &Prefix,
) -> Result<Targets> {
    let commits = |from: &str, to: &str| CommitsBranchSpec {
        prefix: prefix.clone(),
        committish_from: from.to_string(),
        committish_to: to.to_string(),
    };
    let diff = |from: &str, hash: &str| -> Result<PullableDiffBranchSpec> {
        let diff_hash =
            ContentHash::new(hash).with_context(|| format!("Invalid diff hash '{hash}'"))?;
        Ok(PullableDiffBranchSpec {
            prefix: prefix.clone(),
            committish_from: from.to_string(),
            diff_hash,
        })
    };

    let diff_only = |hashes: Vec<String>| -> Result<Targets> {
        let (from, hash) = match hashes.as_slice() {
            [hash] => (DEFAULT_FROM, hash.as_str()),
            [from, hash] => (from.as_str(), hash.as_str()),
            _ => bail!("Expected [FROM] DIFF_HASH"),
        };
        Ok(Targets {
            commits: None,
            diff: Some(diff(from, hash)?),
        })
    };

    match kind {
        None => diff_only(hashes),
        Some(TargetKind::Diff { hashes }) => diff_only(hashes),
        Some(TargetKind::Commits { hashes }) => {
            let (from, to) = match hashes.as_slice() {
                [to] => (DEFAULT_FROM, to.as_str()),
                [from, to] => (from.as_str(), to.as_str()),
                _ => bail!("Expected [FROM] TO"),
            };
            Ok(Targets {
                commits: Some(commits(from, to)),
                diff: None,
            })
        }
        Some(TargetKind::All { hashes }) => {
            let (from, to, hash) = match hashes.as_slice() {
                [to, hash] => (DEFAULT_FROM, to.as_str(), hash.as_str()),
                [from, to, hash] => (from.as_str(), to.as_str(), hash.as_str()),
                _ => bail!("Expected [FROM] TO DIFF_HASH"),
            };
            Ok(Targets {
                commits: Some(commits(from, to)),
                diff: Some(diff(to, hash)?),
            })
        }
    }
}
