//! list command - List ghost branches on the ghost repository

use crate::cli::args::{HashFilter, KindFilter, ListArgs};
use crate::core::config::Config;
use crate::core::types::Prefix;
use crate::engine::{self, ListOptions};
use crate::ghost::{ListCommitsBranchSpec, ListDiffBranchSpec};
use anyhow::{Context as _, Result};

/// List ghost branches, diff branches unless another kind is given.
pub fn list(args: ListArgs, config: &Config) -> Result<()> {
    let options = list_options(args.kind, &args.filter, config.ghost_prefix());
    let result = engine::list(config, &options).context("Failed to list ghost branches")?;
    print!("{}", result.pretty_string(!args.no_headers, args.output.into()));
    Ok(())
}

/// Build list filters. Empty filter values count as unset.
pub(super) fn list_options(
    kind: Option<KindFilter>,
    filter: &HashFilter,
    prefix: &Prefix,
) -> ListOptions {
    let kind = kind.unwrap_or(KindFilter::Diff);
    let from = non_empty(&filter.from);
    let to = non_empty(&filter.to);

    let commits = matches!(kind, KindFilter::Commits | KindFilter::All).then(|| {
        ListCommitsBranchSpec {
            prefix: prefix.clone(),
            hash_from: from.clone(),
            hash_to: to.clone(),
        }
    });
    let diff = matches!(kind, KindFilter::Diff | KindFilter::All).then(|| ListDiffBranchSpec {
        prefix: prefix.clone(),
        hash_from: from.clone(),
        diff_hash: to.clone(),
    });

    ListOptions { commits, diff }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
