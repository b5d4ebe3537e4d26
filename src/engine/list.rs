//! engine::list
//!
//! Enumerate ghost branches on the ghost repository.

use crate::core::branch::{CommitsBranch, DiffBranch};
use crate::core::config::Config;
use crate::ghost::{GhostBranchList, GhostError, ListCommitsBranchSpec, ListDiffBranchSpec};
use crate::ui::output::{format_header, format_row};

/// Which kinds of branch to list, and how to filter them.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub commits: Option<ListCommitsBranchSpec>,
    pub diff: Option<ListDiffBranchSpec>,
}

/// Columns shown per branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListColumns {
    #[default]
    Both,
    OnlyFrom,
    OnlyTo,
}

/// Branches found, per requested kind. A kind that was not requested is
/// `None` and is left out of the output entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    pub commits: Option<Vec<CommitsBranch>>,
    pub diffs: Option<Vec<DiffBranch>>,
}

impl ListResult {
    pub(crate) fn from_list(list: GhostBranchList, options: &ListOptions) -> Self {
        Self {
            commits: options.commits.as_ref().map(|_| list.commits),
            diffs: options.diff.as_ref().map(|_| list.diffs),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commits.as_ref().is_none_or(Vec::is_empty)
            && self.diffs.as_ref().is_none_or(Vec::is_empty)
    }

    /// Render as text tables, one per requested kind.
    pub fn pretty_string(&self, headers: bool, columns: ListColumns) -> String {
        let mut out = String::new();

        if let Some(branches) = &self.commits {
            let rows = branches
                .iter()
                .map(|b| (b.hash_from.as_str(), b.hash_to.as_str()));
            render_section(&mut out, "Commits Branches:", ("From", "To"), rows, headers, columns);
        }

        if let Some(branches) = &self.diffs {
            let rows = branches
                .iter()
                .map(|b| (b.hash_from.as_str(), b.diff_hash.as_str()));
            render_section(&mut out, "Diff Branches:", ("From", "Diff Hash"), rows, headers, columns);
        }

        out
    }
}

fn render_section<'a>(
    out: &mut String,
    title: &str,
    labels: (&str, &str),
    rows: impl Iterator<Item = (&'a str, &'a str)>,
    headers: bool,
    columns: ListColumns,
) {
    if headers {
        out.push_str(title);
        out.push_str("\n\n");
        out.push_str(&format_header(&select(columns, labels)));
        out.push('\n');
    }
    for row in rows {
        out.push_str(&format_row(&select(columns, row)));
        out.push('\n');
    }
    if headers {
        out.push('\n');
    }
}

fn select<T: Copy>(columns: ListColumns, (from, to): (T, T)) -> Vec<T> {
    match columns {
        ListColumns::Both => vec![from, to],
        ListColumns::OnlyFrom => vec![from],
        ListColumns::OnlyTo => vec![to],
    }
}

/// List ghost branches matching `options`.
///
/// Filters are resolved against the source directory when possible.
pub fn list(config: &Config, options: &ListOptions) -> Result<ListResult, GhostError> {
    let options = resolve(config, options)?;
    let list = GhostBranchList::fetch(
        config.ghost_repo(),
        options.commits.as_ref(),
        options.diff.as_ref(),
    )?;
    Ok(ListResult::from_list(list, &options))
}

pub(crate) fn resolve(config: &Config, options: &ListOptions) -> Result<ListOptions, GhostError> {
    let src_dir = config.src_dir();
    Ok(ListOptions {
        commits: options
            .commits
            .as_ref()
            .map(|spec| spec.resolve(src_dir))
            .transpose()?,
        diff: options
            .diff
            .as_ref()
            .map(|spec| spec.resolve(src_dir))
            .transpose()?,
    })
}
