//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--src-dir <dir>`: Local repository to work on
//! - `--ghost-working-dir <dir>`: Where temporary clones are made
//! - `--ghost-prefix <prefix>`: Prefix of ghost branch names (`GIT_GHOST_PREFIX`)
//! - `--ghost-repo <url>`: Ghost repository (`GIT_GHOST_REPO`)
//! - `-v` / `--verbose`: More logging, repeatable
//!
//! Positional hashes are kept as given; [`crate::cli::commands`] applies the
//! per-verb defaults (`HEAD` for omitted bases).

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::config::ConfigSources;
use crate::engine::ListColumns;

/// git-ghost - Synchronize local modifications and unpushed commits through
/// ghost branches on a shared repository
#[derive(Parser, Debug)]
#[command(name = "git-ghost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source directory ghost branches are created from or applied to [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    /// Directory for temporary clones of the ghost repository [default: system temp dir]
    #[arg(long, global = true, value_name = "DIR")]
    pub ghost_working_dir: Option<PathBuf>,

    /// Prefix of ghost branch names [default: ghost]
    #[arg(long, global = true, env = "GIT_GHOST_PREFIX", value_name = "PREFIX")]
    pub ghost_prefix: Option<String>,

    /// URL of the ghost repository
    #[arg(long, global = true, env = "GIT_GHOST_REPO", value_name = "URL")]
    pub ghost_repo: Option<String>,

    /// Increase logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Configuration inputs gathered from flags and environment.
    pub fn config_sources(&self) -> ConfigSources {
        ConfigSources {
            src_dir: self.src_dir.clone(),
            ghost_working_dir: self.ghost_working_dir.clone(),
            ghost_prefix: self.ghost_prefix.clone(),
            ghost_repo: self.ghost_repo.clone(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push commits or local modifications to the ghost repository
    #[command(
        name = "push",
        long_about = "Push commits or local modifications to the ghost repository.\n\n\
            Without a subcommand this pushes a diff of the working tree against \
            FROM (default HEAD). On success each pushed branch is printed as \
            '<from> <hash>' so it can be passed to pull or show.",
        after_help = "\
EXAMPLES:
    # Local modifications against HEAD
    git-ghost push

    # Commits not on origin/main, then the working tree on top of them
    git-ghost push all origin/main

    # Include an untracked file
    git-ghost push --include notes.txt"
    )]
    Push(PushArgs),

    /// Pull ghost branches and apply them to the source directory
    #[command(
        name = "pull",
        long_about = "Pull ghost branches and apply them to the source directory.\n\n\
            Without a subcommand this applies the diff branch DIFF_HASH based on \
            FROM (default HEAD). HEAD must be at the branch's base unless --force \
            is given.",
        after_help = "\
EXAMPLES:
    # Apply a diff printed by push
    git-ghost pull <diff-hash>

    # Apply commits and then a diff on top of them
    git-ghost pull all <from> <to> <diff-hash>"
    )]
    Pull(PullArgs),

    /// Print the patch of ghost branches
    #[command(name = "show")]
    Show(ShowArgs),

    /// List ghost branches
    #[command(name = "list")]
    List(ListArgs),

    /// Delete ghost branches
    #[command(
        name = "delete",
        after_help = "\
EXAMPLES:
    # See what would be deleted
    git-ghost delete all --dry-run

    # Delete one diff branch
    git-ghost delete --from <from> --to <diff-hash>"
    )]
    Delete(DeleteArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// =============================================================================
// push
// =============================================================================

#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(subcommand)]
    pub kind: Option<PushKind>,

    /// Base commit of the diff [default: HEAD]
    pub from: Option<String>,

    #[command(flatten)]
    pub include: IncludeArgs,
}

/// Extra files folded into a diff.
#[derive(Args, Debug, Default)]
pub struct IncludeArgs {
    /// Include a file that is not tracked by git (repeatable)
    #[arg(short = 'I', long = "include", global = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Also include the targets of symlinks given with --include
    #[arg(long, global = true)]
    pub follow_symlinks: bool,
}

#[derive(Subcommand, Debug)]
pub enum PushKind {
    /// Push commits FROM..TO ('_' as FROM pushes the whole history)
    Commits {
        from: String,
        /// [default: HEAD]
        to: Option<String>,
    },
    /// Push local modifications against FROM
    Diff {
        /// [default: HEAD]
        from: Option<String>,
    },
    /// Push commits COMMITS_FROM..HEAD and local modifications against DIFF_FROM
    All {
        commits_from: String,
        /// [default: HEAD]
        diff_from: Option<String>,
    },
}

// =============================================================================
// pull / show
// =============================================================================

#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(subcommand)]
    pub kind: Option<TargetKind>,

    /// [FROM] DIFF_HASH
    #[arg(value_name = "HASH", num_args = 1..=2)]
    pub hashes: Vec<String>,

    /// Apply even if HEAD is not the base of the ghost branch
    #[arg(long, global = true)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(subcommand)]
    pub kind: Option<TargetKind>,

    /// [FROM] DIFF_HASH
    #[arg(value_name = "HASH", num_args = 1..=2)]
    pub hashes: Vec<String>,
}

/// Which ghost branches to pull or show.
#[derive(Subcommand, Debug)]
pub enum TargetKind {
    /// Commits branch: [FROM] TO (FROM defaults to HEAD)
    Commits {
        #[arg(value_name = "HASH", required = true, num_args = 1..=2)]
        hashes: Vec<String>,
    },
    /// Diff branch: [FROM] DIFF_HASH (FROM defaults to HEAD)
    Diff {
        #[arg(value_name = "HASH", required = true, num_args = 1..=2)]
        hashes: Vec<String>,
    },
    /// Commits then diff: [FROM] TO DIFF_HASH (FROM defaults to HEAD)
    All {
        #[arg(value_name = "HASH", required = true, num_args = 2..=3)]
        hashes: Vec<String>,
    },
}

// =============================================================================
// list / delete
// =============================================================================

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(subcommand)]
    pub kind: Option<KindFilter>,

    #[command(flatten)]
    pub filter: HashFilter,

    /// Do not print section headers
    #[arg(long, global = true)]
    pub no_headers: bool,

    /// Print only one column
    #[arg(short = 'o', long = "output", global = true, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(subcommand)]
    pub kind: Option<KindFilter>,

    #[command(flatten)]
    pub filter: HashFilter,

    /// Allow deleting more than one branch
    #[arg(long, global = true)]
    pub all: bool,

    /// Only print the branches that would be deleted
    #[arg(long, global = true)]
    pub dry_run: bool,
}

/// Which kinds of branch to list or delete.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    /// Commits branches
    Commits,
    /// Diff branches
    Diff,
    /// Both kinds
    All,
}

/// Name filters shared by list and delete.
#[derive(Args, Debug, Default)]
pub struct HashFilter {
    /// Base commit of the branches
    #[arg(long, global = true, value_name = "HASH")]
    pub from: Option<String>,

    /// Target commit (commits branches) or diff hash (diff branches)
    #[arg(long, global = true, value_name = "HASH")]
    pub to: Option<String>,
}

/// Single-column output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    OnlyFrom,
    OnlyTo,
}

impl From<Option<OutputFormat>> for ListColumns {
    fn from(format: Option<OutputFormat>) -> Self {
        match format {
            None => ListColumns::Both,
            Some(OutputFormat::OnlyFrom) => ListColumns::OnlyFrom,
            Some(OutputFormat::OnlyTo) => ListColumns::OnlyTo,
        }
    }
}

/// Shells supported by `completion`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("git-ghost").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn push_without_subcommand() {
        let cli = parse(&["push", "--include", "a.txt", "-I", "b.txt"]);
        match cli.command {
            Command::Push(args) => {
                assert!(args.kind.is_none());
                assert!(args.from.is_none());
                assert_eq!(args.include.paths.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn push_subcommand_with_trailing_flags() {
        let cli = parse(&["push", "diff", "HEAD~1", "--include", "x", "--follow-symlinks"]);
        match cli.command {
            Command::Push(args) => {
                assert!(matches!(args.kind, Some(PushKind::Diff { from: Some(ref f) }) if f == "HEAD~1"));
                assert_eq!(args.include.paths, vec![PathBuf::from("x")]);
                assert!(args.include.follow_symlinks);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pull_positional_hashes() {
        let cli = parse(&["pull", "abc", "--force"]);
        match cli.command {
            Command::Pull(args) => {
                assert!(args.kind.is_none());
                assert_eq!(args.hashes, vec!["abc"]);
                assert!(args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn pull_all_takes_up_to_three_hashes() {
        let cli = parse(&["pull", "all", "a", "b", "c"]);
        match cli.command {
            Command::Pull(PullArgs {
                kind: Some(TargetKind::All { hashes }),
                ..
            }) => assert_eq!(hashes, vec!["a", "b", "c"]),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Cli::try_parse_from(["git-ghost", "pull", "all", "a", "b", "c", "d"]).is_err());
        assert!(Cli::try_parse_from(["git-ghost", "pull", "all", "a"]).is_err());
    }

    #[test]
    fn list_flags_after_subcommand() {
        let cli = parse(&["list", "commits", "--no-headers", "-o", "only-to", "--from", "x"]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.kind, Some(KindFilter::Commits));
                assert!(args.no_headers);
                assert_eq!(args.output, Some(OutputFormat::OnlyTo));
                assert_eq!(args.filter.from.as_deref(), Some("x"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn invalid_output_rejected() {
        assert!(Cli::try_parse_from(["git-ghost", "list", "-o", "json"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = parse(&["delete", "all", "-vv", "--all"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn global_flags_anywhere() {
        let cli = parse(&["list", "--ghost-repo", "r", "--ghost-prefix", "ci"]);
        assert_eq!(cli.ghost_repo.as_deref(), Some("r"));
        assert_eq!(cli.ghost_prefix.as_deref(), Some("ci"));
    }
}
