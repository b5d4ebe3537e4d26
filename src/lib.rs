//! git-ghost - Synchronize local modifications through ghost branches
//!
//! git-ghost moves work-in-progress between machines without touching the
//! source repository's history. Unpushed commits and uncommitted changes are
//! turned into patches, each patch is committed alone on an orphan branch in a
//! separate "ghost" repository, and the branch name records everything needed
//! to find and apply it again:
//!
//! - `{prefix}/{from}-{to}` holds the commits `from..to` (`_` as `from` means
//!   the whole history)
//! - `{prefix}/{from}/{hash}` holds a diff against `from`, where `hash` is the
//!   SHA-1 of the patch
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - push, pull, show, list and delete operations
//! - [`ghost`] - Branch specs, working environments, patch application
//! - [`core`] - Domain types, branch naming, configuration
//! - [`git`] - Repository inspection and git subprocesses
//! - [`ui`] - Output formatting

pub mod cli;
pub mod core;
pub mod engine;
pub mod ghost;
pub mod git;
pub mod ui;
