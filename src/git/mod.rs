//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports `git2`
//! or spawns a `git` process.
//!
//! - [`Git`] opens the *source* repository through `git2` for read-side
//!   queries: commit-ish resolution, existence checks, HEAD and identity.
//! - [`command`] runs the `git` binary for everything that mutates a
//!   repository or reaches the ghost remote. Transport (ssh, https, local
//!   paths) is whatever the installed git supports.
//!
//! # Example
//!
//! ```ignore
//! use git_ghost::git::{command, Git};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head()?;
//!
//! let branches = command::ls_remote_heads("git@example.com:ghost.git", &[])?;
//! ```

pub mod command;
mod interface;

pub use command::GitCommand;
pub use interface::{Git, GitError, Identity};
