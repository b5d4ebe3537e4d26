//! core
//!
//! Core domain types and naming rules for git-ghost.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Prefix, CommitHash, ContentHash
//! - [`branch`] - Commits and diff ghost branches
//! - [`naming`] - Encoding and decoding of ghost branch names
//! - [`config`] - Configuration resolution
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - A branch name decodes to exactly one ghost branch, or none

pub mod branch;
pub mod config;
pub mod naming;
pub mod types;
