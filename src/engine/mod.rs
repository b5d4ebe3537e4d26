//! engine
//!
//! Orchestrates the user-facing verbs: push, pull, show, list and delete.
//!
//! # Architecture
//!
//! Each verb builds one or two specs from the command line, acquires a
//! [`WorkingEnv`](crate::ghost::WorkingEnv), lets each spec create or pull a
//! ghost branch inside it, and then pushes, applies or prints the result.
//! Working environments are dropped on every exit path.
//!
//! ```text
//! push:   spec --create--> branch --exists?--> git push      (one env per spec)
//! pull:   spec --pull----> branch --apply-->   src dir       (one env shared)
//! show:   spec --pull----> branch --cat-->     stdout        (one env per spec)
//! list:   ls-remote --decode--> branches
//! delete: list --> git push origin :branch                    (one env)
//! ```
//!
//! # Invariants
//!
//! - Every verb takes the immutable [`Config`](crate::core::config::Config)
//!   by reference; nothing here reads flags or environment
//! - Remote state is mutated only after the local artifact is fully committed
//! - A branch that already exists on the remote is never pushed again
//! - Commits are always applied before a diff in the same pull

pub mod delete;
pub mod list;
pub mod pull;
pub mod push;
pub mod show;

pub use delete::{delete, DeleteOptions, DeleteResult};
pub use list::{list, ListColumns, ListOptions, ListResult};
pub use pull::{pull, PullOptions};
pub use push::{publish, push, PushOptions, PushResult};
pub use show::{show, ShowOptions};
