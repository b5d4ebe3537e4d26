//! core::config
//!
//! Immutable run configuration.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Environment (`GIT_GHOST_PREFIX`, `GIT_GHOST_REPO`)
//! 3. CLI flags
//!
//! Steps 2 and 3 are merged by the argument parser before a
//! [`ConfigSources`] reaches [`Config::resolve`]; this module applies the
//! defaults and validates the result. The resulting [`Config`] is built once
//! per process and passed by reference to every operation.
//!
//! # Example
//!
//! ```
//! use git_ghost::core::config::{Config, ConfigSources};
//!
//! let sources = ConfigSources {
//!     ghost_repo: Some("https://example.com/ghost.git".into()),
//!     ..Default::default()
//! };
//! let config = Config::resolve(sources).unwrap();
//! assert_eq!(config.ghost_prefix().as_str(), "ghost");
//! assert!(config.src_dir().is_absolute());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Prefix, TypeError};

/// Errors from configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ghost repository is required (set --ghost-repo or GIT_GHOST_REPO)")]
    MissingGhostRepo,

    #[error("ghost working directory '{path}' does not exist")]
    WorkingDirNotFound { path: PathBuf },

    #[error("ghost working directory '{path}' is not a directory")]
    WorkingDirNotADirectory { path: PathBuf },

    #[error(transparent)]
    InvalidPrefix(#[from] TypeError),

    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Raw configuration values as supplied by flags or environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub src_dir: Option<PathBuf>,
    pub ghost_working_dir: Option<PathBuf>,
    pub ghost_prefix: Option<String>,
    pub ghost_repo: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    src_dir: PathBuf,
    ghost_working_dir: PathBuf,
    ghost_prefix: Prefix,
    ghost_repo: String,
}

impl Config {
    /// Apply defaults and validate.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingGhostRepo`] if no repository was given
    /// - [`ConfigError::WorkingDirNotFound`] if the working directory is missing
    /// - [`ConfigError::InvalidPrefix`] if the prefix is malformed
    pub fn resolve(sources: ConfigSources) -> Result<Self, ConfigError> {
        let ghost_repo = sources
            .ghost_repo
            .map(|repo| repo.trim().to_string())
            .filter(|repo| !repo.is_empty())
            .ok_or(ConfigError::MissingGhostRepo)?;

        let ghost_prefix = match sources.ghost_prefix {
            Some(prefix) => Prefix::new(prefix)?,
            None => Prefix::default(),
        };

        let src_dir = match sources.src_dir {
            Some(dir) => std::path::absolute(&dir).map_err(ConfigError::CurrentDir)?,
            None => std::env::current_dir().map_err(ConfigError::CurrentDir)?,
        };

        let ghost_working_dir = sources
            .ghost_working_dir
            .unwrap_or_else(std::env::temp_dir);
        check_working_dir(&ghost_working_dir)?;

        Ok(Self {
            src_dir,
            ghost_working_dir,
            ghost_prefix,
            ghost_repo,
        })
    }

    /// Local repository ghost branches are created from and applied to.
    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Directory that holds ephemeral clones of the ghost repository.
    pub fn ghost_working_dir(&self) -> &Path {
        &self.ghost_working_dir
    }

    pub fn ghost_prefix(&self) -> &Prefix {
        &self.ghost_prefix
    }

    /// URL (or path) of the ghost repository.
    pub fn ghost_repo(&self) -> &str {
        &self.ghost_repo
    }
}

fn check_working_dir(path: &Path) -> Result<(), ConfigError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::WorkingDirNotADirectory {
            path: path.to_path_buf(),
        }),
        Err(_) => Err(ConfigError::WorkingDirNotFound {
            path: path.to_path_buf(),
        }),
    }
}
