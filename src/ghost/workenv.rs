//! ghost::workenv
//!
//! The working environment: an ephemeral clone of the ghost repository used
//! to stage every create, pull and show.
//!
//! A [`WorkingEnv`] owns its temporary directory. Dropping it removes the
//! directory on every exit path; removal failures are logged and never
//! replace the result of the operation that used the env.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::GhostError;
use crate::core::config::Config;
use crate::git::{command, Git, Identity};

/// Prefix of every working environment directory.
const WORKING_DIR_PREFIX: &str = "git-ghost-";

/// Everything needed to set up a working environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingEnvSpec {
    pub src_dir: PathBuf,
    pub ghost_working_dir: PathBuf,
    pub ghost_repo: String,
}

impl WorkingEnvSpec {
    pub fn from_config(config: &Config) -> Self {
        Self {
            src_dir: config.src_dir().to_path_buf(),
            ghost_working_dir: config.ghost_working_dir().to_path_buf(),
            ghost_repo: config.ghost_repo().to_string(),
        }
    }

    /// Clone the ghost repository into a fresh temporary directory and
    /// configure the committer identity.
    pub fn initialize(&self) -> Result<WorkingEnv, GhostError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKING_DIR_PREFIX)
            .tempdir_in(&self.ghost_working_dir)?;
        // The env owns the directory from here on, so a failed clone still cleans up.
        let env = WorkingEnv {
            src_dir: self.src_dir.clone(),
            ghost_working_dir: self.ghost_working_dir.clone(),
            ghost_repo: self.ghost_repo.clone(),
            dir: Some(dir),
        };

        tracing::debug!(
            ghost_repo = %self.ghost_repo,
            ghost_dir = %env.ghost_dir().display(),
            "cloning ghost repository"
        );
        command::clone(&self.ghost_repo, env.ghost_dir())?;

        let identity = self.identity();
        command::set_config(env.ghost_dir(), "user.name", &identity.name)?;
        command::set_config(env.ghost_dir(), "user.email", &identity.email)?;

        Ok(env)
    }

    /// Identity of the source repository, or the fallback identity.
    fn identity(&self) -> Identity {
        Git::open(&self.src_dir)
            .ok()
            .and_then(|git| git.user_identity())
            .unwrap_or_else(|| {
                tracing::debug!(
                    src_dir = %self.src_dir.display(),
                    "no user identity in source repository, using fallback"
                );
                Identity::fallback()
            })
    }
}

/// A live working environment.
#[derive(Debug)]
pub struct WorkingEnv {
    src_dir: PathBuf,
    ghost_working_dir: PathBuf,
    ghost_repo: String,
    dir: Option<TempDir>,
}

impl WorkingEnv {
    /// Clone of the ghost repository.
    pub fn ghost_dir(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    /// Parent directory of the clone. Temporary files are created here so
    /// they can be renamed into the clone atomically.
    pub fn ghost_working_dir(&self) -> &Path {
        &self.ghost_working_dir
    }

    pub fn ghost_repo(&self) -> &str {
        &self.ghost_repo
    }
}

impl Drop for WorkingEnv {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => tracing::debug!(ghost_dir = %path.display(), "removed working env"),
                Err(err) => tracing::warn!(
                    ghost_dir = %path.display(),
                    error = %err,
                    "failed to remove working env"
                ),
            }
        }
    }
}
