//! git::interface
//!
//! Read-side access to the source repository via `git2`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref or commit-ish does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// A git subprocess exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// A git subprocess could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error while feeding or collecting subprocess data.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the commit-ish being looked up.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => GitError::RefNotFound {
                refname: context.to_string(),
            },
            git2::ErrorCode::UnbornBranch => GitError::RefNotFound {
                refname: format!("{context} (unborn branch)"),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// Committer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Identity used when the source repository has none configured.
    pub fn fallback() -> Self {
        Self {
            name: "git-ghost".to_string(),
            email: "git-ghost@localhost".to_string(),
        }
    }
}

/// Read-only handle on a local repository.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("path", &self.repo.path()).finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Access
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository encloses `path`
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    // =========================================================================
    // Commit Resolution
    // =========================================================================

    /// Resolve a commit-ish to the full hex id of the commit it names.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let git = Git::open(Path::new("."))?;
    /// let head = git.resolve_commit("HEAD~1")?;
    /// assert_eq!(head.len(), 40);
    /// ```
    pub fn resolve_commit(&self, committish: &str) -> Result<String, GitError> {
        let object = self
            .repo
            .revparse_single(committish)
            .map_err(|e| GitError::from_git2(e, committish))?;
        let commit = object
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, committish))?;
        Ok(commit.id().to_string())
    }

    /// Check that a commit-ish names an existing object.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if it does not.
    pub fn verify_exists(&self, committish: &str) -> Result<(), GitError> {
        self.repo
            .revparse_single(committish)
            .map(|_| ())
            .map_err(|e| GitError::from_git2(e, committish))
    }

    /// Full hex id of the commit HEAD points at.
    pub fn head(&self) -> Result<String, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        Ok(commit.id().to_string())
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Committer identity from the repository's effective configuration.
    ///
    /// Returns `None` unless both `user.name` and `user.email` are set.
    pub fn user_identity(&self) -> Option<Identity> {
        let config = self.repo.config().ok()?;
        let name = config.get_string("user.name").ok()?;
        let email = config.get_string("user.email").ok()?;
        Some(Identity { name, email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    fn run_git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn repo_with_commits() -> TempDir {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        std::fs::write(dir.path().join("sample.txt"), "a\n").unwrap();
        run_git(dir.path(), &["add", "sample.txt"]);
        run_git(dir.path(), &["commit", "-q", "-m", "a"]);
        std::fs::write(dir.path().join("sample.txt"), "b\n").unwrap();
        run_git(dir.path(), &["commit", "-q", "-am", "b"]);
        dir
    }

    #[test]
    fn open_outside_repo_fails() {
        let dir = TempDir::new().unwrap();
        let err = Git::open(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::NotARepo { .. }));
    }

    #[test]
    fn resolves_relative_commitish() {
        let dir = repo_with_commits();
        let git = Git::open(dir.path()).unwrap();
        let head = git.head().unwrap();
        let parent = git.resolve_commit("HEAD~1").unwrap();
        assert_eq!(head.len(), 40);
        assert_ne!(head, parent);
        assert_eq!(git.resolve_commit("HEAD").unwrap(), head);
        assert_eq!(git.resolve_commit(&head[..8]).unwrap(), head);
    }

    #[test]
    fn unknown_commitish_is_not_found() {
        let dir = repo_with_commits();
        let git = Git::open(dir.path()).unwrap();
        assert!(matches!(
            git.resolve_commit("no-such-branch"),
            Err(GitError::RefNotFound { .. })
        ));
        assert!(git.verify_exists("no-such-branch").is_err());
        assert!(git.verify_exists("HEAD~1").is_ok());
    }

    #[test]
    fn head_of_empty_repo_is_not_found() {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        let git = Git::open(dir.path()).unwrap();
        assert!(matches!(git.head(), Err(GitError::RefNotFound { .. })));
    }

    #[test]
    fn reads_identity() {
        let dir = repo_with_commits();
        let git = Git::open(dir.path()).unwrap();
        let identity = git.user_identity().unwrap();
        assert_eq!(identity.name, "Test User");
        assert_eq!(identity.email, "test@example.com");
    }
}
