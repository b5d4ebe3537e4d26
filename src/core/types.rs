//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Prefix`] - Validated ghost branch prefix
//! - [`CommitHash`] - Resolved (or passed-through) commit identifier
//! - [`ContentHash`] - SHA-1 content hash of a diff patch
//!
//! # Validation
//!
//! Prefixes and content hashes are validated at construction time against the
//! same alphabet the branch-name decoder accepts, so every branch this crate
//! names can be decoded again. Commit hashes are loose: a
//! commit-ish that cannot be resolved locally is passed through verbatim.
//!
//! # Examples
//!
//! ```
//! use git_ghost::core::types::{CommitHash, ContentHash, Prefix};
//!
//! let prefix = Prefix::new("ghost").unwrap();
//! let from = CommitHash::full_history();
//! let diff = ContentHash::new("3ca7a6cfa4d0e3d3b8d8ea6a1bf9f4c2a8c5e0d1").unwrap();
//!
//! assert_eq!(prefix.as_str(), "ghost");
//! assert!(from.is_full_history());
//! assert_eq!(diff.as_str().len(), 40);
//!
//! assert!(Prefix::new("Ghost/").is_err());
//! assert!(ContentHash::new("not-hex").is_err());
//! ```

use sha1::{Digest, Sha1};
use thiserror::Error;

/// Token used in place of a base commit when a commits branch carries the
/// whole history up to its target.
pub const FULL_HISTORY: &str = "_";

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid ghost prefix: {0}")]
    InvalidPrefix(String),

    #[error("invalid content hash: {0}")]
    InvalidContentHash(String),

    #[error("invalid commit hash: {0}")]
    InvalidCommitHash(String),
}

/// A validated ghost branch prefix.
///
/// Prefixes are the first path segment of every ghost branch and must
/// consist of lowercase ASCII letters and digits only.
///
/// # Example
///
/// ```
/// use git_ghost::core::types::Prefix;
///
/// assert!(Prefix::new("ghost").is_ok());
/// assert!(Prefix::new("ci2").is_ok());
///
/// assert!(Prefix::new("").is_err());
/// assert!(Prefix::new("my-ghost").is_err());
/// assert!(Prefix::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix(String);

impl Prefix {
    /// The prefix used when nothing else is configured.
    pub const DEFAULT: &'static str = "ghost";

    /// Create a new validated prefix.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPrefix` if the prefix is empty or contains
    /// anything other than `[a-z0-9]`.
    pub fn new(prefix: impl Into<String>) -> Result<Self, TypeError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(TypeError::InvalidPrefix("prefix cannot be empty".into()));
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(TypeError::InvalidPrefix(format!(
                "'{prefix}' must contain only lowercase letters and digits"
            )));
        }
        Ok(Self(prefix))
    }

    /// Get the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for Prefix {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit identifier as it appears in a ghost branch name.
///
/// Usually a full hex object id produced by resolution, the
/// [`FULL_HISTORY`] token, or the raw user input when resolution was not
/// possible on this machine.
///
/// # Example
///
/// ```
/// use git_ghost::core::types::CommitHash;
///
/// let hash = CommitHash::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// assert!(!hash.is_full_history());
/// assert!(CommitHash::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitHash(String);

impl CommitHash {
    /// Create a commit hash.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidCommitHash` for an empty or whitespace-only value.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(TypeError::InvalidCommitHash(
                "commit hash cannot be empty".into(),
            ));
        }
        Ok(Self(hash))
    }

    /// The full-history token.
    pub fn full_history() -> Self {
        Self(FULL_HISTORY.to_string())
    }

    /// Check if this is the full-history token.
    pub fn is_full_history(&self) -> bool {
        self.0 == FULL_HISTORY
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CommitHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a diff patch.
///
/// Lowercase hexadecimal. Computed hashes are always 40 characters (SHA-1);
/// hashes supplied by the user or decoded from the remote are accepted at any
/// non-zero length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Create a validated content hash. Uppercase input is normalized.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidContentHash` if the value is empty or not hex.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into().to_ascii_lowercase();
        if hash.is_empty() {
            return Err(TypeError::InvalidContentHash(
                "content hash cannot be empty".into(),
            ));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidContentHash(format!(
                "'{hash}' is not hexadecimal"
            )));
        }
        Ok(Self(hash))
    }

    /// SHA-1 digest of `data`.
    ///
    /// # Example
    ///
    /// ```
    /// use git_ghost::core::types::ContentHash;
    ///
    /// let hash = ContentHash::of(b"hello\n");
    /// assert_eq!(hash.as_str(), "f572d396fae9206628714fb2ce00f72e94f2258f");
    /// ```
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod prefix {
        use super::*;

        #[test]
        fn valid_prefixes() {
            assert!(Prefix::new("ghost").is_ok());
            assert!(Prefix::new("g").is_ok());
            assert!(Prefix::new("0123").is_ok());
            assert!(Prefix::new("ci42abc").is_ok());
        }

        #[test]
        fn empty_rejected() {
            assert!(Prefix::new("").is_err());
        }

        #[test]
        fn uppercase_rejected() {
            assert!(Prefix::new("Ghost").is_err());
        }

        #[test]
        fn separators_rejected() {
            assert!(Prefix::new("my-ghost").is_err());
            assert!(Prefix::new("my_ghost").is_err());
            assert!(Prefix::new("a/b").is_err());
            assert!(Prefix::new("a.b").is_err());
        }

        #[test]
        fn default_is_ghost() {
            assert_eq!(Prefix::default().as_str(), "ghost");
        }
    }

    mod commit_hash {
        use super::*;

        #[test]
        fn full_history_token() {
            let hash = CommitHash::full_history();
            assert!(hash.is_full_history());
            assert_eq!(hash.as_str(), "_");
            assert_eq!(CommitHash::new("_").unwrap(), hash);
        }

        #[test]
        fn passthrough_values_accepted() {
            let hash = CommitHash::new("origin/main").unwrap();
            assert_eq!(hash.to_string(), "origin/main");
        }

        #[test]
        fn blank_rejected() {
            assert!(CommitHash::new("").is_err());
            assert!(CommitHash::new("  ").is_err());
        }
    }

    mod content_hash {
        use super::*;

        #[test]
        fn normalized_to_lowercase() {
            let hash = ContentHash::new("ABCDEF0123").unwrap();
            assert_eq!(hash.as_str(), "abcdef0123");
        }

        #[test]
        fn non_hex_rejected() {
            assert!(ContentHash::new("xyz").is_err());
            assert!(ContentHash::new("").is_err());
            assert!(ContentHash::new("abc-def").is_err());
        }

        #[test]
        fn digest_of_empty_input() {
            assert_eq!(
                ContentHash::of(b"").as_str(),
                "da39a3ee5e6b4b0d3255bfef95601890afd80709"
            );
        }

        #[test]
        fn digest_is_deterministic() {
            assert_eq!(ContentHash::of(b"-b\n+c\n"), ContentHash::of(b"-b\n+c\n"));
            assert_ne!(ContentHash::of(b"-b\n+c\n"), ContentHash::of(b"-b\n+d\n"));
        }
    }
}
