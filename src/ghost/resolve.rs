//! ghost::resolve
//!
//! Turning user input into the values branch names are built from.
//!
//! # Commit-ish
//!
//! [`resolve_or_passthrough`] resolves a commit-ish to a full hash against the
//! source repository, and when that is not possible (the ref only exists on
//! another machine, or the source is not a repository yet) logs a warning and
//! keeps the input verbatim. Callers that need the commit to exist call
//! [`validate_committish`] first.
//!
//! # Included paths
//!
//! [`resolve_included_paths`] maps user-supplied paths to paths relative to the
//! source directory. Paths escaping the source directory and directories are
//! rejected. With symlink following, every link in a chain (at most
//! [`MAX_SYMLINK_DEPTH`] hops, relative targets only) adds its target too.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use super::GhostError;
use crate::core::types::{CommitHash, FULL_HISTORY};
use crate::git::Git;

/// Maximum number of symlink hops followed from an included path.
pub const MAX_SYMLINK_DEPTH: usize = 3;

/// Resolve `committish` to a full commit hash, or pass it through unchanged.
///
/// The full-history token is always passed through.
///
/// # Errors
///
/// Only fails for an empty commit-ish.
pub fn resolve_or_passthrough(src_dir: &Path, committish: &str) -> Result<CommitHash, GhostError> {
    if committish == FULL_HISTORY {
        return Ok(CommitHash::full_history());
    }
    let resolved = Git::open(src_dir).and_then(|git| git.resolve_commit(committish));
    match resolved {
        Ok(hash) => Ok(CommitHash::new(hash)?),
        Err(err) => {
            tracing::warn!(
                repository = %src_dir.display(),
                committish,
                error = %err,
                "cannot resolve commit-ish locally, using it as given"
            );
            Ok(CommitHash::new(committish)?)
        }
    }
}

/// Require `committish` to name an existing object in the source repository.
///
/// # Errors
///
/// - [`GhostError::Git`] if the source directory is not a repository
/// - [`GhostError::InvalidCommittish`] if the object does not exist
pub fn validate_committish(src_dir: &Path, committish: &str) -> Result<(), GhostError> {
    let git = Git::open(src_dir)?;
    git.verify_exists(committish)
        .map_err(|_| GhostError::InvalidCommittish {
            committish: committish.to_string(),
            repo: src_dir.to_path_buf(),
        })
}

/// Resolve included paths relative to `src_dir`.
///
/// The result is de-duplicated and sorted, so the same set of inputs always
/// produces the same patch. All failures are collected and reported together.
pub fn resolve_included_paths(
    src_dir: &Path,
    paths: &[PathBuf],
    follow_symlinks: bool,
) -> Result<Vec<PathBuf>, GhostError> {
    let mut resolved = BTreeSet::new();
    let mut errors = Vec::new();

    for path in paths {
        let relative = match resolve_included_path(src_dir, path) {
            Ok(relative) => relative,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };
        if follow_symlinks {
            match symlink_chain(src_dir, &relative) {
                Ok(targets) => resolved.extend(targets),
                Err(err) => errors.push(err),
            }
        }
        resolved.insert(relative);
    }

    match GhostError::from_many(errors) {
        Some(err) => Err(err),
        None => Ok(resolved.into_iter().collect()),
    }
}

/// Resolve one path to a file path relative to `src_dir`.
fn resolve_included_path(src_dir: &Path, path: &Path) -> Result<PathBuf, GhostError> {
    let src_dir = normalize(src_dir);
    let absolute = normalize(&src_dir.join(path));
    let relative = absolute
        .strip_prefix(&src_dir)
        .map_err(|_| GhostError::OutsideSourceDir {
            path: path.to_path_buf(),
            src_dir: src_dir.clone(),
        })?
        .to_path_buf();

    let meta = std::fs::metadata(&absolute).map_err(|source| GhostError::IncludedPath {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.is_dir() || relative.as_os_str().is_empty() {
        return Err(GhostError::DirectoryNotSupported {
            path: path.to_path_buf(),
        });
    }
    Ok(relative)
}

/// Targets of every symlink hop starting at `relative`, each relative to `src_dir`.
fn symlink_chain(src_dir: &Path, relative: &Path) -> Result<Vec<PathBuf>, GhostError> {
    let mut chain = vec![relative.to_path_buf()];
    let mut targets = Vec::new();
    let mut current = relative.to_path_buf();

    loop {
        let absolute = src_dir.join(&current);
        let meta =
            std::fs::symlink_metadata(&absolute).map_err(|source| GhostError::IncludedPath {
                path: current.clone(),
                source,
            })?;
        if !meta.file_type().is_symlink() {
            break;
        }
        if chain.len() > MAX_SYMLINK_DEPTH {
            return Err(GhostError::SymlinkTooDeep {
                chain: render_chain(&chain),
                max: MAX_SYMLINK_DEPTH,
            });
        }
        let target = std::fs::read_link(&absolute)?;
        if target.is_absolute() {
            return Err(GhostError::AbsoluteSymlink {
                chain: render_chain(&chain),
                target,
            });
        }
        let link_dir = current.parent().unwrap_or(Path::new(""));
        let next = resolve_included_path(src_dir, &link_dir.join(&target))?;
        targets.push(next.clone());
        chain.push(next.clone());
        current = next;
    }
    Ok(targets)
}

fn render_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Lexically normalize a path: drop `.` and fold `..` without touching the
/// filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn run_git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to run git");
        assert!(output.status.success(), "git {:?} failed", args);
    }

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        fs::write(dir.path().join("sample.txt"), "a\n").unwrap();
        run_git(dir.path(), &["add", "sample.txt"]);
        run_git(dir.path(), &["commit", "-q", "-m", "a"]);
        dir
    }

    // =========================================================================
    // Commit-ish
    // =========================================================================

    #[test]
    fn resolves_head() {
        let dir = repo();
        let hash = resolve_or_passthrough(dir.path(), "HEAD").unwrap();
        assert_eq!(hash.as_str().len(), 40);
    }

    #[test]
    fn unknown_commitish_passes_through() {
        let dir = repo();
        let hash = resolve_or_passthrough(dir.path(), "origin/elsewhere").unwrap();
        assert_eq!(hash.as_str(), "origin/elsewhere");
    }

    #[test]
    fn non_repository_passes_through() {
        let dir = TempDir::new().unwrap();
        let hash = resolve_or_passthrough(dir.path(), "abc123").unwrap();
        assert_eq!(hash.as_str(), "abc123");
    }

    #[test]
    fn full_history_is_never_resolved() {
        let dir = repo();
        assert!(resolve_or_passthrough(dir.path(), "_")
            .unwrap()
            .is_full_history());
    }

    #[test]
    fn validation_rejects_missing_commitish() {
        let dir = repo();
        assert!(validate_committish(dir.path(), "HEAD").is_ok());
        let err = validate_committish(dir.path(), "nope").unwrap_err();
        assert!(matches!(err, GhostError::InvalidCommittish { .. }));
    }

    // =========================================================================
    // Included paths
    // =========================================================================

    #[test]
    fn relative_and_absolute_paths_resolve() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), "x").unwrap();

        let resolved = resolve_included_paths(
            dir.path(),
            &[
                PathBuf::from("sub/file.txt"),
                dir.path().join("sub/./file.txt"),
                PathBuf::from("sub/../sub/file.txt"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(resolved, vec![PathBuf::from("sub/file.txt")]);
    }

    #[test]
    fn result_is_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b"), "b").unwrap();
        fs::write(dir.path().join("a"), "a").unwrap();
        let resolved =
            resolve_included_paths(dir.path(), &[PathBuf::from("b"), PathBuf::from("a")], false)
                .unwrap();
        assert_eq!(resolved, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn outside_source_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let err = resolve_included_paths(dir.path(), &[PathBuf::from("../escape")], false)
            .unwrap_err();
        assert!(matches!(err, GhostError::OutsideSourceDir { .. }));
    }

    #[test]
    fn directory_rejected() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let err = resolve_included_paths(dir.path(), &[PathBuf::from("sub")], false).unwrap_err();
        assert!(matches!(err, GhostError::DirectoryNotSupported { .. }));

        let err = resolve_included_paths(dir.path(), &[PathBuf::from(".")], false).unwrap_err();
        assert!(matches!(err, GhostError::DirectoryNotSupported { .. }));
    }

    #[test]
    fn missing_file_rejected() {
        let dir = TempDir::new().unwrap();
        let err = resolve_included_paths(dir.path(), &[PathBuf::from("missing")], false)
            .unwrap_err();
        assert!(matches!(err, GhostError::IncludedPath { .. }));
    }

    #[test]
    fn errors_are_aggregated() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let err = resolve_included_paths(
            dir.path(),
            &[PathBuf::from("sub"), PathBuf::from("../escape")],
            false,
        )
        .unwrap_err();
        match err {
            GhostError::Multiple(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    mod symlinks {
        use super::*;
        use std::os::unix::fs::symlink;

        #[test]
        fn link_target_included_when_following() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("included_file"), "x").unwrap();
            symlink("included_file", dir.path().join("included_link")).unwrap();

            let resolved =
                resolve_included_paths(dir.path(), &[PathBuf::from("included_link")], true)
                    .unwrap();
            assert_eq!(
                resolved,
                vec![PathBuf::from("included_file"), PathBuf::from("included_link")]
            );

            let resolved =
                resolve_included_paths(dir.path(), &[PathBuf::from("included_link")], false)
                    .unwrap();
            assert_eq!(resolved, vec![PathBuf::from("included_link")]);
        }

        #[test]
        fn targets_resolve_relative_to_link_directory() {
            let dir = TempDir::new().unwrap();
            fs::create_dir(dir.path().join("sub")).unwrap();
            fs::write(dir.path().join("sub/file"), "x").unwrap();
            symlink("file", dir.path().join("sub/link")).unwrap();

            let resolved =
                resolve_included_paths(dir.path(), &[PathBuf::from("sub/link")], true).unwrap();
            assert_eq!(
                resolved,
                vec![PathBuf::from("sub/file"), PathBuf::from("sub/link")]
            );
        }

        #[test]
        fn three_hops_allowed() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("file"), "x").unwrap();
            symlink("file", dir.path().join("l1")).unwrap();
            symlink("l1", dir.path().join("l2")).unwrap();
            symlink("l2", dir.path().join("l3")).unwrap();

            let resolved =
                resolve_included_paths(dir.path(), &[PathBuf::from("l3")], true).unwrap();
            assert_eq!(resolved.len(), 4);
        }

        #[test]
        fn four_hops_rejected() {
            let dir = TempDir::new().unwrap();
            fs::write(dir.path().join("file"), "x").unwrap();
            symlink("file", dir.path().join("l1")).unwrap();
            symlink("l1", dir.path().join("l2")).unwrap();
            symlink("l2", dir.path().join("l3")).unwrap();
            symlink("l3", dir.path().join("l4")).unwrap();

            let err = resolve_included_paths(dir.path(), &[PathBuf::from("l4")], true).unwrap_err();
            assert!(matches!(err, GhostError::SymlinkTooDeep { .. }));
        }

        #[test]
        fn absolute_target_rejected() {
            let dir = TempDir::new().unwrap();
            let target = dir.path().join("file");
            fs::write(&target, "x").unwrap();
            symlink(&target, dir.path().join("abs_link")).unwrap();

            let err =
                resolve_included_paths(dir.path(), &[PathBuf::from("abs_link")], true).unwrap_err();
            assert!(matches!(err, GhostError::AbsoluteSymlink { .. }));
        }

        #[test]
        fn target_outside_source_dir_rejected() {
            let outer = TempDir::new().unwrap();
            let src = outer.path().join("src");
            fs::create_dir(&src).unwrap();
            fs::write(outer.path().join("secret"), "x").unwrap();
            symlink("../secret", src.join("link")).unwrap();

            let err = resolve_included_paths(&src, &[PathBuf::from("link")], true).unwrap_err();
            assert!(matches!(err, GhostError::OutsideSourceDir { .. }));
        }
    }
}
