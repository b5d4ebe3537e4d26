//! git::command
//!
//! Runs the `git` binary for everything that mutates a repository or talks to
//! a remote: clone, orphan commits, push, ls-remote, diff/log capture, am and
//! apply. Every invocation captures stderr so failures carry git's own
//! message.

use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use super::interface::GitError;

/// Builder for a single git invocation.
#[derive(Debug, Clone)]
pub struct GitCommand {
    dir: Option<PathBuf>,
    args: Vec<OsString>,
}

impl GitCommand {
    /// A git command run in the process working directory.
    pub fn new() -> Self {
        Self {
            dir: None,
            args: Vec::new(),
        }
    }

    /// A git command run as `git -C <dir> ...`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dir: Some(dir.to_path_buf()),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Command line as shown in logs and errors.
    pub fn render(&self) -> String {
        let mut parts = vec!["git".to_string()];
        if let Some(dir) = &self.dir {
            parts.push("-C".to_string());
            parts.push(dir.display().to_string());
        }
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("git");
        if let Some(dir) = &self.dir {
            cmd.arg("-C").arg(dir);
        }
        cmd.args(&self.args).stdin(Stdio::null());
        cmd
    }

    fn output(&self, stdout: Stdio) -> Result<Output, GitError> {
        tracing::debug!(command = %self.render(), "exec");
        self.command()
            .stdout(stdout)
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| GitError::Spawn {
                command: self.render(),
                source,
            })
    }

    fn check(&self, status: ExitStatus, stderr: &[u8], ok_codes: &[i32]) -> Result<(), GitError> {
        let accepted = status.success() || status.code().is_some_and(|c| ok_codes.contains(&c));
        if accepted {
            return Ok(());
        }
        Err(GitError::CommandFailed {
            command: self.render(),
            status: status.to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        })
    }

    /// Run and return stdout.
    pub fn run(self) -> Result<Vec<u8>, GitError> {
        let output = self.output(Stdio::piped())?;
        self.check(output.status, &output.stderr, &[])?;
        Ok(output.stdout)
    }

    /// Run and return stdout as trimmed text.
    pub fn run_text(self) -> Result<String, GitError> {
        let stdout = self.run()?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    /// Run with stdout redirected into `file`. Exit codes in `ok_codes` are
    /// treated as success in addition to 0.
    pub fn run_into(self, file: File, ok_codes: &[i32]) -> Result<(), GitError> {
        let output = self.output(Stdio::from(file))?;
        self.check(output.status, &output.stderr, ok_codes)
    }

    /// Run while copying stdout into `writer` as it is produced.
    pub fn stream_into(self, writer: &mut dyn Write) -> Result<(), GitError> {
        tracing::debug!(command = %self.render(), "exec");
        let mut child = self
            .command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| GitError::Spawn {
                command: self.render(),
                source,
            })?;

        // stderr drains on its own thread so a chatty child cannot block
        // while stdout is still being copied.
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf).map(|_| buf)
            })
        });

        let copied = match child.stdout.take() {
            Some(mut stdout) => std::io::copy(&mut stdout, writer).and_then(|_| writer.flush()),
            None => Ok(()),
        };
        if let Err(err) = copied {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err.into());
        }

        let status = child.wait()?;
        let stderr = match stderr_reader {
            Some(handle) => handle.join().unwrap_or_else(|_| Ok(Vec::new()))?,
            None => Vec::new(),
        };
        self.check(status, &stderr, &[])
    }
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Environment
// =============================================================================

/// `git version`, used to check that git is installed.
pub fn version() -> Result<String, GitError> {
    GitCommand::new().arg("version").run_text()
}

// =============================================================================
// Repository Setup
// =============================================================================

pub fn clone(repo: &str, dir: &Path) -> Result<(), GitError> {
    GitCommand::new()
        .args(["clone", "-q", "-o", "origin", repo])
        .arg(dir)
        .run()
        .map(drop)
}

pub fn init(dir: &Path) -> Result<(), GitError> {
    GitCommand::in_dir(dir).args(["init", "-q"]).run().map(drop)
}

pub fn set_config(dir: &Path, key: &str, value: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["config", key, value])
        .run()
        .map(drop)
}

// =============================================================================
// Ghost Branch Commits
// =============================================================================

pub fn checkout_orphan(dir: &Path, branch: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["checkout", "-q", "--orphan", branch])
        .run()
        .map(drop)
}

/// Stage and commit exactly one file.
pub fn commit_file(dir: &Path, file: &str, message: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir).args(["add", file]).run()?;
    GitCommand::in_dir(dir)
        .args(["commit", "-q", file, "-m", message])
        .run()
        .map(drop)
}

pub fn reset_hard(dir: &Path, target: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["reset", "-q", "--hard", target])
        .run()
        .map(drop)
}

/// Stream `HEAD:<file>` to `writer`.
pub fn cat_head_file(dir: &Path, file: &str, writer: &mut dyn Write) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["--no-pager", "cat-file", "-p"])
        .arg(format!("HEAD:{file}"))
        .stream_into(writer)
}

// =============================================================================
// Remote
// =============================================================================

pub fn push_branch(dir: &Path, branch: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["push", "-q", "origin", branch])
        .run()
        .map(drop)
}

pub fn delete_remote_branch(dir: &Path, branch: &str) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["push", "-q", "origin"])
        .arg(format!(":{branch}"))
        .run()
        .map(drop)
}

/// Branch names under `refs/heads/` matching any of `patterns`.
pub fn ls_remote_heads(repo: &str, patterns: &[String]) -> Result<Vec<String>, GitError> {
    let output = GitCommand::new()
        .args(["ls-remote", "-q", "--heads", "--refs", repo])
        .args(patterns)
        .run()?;
    Ok(parse_ls_remote(&String::from_utf8_lossy(&output)))
}

/// Check whether `branch` exists on `repo`.
pub fn remote_branch_exists(repo: &str, branch: &str) -> Result<bool, GitError> {
    let branches = ls_remote_heads(repo, &[format!("refs/heads/{branch}")])?;
    Ok(branches.iter().any(|b| b == branch))
}

fn parse_ls_remote(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .filter_map(|(_, refname)| refname.trim().strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Patch Capture
// =============================================================================

/// Write email-style patches for every first-parent commit in `revision`
/// (a range `a..b` or a single commit for full history) into `out`.
pub fn write_log_patches(dir: &Path, revision: &str, out: File) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args([
            "log",
            "-p",
            "--reverse",
            "--pretty=email",
            "--stat",
            "-m",
            "--first-parent",
            "--binary",
            revision,
        ])
        .run_into(out, &[])
}

/// Write the binary patience diff of the working tree against `from`.
pub fn write_diff(dir: &Path, from: &str, out: File) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["diff", "--patience", "--binary", from])
        .run_into(out, &[])
}

/// Append a whole-file addition diff for `path`. Exit code 1 means the file
/// differs from `/dev/null`, which is the expected outcome.
pub fn write_file_addition(dir: &Path, path: &Path, out: File) -> Result<(), GitError> {
    GitCommand::in_dir(dir)
        .args(["diff", "--patience", "--binary", "--no-index", "/dev/null"])
        .arg(path)
        .run_into(out, &[1])
}

// =============================================================================
// Patch Application
// =============================================================================

/// `git am` the patch file. On failure the partial apply is aborted.
pub fn am(dir: &Path, patch: &Path) -> Result<(), GitError> {
    let err = match GitCommand::in_dir(dir).arg("am").arg(patch).run() {
        Ok(_) => return Ok(()),
        Err(err) => err,
    };
    match (err, GitCommand::in_dir(dir).args(["am", "--abort"]).run()) {
        (err, Ok(_)) => Err(err),
        (
            GitError::CommandFailed {
                command,
                status,
                stderr,
            },
            Err(abort_err),
        ) => Err(GitError::CommandFailed {
            command,
            status,
            stderr: format!("{stderr} (abort also failed: {abort_err})"),
        }),
        (err, Err(abort_err)) => {
            tracing::warn!(error = %abort_err, "git am --abort failed");
            Err(err)
        }
    }
}

pub fn apply(dir: &Path, patch: &Path) -> Result<(), GitError> {
    GitCommand::in_dir(dir).arg("apply").arg(patch).run().map(drop)
}
