//! System git backend
//!
//! Uses plumbing-level commands only:
//! - `git status --porcelain --untracked-files=no` for working-copy state
//! - `git show HEAD~N:./path` for committed file content along first parents

use super::{Revision, VersionControl, slash_path};
use crate::core::error::{PortError, PortResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// Directory every command runs in (the configured root)
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> PortResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .map_err(|e| {
        PortError::Vcs(VcsError::Unavailable {
          program: "git".to_string(),
          reason: e.to_string(),
        })
      })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(PortError::Vcs(VcsError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(PortError::Vcs(VcsError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    tracing::debug!(work_tree = %stdout.trim(), "opened git repository");

    Ok(Self {
      repo_path: path.to_path_buf(),
    })
  }

  /// Revision expression for git: `HEAD`, `HEAD~1`, ...
  ///
  /// `~N` follows first parents only, which is exactly the linear ancestry we want.
  pub fn rev_spec(revision: Revision) -> String {
    match revision.generations() {
      0 => "HEAD".to_string(),
      n => format!("HEAD~{}", n),
    }
  }

  /// Run a git command, mapping spawn failures and non-zero exits to VCS errors
  fn run(&self, args: &[&str]) -> PortResult<Output> {
    let command = format!("git {}", args.join(" "));
    tracing::trace!(%command, "running");

    let output = self.git_cmd().args(args).output().map_err(|e| {
      PortError::Vcs(VcsError::Unavailable {
        program: "git".to_string(),
        reason: e.to_string(),
      })
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      if is_missing_revision(&stderr) {
        return Err(PortError::Vcs(VcsError::RevisionNotFound {
          revision: args
            .last()
            .and_then(|spec| spec.split(':').next())
            .unwrap_or_default()
            .to_string(),
        }));
      }
      return Err(PortError::Vcs(VcsError::CommandFailed { command, stderr }));
    }

    Ok(output)
  }

  /// Create a git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }
}

impl VersionControl for SystemGit {
  fn name(&self) -> &'static str {
    "git"
  }

  fn is_dirty(&self) -> PortResult<bool> {
    let output = self.run(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(porcelain_has_changes(&output.stdout))
  }

  fn read_file_at(&self, path: &Path, revision: Revision) -> PortResult<Vec<u8>> {
    // `./` makes the path relative to repo_path rather than the top-level
    let spec = format!("{}:./{}", Self::rev_spec(revision), slash_path(path));
    let output = self.run(&["show", &spec])?;
    Ok(output.stdout)
  }
}

/// Any porcelain line means a tracked file differs from HEAD
fn porcelain_has_changes(stdout: &[u8]) -> bool {
  String::from_utf8_lossy(stdout).lines().any(|line| !line.trim().is_empty())
}

fn is_missing_revision(stderr: &str) -> bool {
  stderr.contains("unknown revision") || stderr.contains("invalid object name") || stderr.contains("bad revision")
}
