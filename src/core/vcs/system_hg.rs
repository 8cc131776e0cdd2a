//! System Mercurial backend
//!
//! - `hg id -n` prints the local revision number with a trailing `+` when the
//!   working copy has uncommitted changes to tracked files
//! - `hg cat --rev .~N path` reads committed content; `~N` follows first parents

use super::{Revision, VersionControl, slash_path};
use crate::core::error::{PortError, PortResult, VcsError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Mercurial backend using the system `hg` binary
pub struct SystemHg {
  repo_path: PathBuf,
}

impl SystemHg {
  /// Open a Mercurial repository
  pub fn open(path: &Path) -> PortResult<Self> {
    let hg = Self {
      repo_path: path.to_path_buf(),
    };

    match hg.run(&["root"]) {
      Ok(output) => {
        tracing::debug!(root = %String::from_utf8_lossy(&output.stdout).trim(), "opened hg repository");
        Ok(hg)
      }
      Err(PortError::Vcs(VcsError::CommandFailed { stderr, .. })) if stderr.contains("no repository found") => {
        Err(PortError::Vcs(VcsError::RepoNotFound {
          path: path.to_path_buf(),
        }))
      }
      Err(e) => Err(e),
    }
  }

  /// Revset for hg: `.`, `.~1`, ...
  pub fn rev_spec(revision: Revision) -> String {
    revision.to_string()
  }

  fn run(&self, args: &[&str]) -> PortResult<Output> {
    let command = format!("hg {}", args.join(" "));
    tracing::trace!(%command, "running");

    let output = self.hg_cmd().args(args).output().map_err(|e| {
      PortError::Vcs(VcsError::Unavailable {
        program: "hg".to_string(),
        reason: e.to_string(),
      })
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr).to_string();
      if is_missing_revision(&stderr) {
        let revision = args
          .iter()
          .position(|a| *a == "--rev")
          .and_then(|i| args.get(i + 1))
          .copied()
          .unwrap_or_default();
        return Err(PortError::Vcs(VcsError::RevisionNotFound {
          revision: revision.to_string(),
        }));
      }
      return Err(PortError::Vcs(VcsError::CommandFailed { command, stderr }));
    }

    Ok(output)
  }

  /// `hg -R <root>` with user config ignored, so aliases and pagers stay out of the way
  fn hg_cmd(&self) -> Command {
    let mut cmd = Command::new("hg");
    cmd.arg("-R").arg(&self.repo_path);
    cmd.current_dir(&self.repo_path);
    cmd.env("HGPLAIN", "1");
    cmd
  }
}

impl VersionControl for SystemHg {
  fn name(&self) -> &'static str {
    "hg"
  }

  fn is_dirty(&self) -> PortResult<bool> {
    let output = self.run(&["id", "-n"])?;
    Ok(id_reports_changes(&String::from_utf8_lossy(&output.stdout)))
  }

  fn read_file_at(&self, path: &Path, revision: Revision) -> PortResult<Vec<u8>> {
    let rev = Self::rev_spec(revision);
    let file = slash_path(path);
    let output = self.run(&["cat", "--rev", &rev, &file])?;
    Ok(output.stdout)
  }
}

/// `hg cat --rev .~N` past the root resolves to an empty revset rather than an unknown revision
fn is_missing_revision(stderr: &str) -> bool {
  stderr.contains("unknown revision") || stderr.contains("out of range") || stderr.contains("empty revision set")
}

/// `hg id -n` output such as `42+` (dirty) or `42` (clean)
fn id_reports_changes(stdout: &str) -> bool {
  stdout.trim().ends_with('+')
}
