//! Version-control access behind a small capability trait
//!
//! The synchronizer only ever needs two things from history: whether the
//! working copy carries local modifications, and the committed bytes of a file
//! at some first-parent ancestor of the working-copy base. Both backends shell
//! out to the system binary.

pub mod system_git;
pub mod system_hg;

pub use system_git::SystemGit;
pub use system_hg::SystemHg;

use crate::core::config::VcsKind;
use crate::core::error::PortResult;
use std::fmt;
use std::path::Path;

/// A point in linear (first-parent) ancestry of the working-copy base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision {
  generations: usize,
}

impl Revision {
  /// The working-copy base revision (`.` in hg, `HEAD` in git)
  pub const fn base() -> Self {
    Self { generations: 0 }
  }

  /// First parent of this revision
  pub const fn parent(self) -> Self {
    Self {
      generations: self.generations + 1,
    }
  }

  /// Number of first-parent steps back from the base
  pub const fn generations(self) -> usize {
    self.generations
  }
}

impl fmt::Display for Revision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.generations {
      0 => write!(f, "."),
      n => write!(f, ".~{}", n),
    }
  }
}

/// What the synchronizer needs from a version-control system
pub trait VersionControl {
  /// Short backend name for logs
  fn name(&self) -> &'static str;

  /// True when tracked files carry uncommitted modifications
  fn is_dirty(&self) -> PortResult<bool>;

  /// Committed content of `path` (relative to the repository root) at `revision`
  fn read_file_at(&self, path: &Path, revision: Revision) -> PortResult<Vec<u8>>;
}

/// Open the backend selected by `kind` for the repository at `root`
pub fn open(kind: VcsKind, root: &Path) -> PortResult<Box<dyn VersionControl>> {
  let resolved = match kind {
    VcsKind::Auto if root.join(".hg").is_dir() => VcsKind::Hg,
    VcsKind::Auto => VcsKind::Git,
    other => other,
  };

  tracing::debug!(root = %root.display(), backend = ?resolved, "opening repository");
  match resolved {
    VcsKind::Hg => Ok(Box::new(SystemHg::open(root)?)),
    _ => Ok(Box::new(SystemGit::open(root)?)),
  }
}

/// Render a repository-relative path with forward slashes, as both backends expect
pub(crate) fn slash_path(path: &Path) -> String {
  path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
