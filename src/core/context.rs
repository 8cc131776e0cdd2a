//! Repository context - build once, pass to every command
//!
//! Resolves the repository root, loads `port-rail.toml` (or defaults) and
//! applies CLI overrides. Nothing is looked up globally after this point; the
//! synchronizer receives everything through `SyncSettings`.

use crate::core::config::{PortConfig, VcsKind};
use crate::core::error::{PortResult, ResultExt};
use crate::core::sync::SyncSettings;
use crate::core::vcs::{self, VersionControl};
use std::path::{Path, PathBuf};

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub vcs: Option<VcsKind>,
  pub max_depth: Option<usize>,
}

/// Repository-level data shared by all commands
#[derive(Debug, Clone)]
pub struct RepoContext {
  /// Repository root directory (absolute path)
  pub root: PathBuf,

  /// Effective configuration (file + overrides)
  pub config: PortConfig,
}

impl RepoContext {
  /// Build the context for the project rooted at `root`
  pub fn build(root: &Path, overrides: &Overrides) -> PortResult<Self> {
    let root = root
      .canonicalize()
      .with_context(|| format!("Repository root {} is not accessible", root.display()))?;
    let mut config = PortConfig::load(&root)?;

    if let Some(kind) = overrides.vcs {
      config.sync.vcs = kind;
    }
    if let Some(depth) = overrides.max_depth {
      config.sync.max_depth = depth;
    }
    config.validate()?;

    Ok(Self { root, config })
  }

  /// Open the configured version-control backend
  pub fn open_vcs(&self) -> PortResult<Box<dyn VersionControl>> {
    vcs::open(self.config.sync.vcs, &self.root)
  }

  /// Settings for the synchronizer
  pub fn sync_settings(&self) -> SyncSettings {
    SyncSettings::from_config(&self.root, &self.config)
  }
}
