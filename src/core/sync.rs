use crate::core::config::PortConfig;
use crate::core::error::{FormatError, PortError, PortResult, VcsError};
use crate::core::vcs::{Revision, VersionControl};
use crate::release::descriptor::parse_upstream_version;
use crate::release::metadata::{MetadataFile, previous_build, rewrite_versions};
use crate::release::{DerivedVersion, ResolvedUpstream, SyncPlan};
use std::path::{Path, PathBuf};

/// Paths and limits for one sync run
///
/// Both managed paths are relative to `root` and are read from history with
/// those same relative paths.
#[derive(Debug, Clone)]
pub struct SyncSettings {
  pub root: PathBuf,
  pub descriptor: PathBuf,
  pub metadata: PathBuf,
  pub build_attribute: String,
  pub attributes: Vec<String>,
  pub max_depth: usize,
}

impl SyncSettings {
  pub fn from_config(root: &Path, config: &PortConfig) -> Self {
    Self {
      root: root.to_path_buf(),
      descriptor: config.upstream.descriptor.clone(),
      metadata: config.derived.metadata.clone(),
      build_attribute: config.derived.build_attribute.clone(),
      attributes: config.derived.attributes.clone(),
      max_depth: config.sync.max_depth,
    }
  }
}

/// Result of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
  /// No local modifications, nothing was read or written
  CleanWorkingCopy,
  /// Metadata already carries this version, file left untouched
  Unchanged(DerivedVersion),
  /// Metadata rewritten to this version
  Updated(DerivedVersion),
}

/// Keeps the derived build number in step with the upstream release
///
/// One operator at a time: the metadata file is not locked, and two runs
/// racing on it will clobber each other.
pub struct VersionSynchronizer<'a> {
  vcs: &'a dyn VersionControl,
  settings: SyncSettings,
}

impl<'a> VersionSynchronizer<'a> {
  pub fn new(vcs: &'a dyn VersionControl, settings: SyncSettings) -> Self {
    Self { vcs, settings }
  }

  /// Bump the derived version if the working copy has local modifications
  ///
  /// A clean checkout is a no-op so re-running against a published revision
  /// never moves the build number. All reads happen before the single write.
  pub fn synchronize(&self) -> PortResult<SyncOutcome> {
    if !self.vcs.is_dirty()? {
      tracing::info!(backend = self.vcs.name(), "working copy is clean, nothing to synchronize");
      return Ok(SyncOutcome::CleanWorkingCopy);
    }

    let next = self.next_version()?;

    let file = MetadataFile::new(self.settings.root.join(&self.settings.metadata));
    let current = file.read()?;
    let rewrite = rewrite_versions(&current, &self.settings.attributes, &next);
    if rewrite.replaced == 0 {
      return Err(self.format_error(&self.settings.metadata, &self.settings.attributes.join("/"), None));
    }

    if rewrite.is_unchanged(&current) {
      tracing::info!(version = %next, file = %file.path().display(), "metadata already up to date");
      return Ok(SyncOutcome::Unchanged(next));
    }

    file.write(&rewrite.content)?;
    tracing::info!(
      version = %next,
      declarations = rewrite.replaced,
      file = %file.path().display(),
      "metadata updated"
    );
    Ok(SyncOutcome::Updated(next))
  }

  /// Resolve everything a sync would, without the dirty guard and without writing
  pub fn plan(&self) -> PortResult<SyncPlan> {
    let dirty = self.vcs.is_dirty()?;
    let upstream = self.resolve_upstream()?;
    let previous = self.previous_build()?;
    let next = self.bump(&upstream, previous)?;
    Ok(SyncPlan::new(dirty, upstream, previous, next))
  }

  fn next_version(&self) -> PortResult<DerivedVersion> {
    let upstream = self.resolve_upstream()?;
    let previous = self.previous_build()?;
    self.bump(&upstream, previous)
  }

  fn bump(&self, upstream: &ResolvedUpstream, previous: u32) -> PortResult<DerivedVersion> {
    let next = DerivedVersion::next(upstream.version, previous)
      .ok_or_else(|| {
        PortError::with_help(
          format!("Build number {} cannot be incremented further", previous),
          format!(
            "Reset the build number in the committed {} before the next release.",
            self.settings.metadata.display()
          ),
        )
      })?;
    tracing::debug!(upstream = %upstream.version, previous_build = previous, next = %next, "computed next version");
    Ok(next)
  }

  /// Walk first parents from the working-copy base until the descriptor is not a snapshot
  ///
  /// Stops at the first released version; older ancestors are never read.
  /// History that ends before a release is found counts as exhausted, the
  /// same as hitting the depth cap.
  pub fn resolve_upstream(&self) -> PortResult<ResolvedUpstream> {
    let descriptor = &self.settings.descriptor;
    let mut revision = Revision::base();

    loop {
      let content = match self.read_text(descriptor, revision) {
        Err(PortError::Vcs(VcsError::RevisionNotFound { .. })) if revision.generations() > 0 => {
          tracing::debug!(%revision, "history ends before an upstream release");
          return Err(PortError::TraversalExhausted {
            descriptor: descriptor.clone(),
            depth: revision.generations() - 1,
          });
        }
        result => result?,
      };
      let version = parse_upstream_version(&content)
        .ok_or_else(|| self.format_error(descriptor, "<version>", Some(revision)))?;

      tracing::debug!(%revision, %version, "read upstream version");
      if !version.snapshot {
        return Ok(ResolvedUpstream { version, revision });
      }

      if revision.generations() >= self.settings.max_depth {
        return Err(PortError::TraversalExhausted {
          descriptor: descriptor.clone(),
          depth: self.settings.max_depth,
        });
      }
      revision = revision.parent();
    }
  }

  /// Build number committed at the working-copy base
  ///
  /// Uncommitted edits to the metadata file are deliberately ignored.
  pub fn previous_build(&self) -> PortResult<u32> {
    let base = Revision::base();
    let content = self.vcs.read_file_at(&self.settings.metadata, base)?;
    let build = previous_build(&content, &self.settings.build_attribute)
      .ok_or_else(|| self.format_error(&self.settings.metadata, &self.settings.build_attribute, Some(base)))?;
    tracing::debug!(build, "read committed build number");
    Ok(build)
  }

  fn read_text(&self, path: &Path, revision: Revision) -> PortResult<String> {
    let bytes = self.vcs.read_file_at(path, revision)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  fn format_error(&self, file: &Path, field: &str, revision: Option<Revision>) -> PortError {
    PortError::Format(FormatError {
      file: file.to_path_buf(),
      field: field.to_string(),
      revision: revision.map(|r| r.to_string()),
    })
  }
}
