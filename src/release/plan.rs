//! What a sync run resolved, independent of whether it writes anything

use crate::core::vcs::Revision;
use crate::release::version::{DerivedVersion, UpstreamVersion};
use serde::Serialize;

/// Upstream version together with where in history it was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedUpstream {
  pub version: UpstreamVersion,
  pub revision: Revision,
}

impl ResolvedUpstream {
  /// Snapshot revisions stepped over before reaching a release
  pub fn skipped_snapshots(&self) -> usize {
    self.revision.generations()
  }
}

/// Fully resolved version plan
#[derive(Debug, Clone, Serialize)]
pub struct SyncPlan {
  /// Working copy has uncommitted modifications (sync only writes when true)
  pub dirty: bool,
  pub upstream: UpstreamVersion,
  /// Revision the released upstream version was read at (`.`, `.~1`, ...)
  pub upstream_revision: String,
  pub skipped_snapshots: usize,
  /// Build number committed at the working-copy base
  pub previous_build: u32,
  pub next: DerivedVersion,
  /// `next` rendered as `major.minor.patch.build`
  pub next_version: String,
}

impl SyncPlan {
  pub fn new(dirty: bool, upstream: ResolvedUpstream, previous_build: u32, next: DerivedVersion) -> Self {
    Self {
      dirty,
      upstream: upstream.version,
      upstream_revision: upstream.revision.to_string(),
      skipped_snapshots: upstream.skipped_snapshots(),
      previous_build,
      next,
      next_version: next.to_string(),
    }
  }
}
