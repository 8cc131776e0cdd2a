//! Upstream and derived version values

use serde::Serialize;
use std::fmt;

/// Upstream `major.minor`, plus whether it is an unreleased snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpstreamVersion {
  pub major: u32,
  pub minor: u32,
  pub snapshot: bool,
}

impl UpstreamVersion {
  pub fn new(major: u32, minor: u32) -> Self {
    Self {
      major,
      minor,
      snapshot: false,
    }
  }

  pub fn snapshot(major: u32, minor: u32) -> Self {
    Self {
      major,
      minor,
      snapshot: true,
    }
  }
}

impl fmt::Display for UpstreamVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)?;
    if self.snapshot {
      write!(f, "-SNAPSHOT")?;
    }
    Ok(())
  }
}

/// Four-part version of the derived artifact: `major.minor.patch.build`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DerivedVersion {
  pub major: u32,
  pub minor: u32,
  pub patch: u32,
  pub build: u32,
}

impl DerivedVersion {
  /// Next version after `previous_build` for a released upstream version
  ///
  /// Patch is always 0; the build number only ever moves forward by one.
  pub fn next(upstream: UpstreamVersion, previous_build: u32) -> Option<Self> {
    Some(Self {
      major: upstream.major,
      minor: upstream.minor,
      patch: 0,
      build: previous_build.checked_add(1)?,
    })
  }
}

impl fmt::Display for DerivedVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
  }
}
