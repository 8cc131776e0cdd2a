//! Upstream descriptor parsing
//!
//! The descriptor is a Maven-style XML file; the first `<version>` element is
//! the upstream project version, e.g. `<version>8.3</version>` or
//! `<version>8.4-SNAPSHOT</version>`.

use crate::release::version::UpstreamVersion;
use regex::Regex;
use std::sync::LazyLock;

static VERSION_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"<version>\s*(\d+)\.(\d+)((?:\.\d+)*)(-SNAPSHOT)?\s*</version>").expect("valid version regex")
});

/// Extract the upstream version from descriptor text
///
/// Returns `None` when no well-formed `<version>` element exists; callers
/// turn that into a format error rather than guessing.
pub fn parse_upstream_version(content: &str) -> Option<UpstreamVersion> {
  let caps = VERSION_ELEMENT.captures(content)?;
  let major = caps[1].parse().ok()?;
  let minor = caps[2].parse().ok()?;
  if caps.get(4).is_some() {
    Some(UpstreamVersion::snapshot(major, minor))
  } else {
    Some(UpstreamVersion::new(major, minor))
  }
}
