//! Derived artifact metadata: version attributes embedded in a source file
//!
//! The file carries declarations like
//!
//! ```text
//! [assembly: AssemblyVersion("4.6.0.118")]
//! [assembly: AssemblyFileVersion("4.6.0.118")]
//! ```
//!
//! Only the literal between the opening quote and the closing quote is ever
//! touched; every other byte of the file is preserved.

use crate::core::error::{PortResult, ResultExt};
use crate::release::version::DerivedVersion;
use regex::bytes::{Captures, Regex};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Build number (4th component) of `attribute("a.b.c.d"` in `content`
///
/// Works on raw bytes: the file's encoding is whatever the port uses.
pub fn previous_build(content: &[u8], attribute: &str) -> Option<u32> {
  let pattern = format!(r#"(?-u)\b{}\("([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)"#, regex::escape(attribute));
  let re = Regex::new(&pattern).expect("valid attribute regex");
  let caps = re.captures(content)?;
  std::str::from_utf8(&caps[4]).ok()?.parse().ok()
}

/// Result of rewriting attribute literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
  pub content: Vec<u8>,
  /// Number of declarations whose literal was replaced
  pub replaced: usize,
}

impl Rewrite {
  /// True when the new content is byte-identical to the input
  pub fn is_unchanged(&self, original: &[u8]) -> bool {
    self.content == original
  }
}

/// Replace the version literal of every `attributes` declaration with `version`
pub fn rewrite_versions(content: &[u8], attributes: &[String], version: &DerivedVersion) -> Rewrite {
  if attributes.is_empty() {
    return Rewrite {
      content: content.to_vec(),
      replaced: 0,
    };
  }

  // Attribute names are validated identifiers, so the pattern always compiles
  let names = attributes.iter().map(|a| regex::escape(a)).collect::<Vec<_>>().join("|");
  let re = Regex::new(&format!(r#"(?-u)(\b(?:{})\(")([^"]+)"#, names)).expect("valid attribute regex");

  let literal = version.to_string();
  let mut replaced = 0;
  let rewritten = re.replace_all(content, |caps: &Captures<'_>| {
    replaced += 1;
    let mut out = caps[1].to_vec();
    out.extend_from_slice(literal.as_bytes());
    out
  });

  Rewrite {
    content: rewritten.into_owned(),
    replaced,
  }
}

/// The metadata file in the working copy
pub struct MetadataFile {
  path: PathBuf,
}

impl MetadataFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Current working-copy content (may include uncommitted edits)
  pub fn read(&self) -> PortResult<Vec<u8>> {
    fs::read(&self.path).with_context(|| format!("Failed to read {}", self.path.display()))
  }

  /// Replace the file contents via a sibling temp file and a rename
  ///
  /// An interrupted run leaves either the old or the new content, never a
  /// truncated file. Permissions of the existing file are carried over.
  pub fn write(&self, content: &[u8]) -> PortResult<()> {
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
      .with_context(|| format!("Failed to create temp file next to {}", self.path.display()))?;
    tmp
      .write_all(content)
      .with_context(|| format!("Failed to write {}", tmp.path().display()))?;
    if let Ok(meta) = fs::metadata(&self.path) {
      tmp
        .as_file()
        .set_permissions(meta.permissions())
        .with_context(|| format!("Failed to copy permissions of {}", self.path.display()))?;
    }
    tmp
      .persist(&self.path)
      .map_err(|e| e.error)
      .with_context(|| format!("Failed to replace {}", self.path.display()))?;
    Ok(())
  }
}
