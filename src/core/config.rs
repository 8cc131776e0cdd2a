use crate::core::error::{ConfigError, PortError, PortResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for port-rail
/// Searched in order: port-rail.toml, .port-rail.toml, .config/port-rail.toml
///
/// Every section is optional; the defaults describe the Java → C# layout the
/// tool was first written for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortConfig {
  #[serde(default)]
  pub upstream: UpstreamConfig,
  #[serde(default)]
  pub derived: DerivedConfig,
  #[serde(default)]
  pub sync: SyncConfig,
}

/// Where the upstream version lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
  /// Descriptor holding `<version>major.minor[-SNAPSHOT]</version>`, relative to the root
  #[serde(default = "default_descriptor")]
  pub descriptor: PathBuf,
}

fn default_descriptor() -> PathBuf {
  PathBuf::from("java").join("pom.xml")
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      descriptor: default_descriptor(),
    }
  }
}

/// The derived artifact's version-bearing source file
///
/// # Example
///
/// ```toml
/// [derived]
/// metadata = "csharp/PhoneNumbers/Properties/AssemblyInfo.cs"
/// build_attribute = "AssemblyVersion"
/// attributes = ["AssemblyVersion", "AssemblyFileVersion"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedConfig {
  /// Metadata file, relative to the root
  #[serde(default = "default_metadata")]
  pub metadata: PathBuf,

  /// Attribute whose committed 4th component is the previous build number
  #[serde(default = "default_build_attribute")]
  pub build_attribute: String,

  /// Attributes whose version literal gets rewritten
  #[serde(default = "default_attributes")]
  pub attributes: Vec<String>,
}

fn default_metadata() -> PathBuf {
  ["csharp", "PhoneNumbers", "Properties", "AssemblyInfo.cs"].iter().collect()
}

fn default_build_attribute() -> String {
  "AssemblyVersion".to_string()
}

fn default_attributes() -> Vec<String> {
  vec!["AssemblyVersion".to_string(), "AssemblyFileVersion".to_string()]
}

impl Default for DerivedConfig {
  fn default() -> Self {
    Self {
      metadata: default_metadata(),
      build_attribute: default_build_attribute(),
      attributes: default_attributes(),
    }
  }
}

/// Which version-control backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
  /// Mercurial if `<root>/.hg` exists, git otherwise
  #[default]
  Auto,
  Git,
  Hg,
}

impl std::str::FromStr for VcsKind {
  type Err = PortError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "auto" => Ok(VcsKind::Auto),
      "git" => Ok(VcsKind::Git),
      "hg" | "mercurial" => Ok(VcsKind::Hg),
      other => Err(PortError::Config(ConfigError::UnsupportedVcs {
        name: other.to_string(),
      })),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
  #[serde(default)]
  pub vcs: VcsKind,

  /// How many first-parent ancestors to inspect before giving up on a snapshot
  #[serde(default = "default_max_depth")]
  pub max_depth: usize,
}

/// Upstream releases happen far more often than this; hitting it means the
/// descriptor path is wrong or history is broken.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

fn default_max_depth() -> usize {
  DEFAULT_MAX_DEPTH
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      vcs: VcsKind::default(),
      max_depth: default_max_depth(),
    }
  }
}

impl PortConfig {
  /// Find config file in search order: port-rail.toml, .port-rail.toml, .config/port-rail.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("port-rail.toml"),
      path.join(".port-rail.toml"),
      path.join(".config").join("port-rail.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root, falling back to defaults when no file exists
  pub fn load(path: &Path) -> PortResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!(root = %path.display(), "no port-rail.toml found, using defaults");
      return Ok(Self::default());
    };

    tracing::debug!(config = %config_path.display(), "loading config");
    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> PortResult<Self> {
    let config: PortConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  /// Validate field values
  pub fn validate(&self) -> PortResult<()> {
    if self.derived.attributes.is_empty() {
      return Err(invalid("derived.attributes", "at least one attribute is required"));
    }

    for name in &self.derived.attributes {
      if !is_identifier(name) {
        return Err(invalid("derived.attributes", &format!("'{}' is not an attribute name", name)));
      }
    }

    if !self.derived.attributes.contains(&self.derived.build_attribute) {
      return Err(invalid(
        "derived.build_attribute",
        &format!("'{}' must also be listed in derived.attributes", self.derived.build_attribute),
      ));
    }

    if self.sync.max_depth == 0 {
      return Err(invalid("sync.max_depth", "must be at least 1"));
    }

    Ok(())
  }
}

fn invalid(field: &str, reason: &str) -> PortError {
  PortError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
