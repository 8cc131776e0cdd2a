//! Error types for port-rail with contextual messages and exit codes
//!
//! Every failure is fatal: nothing here is retried or recovered locally. The
//! variants map onto the three things that can go wrong during a sync run:
//! the version-control backend failing, a file missing an expected version
//! marker, and history running out before a released upstream version turns up.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for port-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, malformed version markers)
  User = 1,
  /// System error (git/hg, I/O)
  System = 2,
  /// History did not contain what we needed
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for port-rail
#[derive(Debug)]
pub enum PortError {
  /// Configuration errors
  Config(ConfigError),

  /// Version-control backend errors (infrastructure)
  Vcs(VcsError),

  /// An expected version marker is absent from file content
  Format(FormatError),

  /// No released upstream version within the ancestry depth cap
  TraversalExhausted { descriptor: PathBuf, depth: usize },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PortError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PortError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PortError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PortError::Message { message, context, help } => PortError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PortError::Io(err) => PortError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", err)),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PortError::Config(_) => ExitCode::User,
      PortError::Vcs(_) => ExitCode::System,
      PortError::Format(_) => ExitCode::User,
      PortError::TraversalExhausted { .. } => ExitCode::Validation,
      PortError::Io(_) => ExitCode::System,
      PortError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PortError::Config(e) => e.help_message(),
      PortError::Vcs(e) => e.help_message(),
      PortError::Format(e) => e.help_message(),
      PortError::TraversalExhausted { .. } => Some(
        "Raise `max_depth` under [sync] in port-rail.toml (or pass --max-depth) if the last release is further back; \
         if history starts with a snapshot, commit a released version first."
          .to_string(),
      ),
      PortError::Message { help, .. } => help.clone(),
      PortError::Io(_) => None,
    }
  }
}

impl fmt::Display for PortError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PortError::Config(e) => write!(f, "{}", e),
      PortError::Vcs(e) => write!(f, "{}", e),
      PortError::Format(e) => write!(f, "{}", e),
      PortError::TraversalExhausted { descriptor, depth } => write!(
        f,
        "Upstream release not found: {} is a snapshot version in every one of the last {} first-parent revisions",
        descriptor.display(),
        depth + 1
      ),
      PortError::Io(e) => write!(f, "I/O error: {}", e),
      PortError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PortError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PortError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for PortError {
  fn from(err: io::Error) -> Self {
    PortError::Io(err)
  }
}

impl From<toml_edit::de::Error> for PortError {
  fn from(err: toml_edit::de::Error) -> Self {
    PortError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for PortError {
  fn from(err: serde_json::Error) -> Self {
    PortError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// A field holds a value we cannot work with
  InvalidField { field: String, reason: String },

  /// The selected backend does not match the repository
  UnsupportedVcs { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidField { .. } => Some("Check port-rail.toml against the documented defaults.".to_string()),
      ConfigError::UnsupportedVcs { .. } => Some("Supported backends are `auto`, `git` and `hg`.".to_string()),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for `{}`: {}", field, reason)
      }
      ConfigError::UnsupportedVcs { name } => {
        write!(f, "Unsupported version-control backend '{}'", name)
      }
    }
  }
}

/// Version-control backend errors
#[derive(Debug)]
pub enum VcsError {
  /// The backend binary could not be started
  Unavailable { program: String, reason: String },

  /// Command exited non-zero
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Revision does not exist (walked past the root commit)
  RevisionNotFound { revision: String },
}

impl VcsError {
  fn help_message(&self) -> Option<String> {
    match self {
      VcsError::Unavailable { program, .. } => Some(format!("Make sure `{}` is installed and on PATH.", program)),
      VcsError::RepoNotFound { path } => Some(format!(
        "Run port-rail from the project checkout or pass --root (tried {}).",
        path.display()
      )),
      VcsError::RevisionNotFound { .. } => {
        Some("History ended before a released upstream version was found; check the descriptor path.".to_string())
      }
      VcsError::CommandFailed { .. } => None,
    }
  }
}

impl fmt::Display for VcsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VcsError::Unavailable { program, reason } => {
        write!(f, "Failed to execute {}: {}", program, reason)
      }
      VcsError::CommandFailed { command, stderr } => {
        write!(f, "Version-control command failed: {}\n{}", command, stderr.trim_end())
      }
      VcsError::RepoNotFound { path } => {
        write!(f, "Repository not found at: {}", path.display())
      }
      VcsError::RevisionNotFound { revision } => {
        write!(f, "Revision not found: {}", revision)
      }
    }
  }
}

/// A required version marker is absent or malformed
#[derive(Debug)]
pub struct FormatError {
  /// File the marker was expected in
  pub file: PathBuf,
  /// Which marker (e.g. `<version>`, `AssemblyVersion`)
  pub field: String,
  /// Revision the content was read at, if it came from history
  pub revision: Option<String>,
}

impl FormatError {
  fn help_message(&self) -> Option<String> {
    Some(format!(
      "Expected a `{}` declaration in {}; fix the file or the paths in port-rail.toml.",
      self.field,
      self.file.display()
    ))
  }
}

impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Cannot extract version from {}: no valid `{}`", self.file.display(), self.field)?;
    if let Some(rev) = &self.revision {
      write!(f, " at revision {}", rev)?;
    }
    Ok(())
  }
}

/// Result type alias for port-rail
pub type PortResult<T> = Result<T, PortError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PortResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PortResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PortError>,
{
  fn context(self, ctx: impl Into<String>) -> PortResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PortResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PortError) {
  eprintln!("\nerror: {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("help: {}\n", help);
  }
}
