//! Error types for gh-asset-publish with contextual messages and exit codes
//!
//! One error enum covers every failure the tool reports. Each category maps to a
//! process exit code, and most carry a short help message for the operator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for gh-asset-publish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, release preconditions)
  User = 1,
  /// System error (I/O, external process)
  System = 2,
  /// Validation failure (malformed or inconsistent module metadata)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for gh-asset-publish
#[derive(Debug)]
pub enum PublishError {
  /// Module metadata file is not well-formed or violates the schema
  Parse { path: PathBuf, message: String },

  /// Cross-document validation failed. Holds every offender, never just the first.
  Validation(Vec<String>),

  /// I/O errors, with the operation (usually naming the path) when known
  Io { context: Option<String>, source: io::Error },

  /// External tool exited unsuccessfully (or timed out, with no exit code)
  Process {
    command: String,
    exit_code: Option<i32>,
    output: String,
  },

  /// Release state does not allow the requested operation
  Precondition(PreconditionError),

  /// Configuration errors
  Config(ConfigError),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PublishError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PublishError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PublishError::Message { message, context, help } => PublishError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PublishError::Io { context, source } => PublishError::Io {
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        source,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PublishError::Parse { .. } => ExitCode::Validation,
      PublishError::Validation(_) => ExitCode::Validation,
      PublishError::Io { .. } => ExitCode::System,
      PublishError::Process { .. } => ExitCode::System,
      PublishError::Precondition(_) => ExitCode::User,
      PublishError::Config(_) => ExitCode::User,
      PublishError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PublishError::Validation(_) => Some(
        "Every module must share the root's group and version, and keep its files next to the .module file."
          .to_string(),
      ),
      PublishError::Precondition(e) => e.help_message(),
      PublishError::Config(e) => e.help_message(),
      PublishError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PublishError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PublishError::Parse { path, message } => {
        write!(f, "Failed to parse module metadata {}: {}", path.display(), message)
      }
      PublishError::Validation(errors) => {
        write!(f, "Module metadata validation failed:")?;
        for error in errors {
          write!(f, "\n  - {}", error)?;
        }
        Ok(())
      }
      PublishError::Io { context, source } => match context {
        Some(ctx) => write!(f, "{}\nI/O error: {}", ctx, source),
        None => write!(f, "I/O error: {}", source),
      },
      PublishError::Process {
        command,
        exit_code,
        output,
      } => {
        match exit_code {
          Some(code) => write!(f, "Command '{}' failed with exit code {}", command, code)?,
          None => write!(f, "Command '{}' did not complete", command)?,
        }
        for line in output.lines() {
          write!(f, "\n    {}", line)?;
        }
        Ok(())
      }
      PublishError::Precondition(e) => write!(f, "{}", e),
      PublishError::Config(e) => write!(f, "{}", e),
      PublishError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PublishError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PublishError::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}

impl From<io::Error> for PublishError {
  fn from(err: io::Error) -> Self {
    PublishError::Io {
      context: None,
      source: err,
    }
  }
}

impl From<toml_edit::de::Error> for PublishError {
  fn from(err: toml_edit::de::Error) -> Self {
    PublishError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for PublishError {
  fn from(err: serde_json::Error) -> Self {
    PublishError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for PublishError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    PublishError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<ConfigError> for PublishError {
  fn from(err: ConfigError) -> Self {
    PublishError::Config(err)
  }
}

impl From<PreconditionError> for PublishError {
  fn from(err: PreconditionError) -> Self {
    PublishError::Precondition(err)
  }
}

/// Release-state errors raised by the upload sub-protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
  /// Release tool is not installed or not on PATH
  ToolMissing { tool: String },

  /// Release does not exist and creation on missing is disabled
  ReleaseMissing { tag: String },

  /// Release already has uploaded assets
  ReleaseHasAssets { tag: String, assets: Vec<String> },

  /// Nothing to upload
  NoFiles { release_dir: PathBuf },
}

impl PreconditionError {
  fn help_message(&self) -> Option<String> {
    match self {
      PreconditionError::ToolMissing { tool } => Some(format!(
        "Install the GitHub CLI and authenticate with `{} auth login`, or set `release_tool` in gap.toml.",
        tool
      )),
      PreconditionError::ReleaseMissing { .. } => {
        Some("Create the release first, or pass --create-if-missing.".to_string())
      }
      PreconditionError::ReleaseHasAssets { .. } => {
        Some("Assets are never overwritten. Delete them from the release or publish a new version.".to_string())
      }
      PreconditionError::NoFiles { .. } => Some("Run `gh-asset-publish prepare` first.".to_string()),
    }
  }
}

impl fmt::Display for PreconditionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PreconditionError::ToolMissing { tool } => write!(f, "Release tool '{}' is not installed", tool),
      PreconditionError::ReleaseMissing { tag } => {
        write!(f, "Release {} does not exist and creating missing releases is disabled", tag)
      }
      PreconditionError::ReleaseHasAssets { tag, assets } => {
        write!(f, "Release {} already has files: {}", tag, assets.join(", "))
      }
      PreconditionError::NoFiles { release_dir } => {
        write!(f, "No files to upload in {}", release_dir.display())
      }
    }
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// gap.toml not found
  NotFound { search_root: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Field present but malformed
  InvalidField { field: String, reason: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `gh-asset-publish init` to create a configuration file.".to_string()),
      ConfigError::MissingField { field } => Some(format!("Add `{}` to gap.toml.", field)),
      ConfigError::InvalidField { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { search_root } => {
        write!(
          f,
          "No gh-asset-publish configuration found.\nExpected file: {}/gap.toml",
          search_root.display()
        )
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid value for '{}': {}", field, reason)
      }
    }
  }
}

/// Result type alias for gh-asset-publish
pub type PublishResult<T> = Result<T, PublishError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PublishResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PublishError>,
{
  fn context(self, ctx: impl Into<String>) -> PublishResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PublishResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PublishError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
