use crate::core::error::{ConfigError, PublishError, PublishResult, ResultExt};
use crate::gmm::codec::CodecConfig;
use crate::release::publication::PublicationSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, written by `gh-asset-publish init`
pub const CONFIG_FILE_NAME: &str = "gap.toml";

/// Configuration for gh-asset-publish
/// Searched in order: gap.toml, .gap.toml, .config/gap.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
  /// GitHub repository in `owner/repo` form (required to upload)
  #[serde(default)]
  pub github_repo: Option<String>,

  /// Maven-layout repository the build staged its publications into
  #[serde(default = "default_staging_repo")]
  pub staging_repo: PathBuf,

  /// Scratch area for relocated release files. Wiped at the start of every publish.
  #[serde(default = "default_work_dir")]
  pub work_dir: PathBuf,

  /// Create a draft release when the tag has none
  #[serde(default = "default_true")]
  pub create_release_if_missing: bool,

  /// Release tool executable (name on PATH or a path)
  #[serde(default = "default_release_tool")]
  pub release_tool: String,

  /// Seconds before a release-tool call is considered hung
  #[serde(default = "default_release_tool_timeout_secs")]
  pub release_tool_timeout_secs: u64,

  #[serde(default)]
  pub codec: CodecConfig,

  #[serde(default)]
  pub publications: Vec<PublicationSpec>,

  /// Directory relative paths resolve against (the config file's directory)
  #[serde(skip)]
  pub base_dir: PathBuf,
}

fn default_staging_repo() -> PathBuf {
  PathBuf::from("build/gh-asset-publish/staging-repo")
}

fn default_work_dir() -> PathBuf {
  PathBuf::from("build/gh-asset-publish/release-files")
}

fn default_true() -> bool {
  true
}

fn default_release_tool() -> String {
  "gh".to_string()
}

fn default_release_tool_timeout_secs() -> u64 {
  600
}

impl PublishConfig {
  /// Find config file in search order: gap.toml, .gap.toml, .config/gap.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join(CONFIG_FILE_NAME),
      path.join(".gap.toml"),
      path.join(".config").join(CONFIG_FILE_NAME),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from a directory (searches the candidate locations)
  pub fn load(path: &Path) -> PublishResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      PublishError::Config(ConfigError::NotFound {
        search_root: path.to_path_buf(),
      })
    })?;
    Self::load_file(&config_path)
  }

  /// Load config from an explicit file
  pub fn load_file(config_path: &Path) -> PublishResult<Self> {
    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config = Self::parse(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.base_dir = config_path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
  }

  /// Parse and validate config content
  pub fn parse(content: &str) -> PublishResult<Self> {
    let config: PublishConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> PublishResult<()> {
    if let Some(repo) = &self.github_repo {
      validate_github_repo(repo)?;
    }

    if !self.codec.indent.chars().all(char::is_whitespace) {
      return Err(
        ConfigError::InvalidField {
          field: "codec.indent".to_string(),
          reason: "must contain only whitespace".to_string(),
        }
        .into(),
      );
    }

    if self.release_tool.trim().is_empty() {
      return Err(
        ConfigError::MissingField {
          field: "release_tool".to_string(),
        }
        .into(),
      );
    }

    let mut names = HashSet::new();
    for publication in &self.publications {
      if !names.insert(publication.name.as_str()) {
        return Err(
          ConfigError::InvalidField {
            field: "publications".to_string(),
            reason: format!("duplicate publication name '{}'", publication.name),
          }
          .into(),
        );
      }
      publication.parsed_coordinates()?;
    }

    Ok(())
  }

  pub fn github_repo(&self) -> PublishResult<&str> {
    self.github_repo.as_deref().ok_or_else(|| {
      PublishError::Config(ConfigError::MissingField {
        field: "github_repo".to_string(),
      })
    })
  }

  pub fn staging_repo_path(&self) -> PathBuf {
    self.base_dir.join(&self.staging_repo)
  }

  pub fn work_dir_path(&self) -> PathBuf {
    self.base_dir.join(&self.work_dir)
  }

  pub fn release_tool_timeout(&self) -> Duration {
    Duration::from_secs(self.release_tool_timeout_secs)
  }

  /// Commented starter config
  pub fn template() -> &'static str {
    r#"# gh-asset-publish configuration

# GitHub repository that owns the releases
github_repo = "owner/repo"

# Maven-layout repository your build publishes into
staging_repo = "build/gh-asset-publish/staging-repo"

# Scratch directory for flattened release files (deleted on every run)
work_dir = "build/gh-asset-publish/release-files"

# Create a draft release when the version tag has none
create_release_if_missing = true

# release_tool = "gh"
# release_tool_timeout_secs = 600

[codec]
pretty_print = true
indent = "  "

[[publications]]
name = "main"
coordinates = "com.example:my-library:1.0.0"
enabled = true
"#
  }
}

fn validate_github_repo(repo: &str) -> PublishResult<()> {
  let valid = match repo.split_once('/') {
    Some((owner, name)) => !owner.is_empty() && !name.is_empty() && !name.contains('/'),
    None => false,
  };
  if valid {
    Ok(())
  } else {
    Err(
      ConfigError::InvalidField {
        field: "github_repo".to_string(),
        reason: format!("expected 'owner/repo', got '{}'", repo),
      }
      .into(),
    )
  }
}
