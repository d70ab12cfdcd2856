//! Publications: which staged modules get turned into release assets

use crate::core::error::{ConfigError, PublishResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One `[[publications]]` entry in gap.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSpec {
  pub name: String,

  /// `group:artifact:version`
  pub coordinates: String,

  #[serde(default = "default_enabled")]
  pub enabled: bool,
}

fn default_enabled() -> bool {
  true
}

/// Parsed `group:artifact:version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
  pub group: String,
  pub artifact: String,
  pub version: String,
}

impl Coordinates {
  pub fn parse(gav: &str) -> PublishResult<Self> {
    let mut parts = gav.splitn(3, ':');
    let group = parts.next().unwrap_or_default();
    let artifact = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();

    if group.is_empty() || artifact.is_empty() || version.is_empty() {
      return Err(
        ConfigError::InvalidField {
          field: "coordinates".to_string(),
          reason: format!("expected 'group:artifact:version', got '{}'", gav),
        }
        .into(),
      );
    }

    Ok(Self {
      group: group.to_string(),
      artifact: artifact.to_string(),
      version: version.to_string(),
    })
  }

  /// Maven-layout location of the staged `.module` file, relative to the repository root
  pub fn staged_module_path(&self) -> PathBuf {
    let mut path = PathBuf::new();
    for segment in self.group.split('.') {
      path.push(segment);
    }
    path.push(&self.artifact);
    path.push(&self.version);
    path.push(format!("{}-{}.module", self.artifact, self.version));
    path
  }

  /// Per-publication directory under the work area (group stays dotted)
  pub fn destination_dir(&self, work_dir: &Path) -> PathBuf {
    work_dir.join(&self.group).join(&self.artifact)
  }
}

impl fmt::Display for Coordinates {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
  }
}

impl PublicationSpec {
  pub fn parsed_coordinates(&self) -> PublishResult<Coordinates> {
    Coordinates::parse(&self.coordinates)
  }
}

impl fmt::Display for PublicationSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.name, self.coordinates)
  }
}
