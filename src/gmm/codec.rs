//! Reading and writing `.module` files
//!
//! Formatting is an explicit value handed to whoever loads or saves metadata, so two
//! jobs can write with different settings in the same process.

use crate::core::error::{PublishError, PublishResult, ResultExt};
use crate::gmm::model::ModuleMetadata;
use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, PrettyFormatter};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Output settings for serialized metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
  #[serde(default = "default_pretty_print")]
  pub pretty_print: bool,
  #[serde(default = "default_indent")]
  pub indent: String,
}

fn default_pretty_print() -> bool {
  true
}

fn default_indent() -> String {
  "  ".to_string()
}

impl Default for CodecConfig {
  fn default() -> Self {
    Self {
      pretty_print: default_pretty_print(),
      indent: default_indent(),
    }
  }
}

/// Loads and saves [`ModuleMetadata`]
#[derive(Debug, Clone, Default)]
pub struct MetadataCodec {
  config: CodecConfig,
}

impl MetadataCodec {
  pub fn new(config: CodecConfig) -> Self {
    Self { config }
  }

  /// Parse a `.module` file
  ///
  /// Unreadable files surface as I/O errors; malformed content as [`PublishError::Parse`].
  pub fn load(&self, path: &Path) -> PublishResult<ModuleMetadata> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    self.parse(&content).map_err(|e| PublishError::Parse {
      path: path.to_path_buf(),
      message: e.to_string(),
    })
  }

  /// Parse metadata from an in-memory string
  pub fn parse(&self, content: &str) -> Result<ModuleMetadata, serde_json::Error> {
    serde_json::from_str(content)
  }

  /// Serialize metadata to a string using this codec's formatting
  pub fn to_string(&self, metadata: &ModuleMetadata) -> PublishResult<String> {
    let mut buf = Vec::new();
    self.write(metadata, &mut buf)?;
    Ok(String::from_utf8(buf)?)
  }

  /// Write metadata to `path`, replacing any existing file
  pub fn save(&self, metadata: &ModuleMetadata, path: &Path) -> PublishResult<()> {
    let content = self.to_string(metadata)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
  }

  fn write<W: Write>(&self, metadata: &ModuleMetadata, writer: W) -> PublishResult<()> {
    if self.config.pretty_print {
      let formatter = PrettyFormatter::with_indent(self.config.indent.as_bytes());
      let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
      metadata.serialize(&mut ser)?;
    } else {
      let mut ser = serde_json::Serializer::with_formatter(writer, CompactFormatter);
      metadata.serialize(&mut ser)?;
    }
    Ok(())
  }
}
