//! Upload state machine: query, create, guard, upload
//!
//! Written against [`ReleaseTool`] so the protocol can run without GitHub.

use crate::core::error::{PreconditionError, PublishResult, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};

/// Operations a release backend provides for one repository
pub trait ReleaseTool {
  /// Human-readable name, for messages
  fn name(&self) -> &str;

  /// Installed version, or None when the tool is not available
  fn version(&self) -> Option<String>;

  fn release_exists(&self, tag: &str) -> PublishResult<bool>;

  fn create_draft_release(&self, tag: &str) -> PublishResult<()>;

  /// Names of assets already attached to the release
  fn list_assets(&self, tag: &str) -> PublishResult<Vec<String>>;

  /// Attach `files` (bare names inside `release_dir`) to the release
  fn upload_assets(&self, tag: &str, release_dir: &Path, files: &[String]) -> PublishResult<()>;
}

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
  pub tag: String,
  pub created_release: bool,
  pub uploaded: Vec<String>,
}

/// Upload every file in `release_dir` as an asset of release `tag`
///
/// The release must have no assets yet; nothing is ever overwritten.
pub fn upload_release(
  tool: &dyn ReleaseTool,
  tag: &str,
  release_dir: &Path,
  create_if_missing: bool,
) -> PublishResult<UploadSummary> {
  let version = tool.version().ok_or_else(|| PreconditionError::ToolMissing {
    tool: tool.name().to_string(),
  })?;
  tracing::debug!(tool = tool.name(), %version, "release tool available");

  let files = release_files(release_dir)?;
  if files.is_empty() {
    return Err(
      PreconditionError::NoFiles {
        release_dir: release_dir.to_path_buf(),
      }
      .into(),
    );
  }

  let mut created_release = false;
  if !tool.release_exists(tag)? {
    if !create_if_missing {
      return Err(PreconditionError::ReleaseMissing { tag: tag.to_string() }.into());
    }
    tracing::info!(tag, "creating draft release");
    tool.create_draft_release(tag)?;
    created_release = true;
  }

  let assets = tool.list_assets(tag)?;
  if !assets.is_empty() {
    return Err(
      PreconditionError::ReleaseHasAssets {
        tag: tag.to_string(),
        assets,
      }
      .into(),
    );
  }

  tracing::info!(tag, files = files.len(), "uploading release assets");
  tool.upload_assets(tag, release_dir, &files)?;

  Ok(UploadSummary {
    tag: tag.to_string(),
    created_release,
    uploaded: files,
  })
}

/// Regular files directly inside `dir`, by sorted name
fn release_files(dir: &Path) -> PublishResult<Vec<String>> {
  let mut names = Vec::new();
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
    let entry = entry?;
    if !entry.file_type()?.is_file() {
      continue;
    }
    let path: PathBuf = entry.path();
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
      names.push(name.to_string());
    } else {
      tracing::warn!(path = %path.display(), "skipping file with non-UTF-8 name");
    }
  }
  names.sort();
  Ok(names)
}
