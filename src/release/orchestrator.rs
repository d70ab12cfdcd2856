//! Publish every configured publication: relocate, then upload
//!
//! Publications run in configuration order. The first failure stops the batch.

use crate::core::config::PublishConfig;
use crate::core::error::{PublishError, PublishResult, ResultExt};
use crate::gmm::codec::MetadataCodec;
use crate::release::publication::{Coordinates, PublicationSpec};
use crate::release::upload::{ReleaseTool, UploadSummary, upload_release};
use crate::relocate::{RelocationJob, RelocationReport};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of one publication
#[derive(Debug, Clone)]
pub struct PublicationOutcome {
  pub name: String,
  pub coordinates: Coordinates,
  pub report: RelocationReport,
  /// None on a dry run
  pub upload: Option<UploadSummary>,
}

pub struct Orchestrator<'a> {
  config: &'a PublishConfig,
  codec: MetadataCodec,
  show_progress: bool,
}

impl<'a> Orchestrator<'a> {
  pub fn new(config: &'a PublishConfig) -> Self {
    Self {
      config,
      codec: MetadataCodec::new(config.codec.clone()),
      show_progress: false,
    }
  }

  pub fn with_progress(mut self, show_progress: bool) -> Self {
    self.show_progress = show_progress;
    self
  }

  /// Run the batch. Without a release tool, publications are only prepared.
  pub fn run(&self, tool: Option<&dyn ReleaseTool>) -> PublishResult<Vec<PublicationOutcome>> {
    let work_dir = self.config.work_dir_path();
    let staging_repo = self.config.staging_repo_path();
    self.reset_work_dir(&work_dir, &staging_repo)?;

    let mut outcomes = Vec::new();
    for publication in &self.config.publications {
      if !publication.enabled {
        tracing::info!(publication = %publication.name, "publication disabled, skipping");
        continue;
      }
      let outcome = self
        .publish_one(publication, &staging_repo, &work_dir, tool)
        .inspect_err(|err| tracing::error!(publication = %publication.name, error = %err, "publication failed"))?;
      outcomes.push(outcome);
    }
    Ok(outcomes)
  }

  fn reset_work_dir(&self, work_dir: &Path, staging_repo: &Path) -> PublishResult<()> {
    let work_abs = std::path::absolute(work_dir)?;
    let staging_abs = std::path::absolute(staging_repo)?;
    if staging_abs.starts_with(&work_abs) {
      return Err(PublishError::with_help(
        format!(
          "work_dir {} contains staging_repo {}",
          work_dir.display(),
          staging_repo.display()
        ),
        "The work directory is deleted on every run. Point work_dir somewhere else.",
      ));
    }

    if work_dir.exists() {
      fs::remove_dir_all(work_dir).with_context(|| format!("Failed to clear {}", work_dir.display()))?;
    }
    fs::create_dir_all(work_dir).with_context(|| format!("Failed to create {}", work_dir.display()))?;
    Ok(())
  }

  fn publish_one(
    &self,
    publication: &PublicationSpec,
    staging_repo: &Path,
    work_dir: &Path,
    tool: Option<&dyn ReleaseTool>,
  ) -> PublishResult<PublicationOutcome> {
    let coordinates = publication.parsed_coordinates()?;
    let root_document: PathBuf = staging_repo.join(coordinates.staged_module_path());
    let destination = coordinates.destination_dir(work_dir);
    tracing::info!(
      publication = %publication.name,
      coordinates = %coordinates,
      module = %root_document.display(),
      "publishing"
    );

    let report = RelocationJob::new(&self.codec, root_document, destination)
      .with_progress(self.show_progress)
      .run()?;

    let upload = match tool {
      Some(tool) => Some(upload_release(
        tool,
        &coordinates.version,
        &report.destination,
        self.config.create_release_if_missing,
      )?),
      None => None,
    };

    Ok(PublicationOutcome {
      name: publication.name.clone(),
      coordinates,
      report,
      upload,
    })
  }
}
