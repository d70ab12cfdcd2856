//! Relocation engine: turns a Maven-layout publication into one flat release directory
//!
//! - **discovery**: load the root module and any extra module files handed in
//! - **validate**: cross-module consistency, reported all at once
//! - **rewrite**: parent-traversal urls become bare filenames
//! - **marker**: the ivy.xml descriptor Gradle expects beside a flattened module
//!
//! A job owns its destination directory: it is deleted and recreated before anything
//! is copied. Source files are copied, never moved. A failed job leaves a partial
//! destination behind that must not be uploaded.

pub mod discovery;
pub mod marker;
pub mod rewrite;
pub mod validate;


use crate::core::error::{PublishError, PublishResult, ResultExt};
use crate::gmm::codec::MetadataCodec;
use crate::ui::progress::FileProgress;
use crate::utils::{ChecksumAlgorithm, compute_checksum};
use discovery::{DiscoveredModule, discover_modules};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Checksum files written beside every relocated module file
const MODULE_CHECKSUMS: [ChecksumAlgorithm; 2] = [ChecksumAlgorithm::Sha256, ChecksumAlgorithm::Sha512];

/// One relocation: a root module, optional extra modules, one destination
pub struct RelocationJob<'a> {
  codec: &'a MetadataCodec,
  root_document: PathBuf,
  documents: Vec<PathBuf>,
  destination: PathBuf,
  show_progress: bool,
}

/// What a finished job produced
#[derive(Debug, Clone, Serialize)]
pub struct RelocationReport {
  pub destination: PathBuf,
  /// Relocated module files, root first
  pub documents: Vec<PathBuf>,
  /// Every file in the destination, sorted by name
  pub files: Vec<PathBuf>,
}

impl<'a> RelocationJob<'a> {
  pub fn new(codec: &'a MetadataCodec, root_document: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
    Self {
      codec,
      root_document: root_document.into(),
      documents: Vec::new(),
      destination: destination.into(),
      show_progress: false,
    }
  }

  /// Relocate these module files alongside the root
  pub fn with_documents(mut self, documents: impl IntoIterator<Item = PathBuf>) -> Self {
    self.documents.extend(documents);
    self
  }

  pub fn with_progress(mut self, show_progress: bool) -> Self {
    self.show_progress = show_progress;
    self
  }

  pub fn run(&self) -> PublishResult<RelocationReport> {
    tracing::debug!(
      root = %self.root_document.display(),
      destination = %self.destination.display(),
      extra = self.documents.len(),
      "starting relocation"
    );

    self.prepare_destination()?;

    let root = self.codec.load(&self.root_document)?;

    let mut seeds = Vec::with_capacity(self.documents.len() + 1);
    seeds.push(self.root_document.clone());
    seeds.extend(self.documents.iter().cloned());
    let modules = discover_modules(self.codec, &seeds)?;

    validate::check_modules(&root, &modules)?;

    let copied = self.copy_modules(&modules)?;
    let relocated = self.rewrite_modules(&copied)?;
    validate::check_relocated(&relocated)?;

    for module in &relocated {
      write_checksums(&module.module_file)?;
    }
    marker::write_marker(&self.destination, &root)?;

    let files = list_files(&self.destination)?;
    tracing::debug!(files = files.len(), "relocation finished");

    Ok(RelocationReport {
      destination: self.destination.clone(),
      documents: copied,
      files,
    })
  }

  fn prepare_destination(&self) -> PublishResult<()> {
    let destination = std::path::absolute(&self.destination)?;
    let root = std::path::absolute(&self.root_document)?;
    if root.starts_with(&destination) {
      return Err(PublishError::with_help(
        format!(
          "Destination {} contains the module being relocated",
          self.destination.display()
        ),
        "The destination is deleted before relocation. Choose a directory outside the staging repository.",
      ));
    }

    if self.destination.exists() {
      fs::remove_dir_all(&self.destination)
        .with_context(|| format!("Failed to clear {}", self.destination.display()))?;
    }
    fs::create_dir_all(&self.destination)
      .with_context(|| format!("Failed to create {}", self.destination.display()))?;
    Ok(())
  }

  /// Copy every module file and its attached files into the destination
  fn copy_modules(&self, modules: &[DiscoveredModule]) -> PublishResult<Vec<PathBuf>> {
    let total: usize = modules.iter().map(|m| m.files.len() + 1).sum();
    let mut progress = FileProgress::for_terminal(self.show_progress, total, format!("Relocating {} files", total));

    let mut copied = Vec::with_capacity(modules.len());
    for module in modules {
      copied.push(self.copy_flat(&module.module_file)?);
      if let Some(p) = progress.as_mut() {
        p.inc();
      }

      for file in &module.files {
        self.copy_flat(file)?;
        if let Some(p) = progress.as_mut() {
          p.inc();
        }
      }
    }
    Ok(copied)
  }

  fn copy_flat(&self, source: &Path) -> PublishResult<PathBuf> {
    let name = source
      .file_name()
      .ok_or_else(|| PublishError::message(format!("Cannot relocate {}: no file name", source.display())))?;
    let target = self.destination.join(name);
    fs::copy(source, &target)
      .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))?;
    tracing::info!(from = %source.display(), to = %target.display(), "relocated file");
    Ok(target)
  }

  /// Reload each copied module from the destination, flatten its urls and save it
  fn rewrite_modules(&self, copied: &[PathBuf]) -> PublishResult<Vec<DiscoveredModule>> {
    copied
      .iter()
      .map(|path| {
        let mut metadata = self.codec.load(path)?;
        let rewritten = rewrite::flatten_references(&mut metadata);
        self.codec.save(&metadata, path)?;
        tracing::debug!(path = %path.display(), rewritten, "rewrote module references");
        Ok(DiscoveredModule::new(path.clone(), metadata))
      })
      .collect()
  }
}

/// Write `<file>.sha256` and `<file>.sha512` holding the bare hex digest
fn write_checksums(file: &Path) -> PublishResult<()> {
  for algorithm in MODULE_CHECKSUMS {
    let digest = compute_checksum(file, algorithm)?;
    let mut name = OsString::from(file.as_os_str());
    name.push(".");
    name.push(algorithm.extension());
    let target = PathBuf::from(name);
    fs::write(&target, &digest).with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::debug!(path = %target.display(), %algorithm, "wrote checksum");
  }
  Ok(())
}

fn list_files(dir: &Path) -> PublishResult<Vec<PathBuf>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
    let entry = entry?;
    if entry.file_type()?.is_file() {
      files.push(entry.path());
    }
  }
  files.sort();
  Ok(files)
}
