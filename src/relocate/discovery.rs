//! Breadth-first discovery of the module files a relocation job covers

use crate::core::error::PublishResult;
use crate::gmm::codec::MetadataCodec;
use crate::gmm::model::ModuleMetadata;
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A loaded `.module` file and the files its variants attach
#[derive(Debug, Clone)]
pub struct DiscoveredModule {
  pub module_file: PathBuf,
  pub metadata: ModuleMetadata,
  /// Attached files resolved against the module's directory. A file listed by several
  /// variants appears once.
  pub files: IndexSet<PathBuf>,
}

impl DiscoveredModule {
  pub fn new(module_file: PathBuf, metadata: ModuleMetadata) -> Self {
    let dir = module_dir(&module_file);
    let files = metadata.files().map(|file| dir.join(&file.url)).collect();
    Self {
      module_file,
      metadata,
      files,
    }
  }

  /// Directory holding the module file
  pub fn dir(&self) -> PathBuf {
    module_dir(&self.module_file)
  }

  /// Module files referenced through `available-at`, resolved against this module
  pub fn remote_references(&self) -> Vec<PathBuf> {
    let dir = self.dir();
    self
      .metadata
      .variants
      .iter()
      .filter_map(|v| v.available_at.as_ref())
      .map(|aa| dir.join(&aa.url))
      .collect()
  }

  /// `module (path)`, for diagnostics
  pub fn describe(&self) -> String {
    format!("{} ({})", self.metadata.component.module, self.module_file.display())
  }
}

fn module_dir(module_file: &Path) -> PathBuf {
  module_file.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Make paths comparable regardless of how the caller spelled them
fn identity(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Load every seed module, root first
///
/// Modules are deduplicated by path. A module that cannot be loaded is logged and
/// skipped: the remaining graph may still be publishable. `available-at` references
/// are reported but not followed; callers pass secondary modules explicitly.
pub fn discover_modules(codec: &MetadataCodec, seeds: &[PathBuf]) -> PublishResult<Vec<DiscoveredModule>> {
  let mut queue: VecDeque<PathBuf> = seeds.iter().map(|p| identity(p)).collect();
  let mut loaded: IndexMap<PathBuf, ModuleMetadata> = IndexMap::new();

  while let Some(module_file) = queue.pop_front() {
    if loaded.contains_key(&module_file) {
      continue;
    }

    match codec.load(&module_file) {
      Ok(metadata) => {
        loaded.insert(module_file, metadata);
      }
      Err(err) => {
        tracing::warn!(path = %module_file.display(), error = %err, "failed to load module file, skipping");
      }
    }
  }

  let modules: Vec<DiscoveredModule> = loaded
    .into_iter()
    .map(|(module_file, metadata)| DiscoveredModule::new(module_file, metadata))
    .collect();

  for module in &modules {
    for remote in module.remote_references() {
      tracing::debug!(
        module = %module.metadata.component.module,
        remote = %remote.display(),
        "variant available at another module (not followed)"
      );
    }
  }

  Ok(modules)
}
