//! Consistency checks across every module in a relocation job
//!
//! All checks run to completion and their findings are reported together, so one run
//! shows the operator every problem.

use crate::core::error::{PublishError, PublishResult};
use crate::gmm::model::ModuleMetadata;
use crate::relocate::discovery::DiscoveredModule;
use crate::utils::invariant_path;
use indexmap::IndexMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Check discovered modules before anything is copied
pub fn check_modules(root: &ModuleMetadata, modules: &[DiscoveredModule]) -> PublishResult<()> {
  let mut errors = Vec::new();

  check_group_and_version(root, modules, &mut errors);
  for module in modules {
    check_file_locality(module, &mut errors);
    check_logical_names(module, &mut errors);
  }
  check_destination_collisions(modules, &mut errors);

  into_result(errors)
}

/// Check relocated modules: every attached file must now be a bare sibling that exists
pub fn check_relocated(modules: &[DiscoveredModule]) -> PublishResult<()> {
  let mut errors = Vec::new();

  for module in modules {
    let dir = module.dir();
    let bad: Vec<String> = module
      .metadata
      .files()
      .filter(|file| file.url.contains('/') || file.url.contains('\\') || !dir.join(&file.url).is_file())
      .map(|file| file.url.clone())
      .collect();
    if !bad.is_empty() {
      errors.push(format!(
        "{} references files missing after relocation: [{}]",
        module.describe(),
        bad.join(", ")
      ));
    }
  }

  into_result(errors)
}

fn into_result(errors: Vec<String>) -> PublishResult<()> {
  if errors.is_empty() {
    Ok(())
  } else {
    Err(PublishError::Validation(errors))
  }
}

fn check_group_and_version(root: &ModuleMetadata, modules: &[DiscoveredModule], errors: &mut Vec<String>) {
  let invalid_groups: Vec<String> = modules
    .iter()
    .filter(|m| m.metadata.component.group != root.component.group)
    .map(|m| format!("{} has '{}'", m.describe(), m.metadata.component.group))
    .collect();
  if !invalid_groups.is_empty() {
    errors.push(format!(
      "The group of all modules must be '{}', but found: [{}]",
      root.component.group,
      invalid_groups.join(", ")
    ));
  }

  let invalid_versions: Vec<String> = modules
    .iter()
    .filter(|m| m.metadata.component.version != root.component.version)
    .map(|m| format!("{} has '{}'", m.describe(), m.metadata.component.version))
    .collect();
  if !invalid_versions.is_empty() {
    errors.push(format!(
      "The version of all modules must be '{}', but found: [{}]",
      root.component.version,
      invalid_versions.join(", ")
    ));
  }
}

fn is_sibling(dir: &Path, file: &Path) -> bool {
  file.parent() == Some(dir) && file.file_name().is_some()
}

fn check_file_locality(module: &DiscoveredModule, errors: &mut Vec<String>) {
  let dir = module.dir();
  let invalid: Vec<String> = module
    .files
    .iter()
    .filter(|f| !is_sibling(&dir, f))
    .map(|f| invariant_path(f))
    .collect();
  if !invalid.is_empty() {
    errors.push(format!(
      "{} has files in invalid location: [{}]",
      module.describe(),
      invalid.join(", ")
    ));
  }
}

/// The same logical file name may appear in several variants only if it always
/// points at the same file.
fn check_logical_names(module: &DiscoveredModule, errors: &mut Vec<String>) {
  let mut urls_by_name: IndexMap<&str, Vec<&str>> = IndexMap::new();
  for file in module.metadata.files() {
    let urls = urls_by_name.entry(file.name.as_str()).or_default();
    if !urls.contains(&file.url.as_str()) {
      urls.push(file.url.as_str());
    }
  }

  for (name, urls) in urls_by_name {
    if urls.len() > 1 {
      errors.push(format!(
        "{} declares file '{}' with conflicting urls: [{}]",
        module.describe(),
        name,
        urls.join(", ")
      ));
    }
  }
}

/// Flattening must not let two different sources land on one destination name
fn check_destination_collisions(modules: &[DiscoveredModule], errors: &mut Vec<String>) {
  let mut sources: IndexMap<OsString, Vec<PathBuf>> = IndexMap::new();
  let candidates = modules
    .iter()
    .flat_map(|m| std::iter::once(&m.module_file).chain(m.files.iter()));

  for source in candidates {
    let Some(name) = source.file_name() else {
      continue;
    };
    let entry = sources.entry(name.to_os_string()).or_default();
    if !entry.contains(source) {
      entry.push(source.clone());
    }
  }

  for (name, paths) in sources {
    if paths.len() > 1 {
      let listed: Vec<String> = paths.iter().map(|p| invariant_path(p)).collect();
      errors.push(format!(
        "Multiple files would be relocated to '{}': [{}]",
        name.to_string_lossy(),
        listed.join(", ")
      ));
    }
  }
}
