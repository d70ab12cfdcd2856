//! Ivy descriptor that lets Ivy-layout consumers find the flattened module file

use crate::core::error::{PublishResult, ResultExt};
use crate::gmm::model::{Component, ModuleMetadata};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension appended to `<module>-<version>`
pub const MARKER_EXTENSION: &str = "ivy.xml";

/// Comment Gradle looks for before trusting the module file next to an ivy.xml
const GRADLE_METADATA_MARKER: &str = "do_not_remove: published-with-gradle-metadata";

pub fn marker_file_name(root: &ModuleMetadata) -> String {
  format!("{}.{}", root.base_name(), MARKER_EXTENSION)
}

pub fn render_marker(component: &Component) -> String {
  format!(
    r#"<?xml version="1.0"?>
<ivy-module version="2.0"
            xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
            xsi:noNamespaceSchemaLocation="https://ant.apache.org/ivy/schemas/ivy.xsd">
    <!-- {} -->
    <info organisation="{}" module="{}" revision="{}" />
</ivy-module>
"#,
    GRADLE_METADATA_MARKER,
    escape_attribute(&component.group),
    escape_attribute(&component.module),
    escape_attribute(&component.version),
  )
}

/// Write the marker for the root module into `dir` and return its path
pub fn write_marker(dir: &Path, root: &ModuleMetadata) -> PublishResult<PathBuf> {
  let path = dir.join(marker_file_name(root));
  fs::write(&path, render_marker(&root.component)).with_context(|| format!("Failed to write {}", path.display()))?;
  tracing::info!(path = %path.display(), "wrote ivy marker");
  Ok(path)
}

fn escape_attribute(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&apos;"),
      _ => escaped.push(c),
    }
  }
  escaped
}
