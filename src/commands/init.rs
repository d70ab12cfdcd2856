//! `init`: write a starter gap.toml

use crate::core::config::{CONFIG_FILE_NAME, PublishConfig};
use crate::core::error::{PublishError, PublishResult, ResultExt};
use std::env;
use std::fs;

/// Run the init command
pub fn run_init() -> PublishResult<()> {
  let cwd = env::current_dir()?;

  if let Some(existing) = PublishConfig::find_config_path(&cwd) {
    return Err(PublishError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Edit the existing file, or remove it and run init again.",
    ));
  }

  let path = cwd.join(CONFIG_FILE_NAME);
  fs::write(&path, PublishConfig::template()).with_context(|| format!("Failed to write {}", path.display()))?;

  println!("✅ Created {}", path.display());
  println!();
  println!("Next steps:");
  println!("  1. Set github_repo and your [[publications]]");
  println!("  2. Publish your build into staging_repo");
  println!("  3. Run: gh-asset-publish publish --dry-run");
  Ok(())
}
