//! `upload`: push a prepared directory to a GitHub release

use crate::core::error::PublishResult;
use crate::release::gh::GitHubCli;
use crate::release::upload::upload_release;
use std::env;
use std::path::PathBuf;

/// Run the upload command
pub fn run_upload(
  repo: String,
  tag: String,
  release_dir: PathBuf,
  create_if_missing: bool,
  release_tool: String,
) -> PublishResult<()> {
  let cwd = env::current_dir()?;
  let gh = GitHubCli::new(repo, release_tool, &cwd);

  println!("🚀 Uploading {} to release {} of {}", release_dir.display(), tag, gh.repo());
  let summary = upload_release(&gh, &tag, &release_dir, create_if_missing)?;

  if summary.created_release {
    println!("   Created draft release {}", summary.tag);
  }
  for name in &summary.uploaded {
    println!("   {}", name);
  }
  println!();
  println!("✅ Uploaded {} file(s) to release {}", summary.uploaded.len(), summary.tag);
  Ok(())
}
