//! `publish`: prepare and upload every enabled publication in gap.toml

use crate::core::config::PublishConfig;
use crate::core::error::PublishResult;
use crate::release::gh::GitHubCli;
use crate::release::orchestrator::Orchestrator;
use crate::release::upload::ReleaseTool;
use std::env;
use std::path::PathBuf;

/// Run the publish command
pub fn run_publish(config: Option<PathBuf>, dry_run: bool) -> PublishResult<()> {
  let config = match config {
    Some(path) => PublishConfig::load_file(&path)?,
    None => PublishConfig::load(&env::current_dir()?)?,
  };

  let enabled = config.publications.iter().filter(|p| p.enabled).count();
  if enabled == 0 {
    println!("⚠️  No enabled publications in gap.toml");
    println!();
    println!("Add a publication:");
    println!("  [[publications]]");
    println!("  name = \"my-library\"");
    println!("  coordinates = \"com.example:my-library:1.0.0\"");
    return Ok(());
  }

  let gh = if dry_run {
    None
  } else {
    Some(
      GitHubCli::new(config.github_repo()?, config.release_tool.clone(), &config.base_dir)
        .with_timeout(config.release_tool_timeout()),
    )
  };
  let tool = gh.as_ref().map(|gh| gh as &dyn ReleaseTool);

  let outcomes = Orchestrator::new(&config).with_progress(true).run(tool)?;

  for outcome in &outcomes {
    println!("📦 {} ({})", outcome.name, outcome.coordinates);
    match &outcome.upload {
      Some(summary) => {
        if summary.created_release {
          println!("   Created draft release {}", summary.tag);
        }
        println!("   Uploaded {} file(s) to release {}", summary.uploaded.len(), summary.tag);
      }
      None => {
        println!("   Would upload to release {}:", outcome.coordinates.version);
        for file in &outcome.report.files {
          if let Some(name) = file.file_name() {
            println!("     {}", name.to_string_lossy());
          }
        }
      }
    }
  }

  println!();
  if dry_run {
    println!("🔍 Dry-run mode (nothing uploaded)");
  } else {
    println!("✅ Published {} publication(s)", outcomes.len());
  }
  Ok(())
}
