//! GitHub CLI (`gh`) release backend

use crate::core::error::PublishResult;
use crate::core::process::{CliTool, DEFAULT_TIMEOUT};
use crate::release::upload::ReleaseTool;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Releases of one GitHub repository, driven through `gh`
#[derive(Debug, Clone)]
pub struct GitHubCli {
  repo: String,
  program: String,
  work_dir: PathBuf,
  timeout: Duration,
}

impl GitHubCli {
  pub fn new(repo: impl Into<String>, program: impl Into<String>, work_dir: &Path) -> Self {
    Self {
      repo: repo.into(),
      program: program.into(),
      work_dir: work_dir.to_path_buf(),
      timeout: DEFAULT_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn repo(&self) -> &str {
    &self.repo
  }

  fn cli(&self, dir: &Path) -> CliTool {
    CliTool::new(self.program.clone(), dir).with_timeout(self.timeout)
  }

  fn release_args<'a>(&'a self, subcommand: &'a str, tag: &'a str) -> Vec<&'a str> {
    vec!["release", subcommand, tag, "--repo", &self.repo]
  }
}

impl ReleaseTool for GitHubCli {
  fn name(&self) -> &str {
    &self.program
  }

  fn version(&self) -> Option<String> {
    let output = self.cli(&self.work_dir).run_or_none(&["version"])?;
    Some(output.lines().next().unwrap_or_default().trim().to_string())
  }

  fn release_exists(&self, tag: &str) -> PublishResult<bool> {
    let args = self.release_args("view", tag);
    Ok(self.cli(&self.work_dir).run_or_none(&args).is_some())
  }

  fn create_draft_release(&self, tag: &str) -> PublishResult<()> {
    let mut args = self.release_args("create", tag);
    args.extend(["--draft", "--title", tag]);
    self.cli(&self.work_dir).run(&args)?;
    Ok(())
  }

  fn list_assets(&self, tag: &str) -> PublishResult<Vec<String>> {
    let mut args = self.release_args("view", tag);
    args.extend(["--json", "assets", "--jq", ".assets[].name"]);
    let output = self.cli(&self.work_dir).run(&args)?;
    Ok(parse_asset_names(&output))
  }

  fn upload_assets(&self, tag: &str, release_dir: &Path, files: &[String]) -> PublishResult<()> {
    let mut args: Vec<&str> = self.release_args("upload", tag);
    args.extend(files.iter().map(String::as_str));
    self.cli(release_dir).run(&args)?;
    Ok(())
  }
}

/// One asset name per non-blank line of `--jq .assets[].name` output
fn parse_asset_names(output: &str) -> Vec<String> {
  output
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(str::to_string)
    .collect()
}
