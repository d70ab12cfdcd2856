//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let project = TestProject::new()?;

  run_gap(&project.path, &["init"])?;

  let config = std::fs::read_to_string(project.path.join("gap.toml"))?;
  assert!(config.contains("github_repo = \"owner/repo\""));
  assert!(config.contains("[[publications]]"));
  assert!(config.contains("[codec]"));
  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(".config/gap.toml", "github_repo = \"me/mine\"\n")?;

  let output = run_gap_raw(&project.path, &["init"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("already exists"));
  assert!(!project.path.join("gap.toml").exists());
  Ok(())
}
