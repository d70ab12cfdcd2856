//! Tests for the `upload` command, against a scripted `gh`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_upload_tool_missing() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("out/app-1.0.0.module", "{}")?;

  let output = run_gap_raw(
    &project.path,
    &[
      "upload",
      "--repo",
      "owner/repo",
      "--tag",
      "1.0.0",
      "--release-dir",
      "out",
      "--release-tool",
      "gh-asset-publish-no-such-tool",
    ],
  )?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("is not installed"));
  Ok(())
}

#[cfg(unix)]
mod unix {
  use super::*;

  fn upload_args<'a>(gh: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
      "upload",
      "--repo",
      "owner/repo",
      "--tag",
      "1.0.0",
      "--release-dir",
      "out",
      "--release-tool",
      gh,
    ];
    args.extend_from_slice(extra);
    args
  }

  #[test]
  fn test_upload_creates_missing_release() -> Result<()> {
    let project = TestProject::new()?;
    let gh = fake_gh(&project.path)?;
    let gh = gh.to_str().unwrap();
    let module = project.stage_jvm_module("com.example", "app", "1.0.0")?;
    run_gap(
      &project.path,
      &["prepare", module.to_str().unwrap(), "--destination", "out"],
    )?;

    let output = run_gap(&project.path, &upload_args(gh, &["--create-if-missing"]))?;
    assert!(stdout(&output).contains("Created draft release 1.0.0"));

    assert_eq!(
      gh_calls(&project.path),
      vec![
        "version",
        "release view 1.0.0 --repo owner/repo",
        "release create 1.0.0 --repo owner/repo --draft --title 1.0.0",
        "release view 1.0.0 --repo owner/repo --json assets --jq .assets[].name",
        "release upload 1.0.0 --repo owner/repo app-1.0.0.ivy.xml app-1.0.0.jar app-1.0.0.module \
         app-1.0.0.module.sha256 app-1.0.0.module.sha512",
      ]
    );
    let uploaded = std::fs::read_to_string(project.path.join("gh-state/1.0.0"))?;
    assert_eq!(uploaded.lines().count(), 5);
    Ok(())
  }

  #[test]
  fn test_upload_missing_release_without_creation() -> Result<()> {
    let project = TestProject::new()?;
    let gh = fake_gh(&project.path)?;
    project.write_file("out/app-1.0.0.module", "{}")?;

    let output = run_gap_raw(&project.path, &upload_args(gh.to_str().unwrap(), &[]))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Release 1.0.0 does not exist"));
    assert!(!gh_calls(&project.path).iter().any(|c| c.starts_with("release create")));
    Ok(())
  }

  #[test]
  fn test_upload_refuses_release_with_assets() -> Result<()> {
    let project = TestProject::new()?;
    let gh = fake_gh(&project.path)?;
    project.write_file("gh-state/1.0.0", "app-1.0.0.jar\n")?;
    project.write_file("out/app-1.0.0.module", "{}")?;

    let output = run_gap_raw(&project.path, &upload_args(gh.to_str().unwrap(), &["--create-if-missing"]))?;

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Release 1.0.0 already has files: app-1.0.0.jar"), "{}", err);
    assert!(!gh_calls(&project.path).iter().any(|c| c.starts_with("release upload")));
    Ok(())
  }

  #[test]
  fn test_upload_empty_directory() -> Result<()> {
    let project = TestProject::new()?;
    let gh = fake_gh(&project.path)?;
    std::fs::create_dir_all(project.path.join("out"))?;

    let output = run_gap_raw(&project.path, &upload_args(gh.to_str().unwrap(), &["--create-if-missing"]))?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No files to upload"));
    Ok(())
  }
}
