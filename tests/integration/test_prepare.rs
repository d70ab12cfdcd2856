//! Tests for the `prepare` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_prepare_single_module() -> Result<()> {
  let project = TestProject::new()?;
  let module = project.stage_jvm_module("com.example", "app", "1.0.0")?;
  let dest = project.path.join("out");

  let output = run_gap(
    &project.path,
    &["prepare", module.to_str().unwrap(), "--destination", "out"],
  )?;
  assert!(stdout(&output).contains("app-1.0.0.jar"));

  assert_eq!(
    project.list_files(&dest)?,
    vec![
      "app-1.0.0.ivy.xml",
      "app-1.0.0.jar",
      "app-1.0.0.module",
      "app-1.0.0.module.sha256",
      "app-1.0.0.module.sha512",
    ]
  );

  // checksum files describe the relocated module file
  let sha256 = std::fs::read_to_string(dest.join("app-1.0.0.module.sha256"))?;
  let recomputed = run_gap(&project.path, &["checksum", "out/app-1.0.0.module"])?;
  assert_eq!(sha256, stdout(&recomputed).trim());

  let marker = std::fs::read_to_string(dest.join("app-1.0.0.ivy.xml"))?;
  assert!(marker.contains("<!-- do_not_remove: published-with-gradle-metadata -->"));
  assert!(marker.contains(r#"organisation="com.example" module="app" revision="1.0.0""#));

  // sources are copied, not moved
  assert!(module.exists());
  Ok(())
}

#[test]
fn test_prepare_keeps_metadata_content() -> Result<()> {
  let project = TestProject::new()?;
  let module = project.stage_jvm_module("com.example", "app", "1.0.0")?;

  run_gap(
    &project.path,
    &["prepare", module.to_str().unwrap(), "--destination", "out"],
  )?;

  let relocated: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(project.path.join("out/app-1.0.0.module"))?)?;
  assert_eq!(relocated["formatVersion"], "1.1");
  assert_eq!(relocated["createdBy"]["gradle"]["buildId"], "abc123");
  assert_eq!(relocated["variants"][0]["attributes"]["org.gradle.jvm.version"], 11);
  assert_eq!(
    relocated["variants"][1]["dependencies"][0]["version"]["requires"],
    "1.9.21"
  );
  Ok(())
}

#[test]
fn test_prepare_multiplatform_target_under_root_identity() -> Result<()> {
  let project = TestProject::new()?;
  let (_root, jvm) = project.stage_multiplatform("com.example", "app", "1.0.0")?;
  let dest = project.path.join("work/com.example/app-jvm");

  run_gap(
    &project.path,
    &["prepare", jvm.to_str().unwrap(), "--destination", dest.to_str().unwrap()],
  )?;

  assert_eq!(
    project.list_files(&dest)?,
    vec![
      "app-1.0.0.ivy.xml",
      "app-jvm-1.0.0.jar",
      "app-jvm-1.0.0.module",
      "app-jvm-1.0.0.module.sha256",
      "app-jvm-1.0.0.module.sha512",
    ]
  );

  let relocated: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(dest.join("app-jvm-1.0.0.module"))?)?;
  assert_eq!(relocated["component"]["url"], "app-1.0.0.module");
  Ok(())
}

#[test]
fn test_prepare_root_with_target_modules() -> Result<()> {
  let project = TestProject::new()?;
  let (root, jvm) = project.stage_multiplatform("com.example", "app", "1.0.0")?;

  let output = run_gap(
    &project.path,
    &[
      "prepare",
      root.to_str().unwrap(),
      "--destination",
      "out",
      "--with",
      jvm.to_str().unwrap(),
      "--json",
    ],
  )?;

  let report: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(report["documents"].as_array().unwrap().len(), 2);

  let files = project.list_files(&project.path.join("out"))?;
  assert_eq!(files.iter().filter(|f| f.ends_with(".ivy.xml")).count(), 1);
  assert!(files.contains(&"app-1.0.0.module.sha512".to_string()));
  assert!(files.contains(&"app-jvm-1.0.0.module.sha256".to_string()));

  let relocated_root: serde_json::Value =
    serde_json::from_str(&std::fs::read_to_string(project.path.join("out/app-1.0.0.module"))?)?;
  assert_eq!(relocated_root["variants"][0]["available-at"]["url"], "app-jvm-1.0.0.module");
  Ok(())
}

#[test]
fn test_prepare_reports_every_inconsistency() -> Result<()> {
  let project = TestProject::new()?;
  let root = project.stage_jvm_module("com.example", "app", "1.0.0")?;
  let other_group = project.stage_jvm_module("org.other", "app-js", "1.0.0")?;
  let other_version = project.stage_jvm_module("com.example", "app-native", "0.9.0")?;

  let output = run_gap_raw(
    &project.path,
    &[
      "prepare",
      root.to_str().unwrap(),
      "--destination",
      "out",
      "--with",
      other_group.to_str().unwrap(),
      "--with",
      other_version.to_str().unwrap(),
    ],
  )?;

  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("The group of all modules must be 'com.example'"), "{}", err);
  assert!(err.contains("app-js"), "{}", err);
  assert!(err.contains("The version of all modules must be '1.0.0'"), "{}", err);
  assert!(err.contains("app-native"), "{}", err);
  assert!(project.list_files(&project.path.join("out"))?.is_empty());
  Ok(())
}

#[test]
fn test_prepare_malformed_module() -> Result<()> {
  let project = TestProject::new()?;
  let module = project.write_file("staging/broken-1.0.0.module", r#"{"formatVersion": "1.1", "variants": []}"#)?;

  let output = run_gap_raw(
    &project.path,
    &["prepare", module.to_str().unwrap(), "--destination", "out"],
  )?;

  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("Failed to parse module metadata"));
  Ok(())
}

#[test]
fn test_prepare_uses_codec_config() -> Result<()> {
  let project = TestProject::new()?;
  let module = project.stage_jvm_module("com.example", "app", "1.0.0")?;
  project.write_file("gap.toml", "[codec]\npretty_print = false\n")?;

  run_gap(
    &project.path,
    &["prepare", module.to_str().unwrap(), "--destination", "out"],
  )?;

  let relocated = std::fs::read_to_string(project.path.join("out/app-1.0.0.module"))?;
  assert!(!relocated.trim_end().contains('\n'));
  Ok(())
}
