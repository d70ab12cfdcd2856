//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A scratch project with a Maven-layout staging repository
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    std::fs::create_dir_all(path.join("staging"))?;
    Ok(Self { _root: root, path })
  }

  /// Directory of `group:artifact:version` in the staging repository
  pub fn staged_dir(&self, group: &str, artifact: &str, version: &str) -> PathBuf {
    let mut dir = self.path.join("staging");
    for segment in group.split('.') {
      dir.push(segment);
    }
    dir.join(artifact).join(version)
  }

  /// Stage a JVM-style module with one jar, and return the module file path
  pub fn stage_jvm_module(&self, group: &str, artifact: &str, version: &str) -> Result<PathBuf> {
    let dir = self.staged_dir(group, artifact, version);
    std::fs::create_dir_all(&dir)?;
    let jar = format!("{}-{}.jar", artifact, version);
    std::fs::write(dir.join(&jar), format!("jar bytes of {}", artifact))?;

    let module = dir.join(format!("{}-{}.module", artifact, version));
    std::fs::write(&module, jvm_module_json(group, artifact, version, &jar))?;
    Ok(module)
  }

  /// Stage a Kotlin Multiplatform root module plus one `-jvm` target module
  ///
  /// Returns the root and target module paths.
  pub fn stage_multiplatform(&self, group: &str, artifact: &str, version: &str) -> Result<(PathBuf, PathBuf)> {
    let target = format!("{}-jvm", artifact);

    let root_dir = self.staged_dir(group, artifact, version);
    std::fs::create_dir_all(&root_dir)?;
    let root = root_dir.join(format!("{}-{}.module", artifact, version));
    std::fs::write(
      &root,
      format!(
        r#"{{
  "formatVersion": "1.1",
  "component": {{
    "group": "{group}",
    "module": "{artifact}",
    "version": "{version}",
    "attributes": {{
      "org.gradle.status": "release"
    }}
  }},
  "createdBy": {{
    "gradle": {{
      "version": "8.5"
    }}
  }},
  "variants": [
    {{
      "name": "jvmApiElements-published",
      "attributes": {{
        "org.gradle.category": "library",
        "org.gradle.usage": "java-api",
        "org.jetbrains.kotlin.platform.type": "jvm"
      }},
      "available-at": {{
        "url": "../../{target}/{version}/{target}-{version}.module",
        "group": "{group}",
        "module": "{target}",
        "version": "{version}"
      }}
    }}
  ]
}}
"#
      ),
    )?;

    let target_dir = self.staged_dir(group, &target, version);
    std::fs::create_dir_all(&target_dir)?;
    let jar = format!("{}-{}.jar", target, version);
    std::fs::write(target_dir.join(&jar), "jvm jar bytes")?;
    let secondary = target_dir.join(format!("{}-{}.module", target, version));
    std::fs::write(
      &secondary,
      format!(
        r#"{{
  "formatVersion": "1.1",
  "component": {{
    "url": "../../{artifact}/{version}/{artifact}-{version}.module",
    "group": "{group}",
    "module": "{artifact}",
    "version": "{version}",
    "attributes": {{
      "org.gradle.status": "release"
    }}
  }},
  "variants": [
    {{
      "name": "jvmApiElements-published",
      "attributes": {{
        "org.gradle.category": "library",
        "org.gradle.jvm.version": 11,
        "org.gradle.usage": "java-api",
        "org.gradle.libraryelements": "jar",
        "org.jetbrains.kotlin.platform.type": "jvm"
      }},
      "files": [
        {{
          "name": "{jar}",
          "url": "{jar}",
          "size": 13,
          "sha512": "00",
          "sha256": "00",
          "sha1": "00",
          "md5": "00"
        }}
      ]
    }}
  ]
}}
"#
      ),
    )?;

    Ok((root, secondary))
  }

  pub fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
    let path = self.path.join(relative);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, content)?;
    Ok(path)
  }

  /// Names of regular files directly inside `dir`, sorted
  pub fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
      let entry = entry?;
      if entry.file_type()?.is_file() {
        names.push(entry.file_name().to_string_lossy().to_string());
      }
    }
    names.sort();
    Ok(names)
  }
}

pub fn jvm_module_json(group: &str, artifact: &str, version: &str, jar: &str) -> String {
  format!(
    r#"{{
  "formatVersion": "1.1",
  "component": {{
    "group": "{group}",
    "module": "{artifact}",
    "version": "{version}",
    "attributes": {{
      "org.gradle.status": "release"
    }}
  }},
  "createdBy": {{
    "gradle": {{
      "version": "8.5",
      "buildId": "abc123"
    }}
  }},
  "variants": [
    {{
      "name": "apiElements",
      "attributes": {{
        "org.gradle.category": "library",
        "org.gradle.dependency.bundling": "external",
        "org.gradle.jvm.version": 11,
        "org.gradle.libraryelements": "jar",
        "org.gradle.usage": "java-api"
      }},
      "files": [
        {{
          "name": "{jar}",
          "url": "{jar}",
          "size": 42,
          "sha512": "00",
          "sha256": "00",
          "sha1": "00",
          "md5": "00"
        }}
      ]
    }},
    {{
      "name": "runtimeElements",
      "attributes": {{
        "org.gradle.category": "library",
        "org.gradle.dependency.bundling": "external",
        "org.gradle.jvm.version": 11,
        "org.gradle.libraryelements": "jar",
        "org.gradle.usage": "java-runtime"
      }},
      "dependencies": [
        {{
          "group": "org.jetbrains.kotlin",
          "module": "kotlin-stdlib",
          "version": {{
            "requires": "1.9.21"
          }}
        }}
      ],
      "files": [
        {{
          "name": "{jar}",
          "url": "{jar}",
          "size": 42,
          "sha512": "00",
          "sha256": "00",
          "sha1": "00",
          "md5": "00"
        }}
      ]
    }}
  ]
}}
"#
  )
}

/// A `gh` stand-in: logs every call to `gh.log` and keeps release state in files
///
/// `release view` succeeds when `<state>/<tag>` exists; existing assets are the lines of
/// that file.
#[cfg(unix)]
pub fn fake_gh(dir: &Path) -> Result<PathBuf> {
  use std::os::unix::fs::PermissionsExt;

  let state = dir.join("gh-state");
  std::fs::create_dir_all(&state)?;
  let script = dir.join("fake-gh");
  std::fs::write(
    &script,
    format!(
      r#"#!/bin/sh
STATE="{state}"
echo "$*" >> "{log}"
case "$1" in
  version) echo "gh version 2.40.0 (2023-12-01)"; exit 0 ;;
esac
TAG="$3"
case "$2" in
  view)
    [ -f "$STATE/$TAG" ] || {{ echo "release not found" >&2; exit 1; }}
    case "$*" in *--json*) cat "$STATE/$TAG" ;; esac ;;
  create) : > "$STATE/$TAG" ;;
  upload)
    shift 5
    for f in "$@"; do
      [ -f "$f" ] || {{ echo "missing $f" >&2; exit 1; }}
      echo "$f" >> "$STATE/$TAG"
    done ;;
esac
"#,
      state = state.display(),
      log = dir.join("gh.log").display(),
    ),
  )?;
  std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;
  Ok(script)
}

/// Lines logged by [`fake_gh`]
pub fn gh_calls(dir: &Path) -> Vec<String> {
  std::fs::read_to_string(dir.join("gh.log"))
    .unwrap_or_default()
    .lines()
    .map(String::from)
    .collect()
}

/// Run gh-asset-publish, failing when it exits unsuccessfully
pub fn run_gap(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_gap_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "gh-asset-publish command failed: gh-asset-publish {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run gh-asset-publish and return its output whatever the exit status
pub fn run_gap_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_gh-asset-publish");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run gh-asset-publish")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
