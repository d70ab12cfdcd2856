//! `prepare`: relocate one module and its extra modules into a flat directory

use crate::core::config::PublishConfig;
use crate::core::error::PublishResult;
use crate::gmm::codec::{CodecConfig, MetadataCodec};
use crate::relocate::RelocationJob;
use std::env;
use std::path::PathBuf;

/// Run the prepare command
pub fn run_prepare(
  module_file: PathBuf,
  destination: PathBuf,
  with: Vec<PathBuf>,
  config: Option<PathBuf>,
  json: bool,
) -> PublishResult<()> {
  let codec = MetadataCodec::new(codec_config(config)?);

  let report = RelocationJob::new(&codec, module_file, destination)
    .with_documents(with)
    .with_progress(!json)
    .run()?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  println!("📦 Relocated {} module file(s) into {}", report.documents.len(), report.destination.display());
  println!();
  for file in &report.files {
    if let Some(name) = file.file_name() {
      println!("   {}", name.to_string_lossy());
    }
  }
  println!();
  println!("✅ Ready to upload");
  Ok(())
}

/// Codec settings from an explicit config, a config found in the working directory, or defaults
fn codec_config(config: Option<PathBuf>) -> PublishResult<CodecConfig> {
  if let Some(path) = config {
    return Ok(PublishConfig::load_file(&path)?.codec);
  }
  let cwd = env::current_dir()?;
  match PublishConfig::find_config_path(&cwd) {
    Some(path) => Ok(PublishConfig::load_file(&path)?.codec),
    None => Ok(CodecConfig::default()),
  }
}
