//! Checksums and cross-platform path display

use crate::core::error::{PublishError, PublishResult, ResultExt};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Digest algorithms used for published checksum files
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChecksumAlgorithm {
  Sha256,
  Sha512,
}

impl ChecksumAlgorithm {
  /// File extension of the checksum file, without the dot
  pub fn extension(self) -> &'static str {
    match self {
      ChecksumAlgorithm::Sha256 => "sha256",
      ChecksumAlgorithm::Sha512 => "sha512",
    }
  }
}

impl fmt::Display for ChecksumAlgorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChecksumAlgorithm::Sha256 => write!(f, "SHA-256"),
      ChecksumAlgorithm::Sha512 => write!(f, "SHA-512"),
    }
  }
}

impl FromStr for ChecksumAlgorithm {
  type Err = PublishError;

  /// Accepts `SHA-256`, `sha256`, `SHA256` and the 512 equivalents
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().replace('-', "").as_str() {
      "sha256" => Ok(ChecksumAlgorithm::Sha256),
      "sha512" => Ok(ChecksumAlgorithm::Sha512),
      _ => Err(PublishError::message(format!("Unsupported checksum algorithm '{}'", s))),
    }
  }
}

/// Compute the lowercase hex digest of a file
///
/// The file is streamed through the hasher, never read into memory whole.
pub fn compute_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> PublishResult<String> {
  let mut file = File::open(path).with_context(|| format!("Failed to open {} for checksum", path.display()))?;
  let digest = match algorithm {
    ChecksumAlgorithm::Sha256 => {
      let mut hasher = Sha256::new();
      io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to read {}", path.display()))?;
      format!("{:x}", hasher.finalize())
    }
    ChecksumAlgorithm::Sha512 => {
      let mut hasher = Sha512::new();
      io::copy(&mut file, &mut hasher).with_context(|| format!("Failed to read {}", path.display()))?;
      format!("{:x}", hasher.finalize())
    }
  };
  Ok(digest)
}

/// Render a path with forward slashes, for logs and messages
pub fn invariant_path(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Final `/`-separated segment of a relative URL
pub fn last_url_segment(url: &str) -> &str {
  url.rsplit('/').next().unwrap_or(url)
}
