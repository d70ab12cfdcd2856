//! `checksum`: print the digest of one file

use crate::core::error::PublishResult;
use crate::utils::{ChecksumAlgorithm, compute_checksum};
use std::path::PathBuf;

/// Run the checksum command
pub fn run_checksum(file: PathBuf, algorithm: ChecksumAlgorithm) -> PublishResult<()> {
  println!("{}", compute_checksum(&file, algorithm)?);
  Ok(())
}
