//! CLI commands for gh-asset-publish
//!
//! ## Relocation
//! - **prepare**: flatten one module (and any extra modules) into a release directory
//!
//! ## Releases
//! - **upload**: upload a prepared directory to a GitHub release
//! - **publish**: prepare and upload every enabled publication in gap.toml
//!
//! ## Utilities
//! - **checksum**: print a file digest
//! - **init**: write a starter gap.toml

pub mod checksum;
pub mod init;
pub mod prepare;
pub mod publish;
pub mod upload;

pub use checksum::run_checksum;
pub use init::run_init;
pub use prepare::run_prepare;
pub use publish::run_publish;
pub use upload::run_upload;
