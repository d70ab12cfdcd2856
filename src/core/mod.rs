//! Core building blocks shared by every command
//!
//! - **config**: gh-asset-publish configuration (gap.toml) parsing and validation
//! - **error**: error types with exit codes and contextual help messages
//! - **process**: external tool execution with captured output and a timeout

pub mod config;
pub mod error;
pub mod process;
