//! Release publishing: from staged Maven publications to GitHub release assets
//!
//! - **publication**: `[[publications]]` entries and the paths derived from their coordinates
//! - **upload**: the release-tool seam and the query/create/guard/upload protocol
//! - **gh**: the GitHub CLI backend
//! - **orchestrator**: relocate then upload, for each enabled publication in order
//!
//! # Release tag
//!
//! The tag is the publication's version string, verbatim. A release that already
//! carries assets is never uploaded to again.

pub mod gh;
pub mod orchestrator;
pub mod publication;
pub mod upload;
