//! Gradle Module Metadata: the `.module` JSON model and its codec

pub mod codec;
pub mod model;
