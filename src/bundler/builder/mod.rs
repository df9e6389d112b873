//! Bundle orchestration and coordination.
//!
//! - [`checksum`] - SHA256 checksum and size calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct and bundling operations
//! - [`tool_detection`] - External tool availability checking

mod checksum;
mod orchestrator;
mod tool_detection;

pub use checksum::{artifact_size, calculate_sha256};
pub use orchestrator::Bundler;
pub use tool_detection::HDIUTIL;
