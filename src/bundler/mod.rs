//! macOS bundle assembly.
//!
//! Consumes resolved [`PakagerSettings`](crate::config::PakagerSettings) and
//! produces the `.app` bundle plus any requested `.dmg`, `.zip`, or
//! `.tar.gz` artifacts.

pub mod builder;
pub mod error;
pub mod platform;
pub mod utils;

use crate::config::Format;
use std::path::PathBuf;

pub use builder::Bundler;
pub use error::{Error, Result};

/// A created artifact with its size and checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Format this artifact was created for.
    pub format: Format,
    /// Absolute path to the artifact (a directory for `.app` bundles).
    pub path: PathBuf,
    /// Total size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256.
    pub checksum: String,
}
