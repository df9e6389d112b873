//! Configuration resolver and bundler for macOS applications.
//!
//! pakager reads a `pakager` section from `package.json` (or TOML), fills in
//! defaults, validates every field against the filesystem, and packages the
//! configured binary as an `.app` bundle with optional `.dmg`, `.zip`, and
//! `.tar.gz` artifacts.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{ConfigResolver, PakagerSettings, ResolvedConfig, Schema};
pub use error::{CliError, PakagerError, Result};
