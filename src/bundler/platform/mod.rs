//! Platform-specific bundle writers.

pub mod archive;
pub mod macos;

use crate::config::PakagerSettings;

/// File name for a distributable artifact: `<realName>-<version>.<extension>`.
pub fn artifact_name(settings: &PakagerSettings, extension: &str) -> String {
    format!("{}-{}.{}", settings.real_name, settings.version, extension)
}
