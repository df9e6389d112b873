//! External tool detection and availability checking.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Location of `hdiutil`, used for DMG creation.
///
/// Cached to avoid repeated PATH lookups during bundling.
pub static HDIUTIL: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("hdiutil") {
    Ok(path) => {
        log::debug!("Found hdiutil at: {}", path.display());
        Some(path)
    }
    Err(e) => {
        log::debug!("hdiutil not found in PATH: {}. DMG images cannot be created.", e);
        None
    }
});
