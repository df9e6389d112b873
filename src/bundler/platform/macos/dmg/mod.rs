//! macOS DMG disk image creator.
//!
//! Creates drag-to-install DMG files using the native hdiutil tool.
//! The DMG includes the .app bundle and an Applications symlink.

mod creation;

use crate::bundler::{Error, Result, builder::HDIUTIL, platform::artifact_name};
use crate::config::PakagerSettings;
use std::path::{Path, PathBuf};

pub use creation::create_dmg;

/// Wraps an assembled `.app` into `<realName>-<version>.dmg` in `output_dir`.
///
/// Fails with [`Error::ToolNotFound`] where `hdiutil` is unavailable
/// (anywhere but macOS).
pub async fn bundle_dmg(
    settings: &PakagerSettings,
    app_bundle: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    log::info!("Creating DMG for {}", settings.real_name);

    let hdiutil = HDIUTIL.as_deref().ok_or(Error::ToolNotFound {
        tool: "hdiutil",
        purpose: "DMG disk images",
    })?;

    let dmg_path = output_dir.join(artifact_name(settings, "dmg"));
    create_dmg(hdiutil, &settings.real_name, app_bundle, &dmg_path).await?;
    Ok(dmg_path)
}
