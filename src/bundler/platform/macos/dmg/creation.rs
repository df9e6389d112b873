//! Core DMG creation logic using hdiutil.
//!
//! Handles staging the `.app` next to an `Applications` symlink and running
//! `hdiutil create` over the staging directory.

use crate::bundler::{
    Error,
    error::{Context, ErrorExt, Result},
    utils::fs,
};
use std::path::Path;

/// Create a compressed (UDZO) DMG at `dmg_path` from `app_bundle`.
///
/// # DMG Creation Steps
/// 1. Create temporary staging directory using tempfile crate
/// 2. Copy .app bundle to staging directory
/// 3. Create Applications symlink: `staging/Applications -> /Applications`
/// 4. Run hdiutil create over the staging directory
/// 5. Automatic cleanup (tempfile handles it)
pub async fn create_dmg(
    hdiutil: &Path,
    volume_name: &str,
    app_bundle: &Path,
    dmg_path: &Path,
) -> Result<()> {
    if dmg_path.exists() {
        tokio::fs::remove_file(dmg_path)
            .await
            .fs_context("removing old DMG", dmg_path)?;
    }

    let temp_dir = tempfile::tempdir().map_err(|e| {
        Error::GenericError(format!(
            "Failed to create temporary directory for DMG contents: {e}"
        ))
    })?;
    let staging_path = temp_dir.path();

    let app_name = app_bundle
        .file_name()
        .context("Invalid app bundle path")?;
    let staged_app = staging_path.join(app_name);

    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(app_bundle, &staged_app)
        .await
        .with_context(|| {
            format!(
                "copying .app bundle to staging directory: {}",
                staged_app.display()
            )
        })?;

    #[cfg(unix)]
    {
        let applications_link = staging_path.join("Applications");
        std::os::unix::fs::symlink("/Applications", &applications_link)
            .fs_context("creating Applications symlink", &applications_link)?;
    }

    log::info!("Creating DMG {}...", dmg_path.display());
    let output = tokio::process::Command::new(hdiutil)
        .arg("create")
        .arg("-volname")
        .arg(volume_name)
        .arg("-srcfolder")
        .arg(staging_path)
        .arg("-ov")
        .arg("-format")
        .arg("UDZO")
        .arg(dmg_path)
        .output()
        .await
        .fs_context("failed to execute", hdiutil)?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: "hdiutil",
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    log::info!("✓ Created DMG: {}", dmg_path.display());

    // tempfile cleans up the staging directory
    drop(temp_dir);
    Ok(())
}
