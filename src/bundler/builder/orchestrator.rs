//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that assembles the
//! `.app` bundle and derives every requested output format from it.

use crate::bundler::{
    BundledArtifact, Result,
    platform::{archive, artifact_name, macos},
    utils::fs,
};
use crate::config::{Format, PakagerSettings};

use super::checksum::{artifact_size, calculate_sha256};

/// Main bundler orchestrator.
///
/// The `.app` bundle is always assembled first because every other format
/// wraps it. When `app` itself is not a requested format, the bundle is
/// staged in a temporary directory and removed once the other artifacts
/// exist.
///
/// # Examples
///
/// ```no_run
/// use pakager::bundler::Bundler;
/// use pakager::config::PakagerSettings;
///
/// # async fn example(settings: PakagerSettings) -> pakager::bundler::Result<()> {
/// let artifacts = Bundler::new(settings).bundle().await?;
/// for artifact in artifacts {
///     println!("{}: {} ({} bytes)", artifact.format, artifact.path.display(), artifact.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: PakagerSettings,
}

impl Bundler {
    /// Creates a new bundler from resolved settings.
    pub fn new(settings: PakagerSettings) -> Self {
        Self { settings }
    }

    /// Builds every format in `mac.formats`, in the order listed.
    ///
    /// # Returns
    ///
    /// One [`BundledArtifact`] per requested format.
    pub async fn bundle(&self) -> Result<Vec<BundledArtifact>> {
        let settings = &self.settings;
        let output_dir = settings.output_dir.as_path();
        fs::create_dir_all(output_dir).await?;

        let staging = if settings.mac.wants(Format::App) {
            None
        } else {
            Some(tempfile::tempdir()?)
        };
        let app_dir = staging.as_ref().map_or(output_dir, |dir| dir.path());
        let app_path = macos::app::bundle_app(settings, app_dir).await?;

        let mut artifacts = Vec::with_capacity(settings.mac.formats.len());
        for &format in &settings.mac.formats {
            let path = match format {
                Format::App => app_path.clone(),
                Format::Dmg => macos::dmg::bundle_dmg(settings, &app_path, output_dir).await?,
                Format::Zip => {
                    let dest = output_dir.join(artifact_name(settings, "zip"));
                    archive::zip_app(&app_path, &dest).await?
                }
                Format::TarGz => {
                    let dest = output_dir.join(artifact_name(settings, "tar.gz"));
                    archive::tar_gz_app(&app_path, &dest).await?
                }
            };

            let size = artifact_size(&path).await?;
            let checksum = calculate_sha256(&path).await?;
            log::debug!("{format} artifact {} sha256={checksum}", path.display());
            artifacts.push(BundledArtifact {
                format,
                path,
                size,
                checksum,
            });
        }

        if let Some(staging) = staging {
            log::debug!("Removing staged bundle in {}", staging.path().display());
            staging.close()?;
        }

        Ok(artifacts)
    }
}
