//! Zip and gzip-tar archives of an assembled `.app` bundle.
//!
//! Entries are rooted at the bundle directory name, so extracting
//! `MyApp-1.0.0.zip` yields `MyApp.app/`.

use crate::bundler::{Result, error::ErrorExt};
use flate2::{Compression, write::GzEncoder};
use std::fs::File;
use std::path::{Path, PathBuf};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Writes `app` into a deflated zip archive at `dest`.
pub async fn zip_app(app: &Path, dest: &Path) -> Result<PathBuf> {
    log::info!("Creating zip archive {}", dest.display());
    let app = app.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        write_zip(&app, &dest)?;
        Ok(dest)
    })
    .await
    .map_err(|e| crate::bundler::Error::GenericError(format!("Zip task panicked: {e}")))?
}

/// Writes `app` into a gzip-compressed tarball at `dest`.
pub async fn tar_gz_app(app: &Path, dest: &Path) -> Result<PathBuf> {
    log::info!("Creating tar.gz archive {}", dest.display());
    let app = app.to_path_buf();
    let dest = dest.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<PathBuf> {
        write_tar_gz(&app, &dest)?;
        Ok(dest)
    })
    .await
    .map_err(|e| crate::bundler::Error::GenericError(format!("Archive task panicked: {e}")))?
}

fn write_zip(app: &Path, dest: &Path) -> Result<()> {
    let base = app.parent().unwrap_or(app);
    let file = File::create(dest).fs_context("failed to create", dest)?;
    let mut zip = ZipWriter::new(file);

    for entry in walkdir::WalkDir::new(app).sort_by_file_name() {
        let entry = entry?;
        let name = entry
            .path()
            .strip_prefix(base)?
            .to_string_lossy()
            .replace('\\', "/");
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(unix_mode(&entry.metadata()?));

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut source = File::open(entry.path()).fs_context("failed to open", entry.path())?;
            std::io::copy(&mut source, &mut zip).fs_context("failed to archive", entry.path())?;
        }
    }

    zip.finish()?;
    Ok(())
}

fn write_tar_gz(app: &Path, dest: &Path) -> Result<()> {
    let root = app
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bundle.app"));
    let file = File::create(dest).fs_context("failed to create", dest)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(&root, app)
        .fs_context("failed to archive", app)?;
    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .fs_context("failed to finish", dest)?;
    Ok(())
}

#[cfg(unix)]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn unix_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.is_dir() { 0o755 } else { 0o644 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn fake_app(root: &Path) -> PathBuf {
        let app = root.join("MyApp.app");
        std::fs::create_dir_all(app.join("Contents/MacOS")).unwrap();
        std::fs::write(app.join("Contents/MacOS/MyApp"), b"binary").unwrap();
        std::fs::write(app.join("Contents/Info.plist"), b"<plist/>").unwrap();
        app
    }

    #[tokio::test]
    async fn zip_is_rooted_at_bundle_name() {
        let tmp = tempfile::tempdir().unwrap();
        let app = fake_app(tmp.path());
        let dest = tmp.path().join("MyApp-1.0.0.zip");

        zip_app(&app, &dest).await.unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut contents = String::new();
        archive
            .by_name("MyApp.app/Contents/MacOS/MyApp")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "binary");
    }

    #[tokio::test]
    async fn tar_gz_is_rooted_at_bundle_name() {
        let tmp = tempfile::tempdir().unwrap();
        let app = fake_app(tmp.path());
        let dest = tmp.path().join("MyApp-1.0.0.tar.gz");

        tar_gz_app(&app, &dest).await.unwrap();

        let decoder = flate2::read::GzDecoder::new(File::open(&dest).unwrap());
        let mut archive = tar::Archive::new(decoder);
        let names: Vec<PathBuf> = archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().into_owned())
            .collect();
        assert!(names.contains(&PathBuf::from("MyApp.app/Contents/Info.plist")));
    }
}
