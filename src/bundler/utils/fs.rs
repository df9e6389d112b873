//! File system utilities for bundling.
//!
//! Async wrappers around the directory and file operations used while
//! assembling `.app` bundles and staging disk images.

use crate::bail;
use crate::bundler::error::{ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Creates all of the directories of the specified path.
pub async fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("failed to create directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("failed to remove directory", path),
    }
}

/// Clears the way for a bundle directory at `path`.
///
/// An existing directory is removed. Anything else occupying the path is
/// left alone and reported, since it is not ours to delete.
pub async fn replace_bundle_dir(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.is_dir() => {
            log::debug!("Removing existing bundle: {}", path.display());
            remove_dir_all(path).await
        }
        Ok(_) => bail!(
            "{} exists and is not a directory; delete or move it manually",
            path.display()
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("failed to inspect", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{from:?} does not exist");
    }
    if !from.is_file() {
        bail!("{from:?} is not a file");
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("failed to create directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("failed to copy", from)?;
    Ok(())
}

/// Marks `path` executable for everyone (`0o755`). No-op off unix.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("failed to set permissions on", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Symlinks are recreated rather than followed on unix.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        bail!("{from:?} is not a directory");
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                symlink(&target, &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| {
        crate::bundler::Error::GenericError(format!("Directory copy task panicked: {e}"))
    })?
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::fs::copy(target, link).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_bundle_dir_removes_directories_only() {
        let tmp = tempfile::tempdir().unwrap();
        let app = tmp.path().join("MyApp.app");
        std::fs::create_dir_all(app.join("Contents")).unwrap();

        replace_bundle_dir(&app).await.unwrap();
        assert!(!app.exists());

        // Missing path is fine.
        replace_bundle_dir(&app).await.unwrap();

        std::fs::write(&app, b"not a bundle").unwrap();
        let err = replace_bundle_dir(&app).await.unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
        assert!(app.is_file());
    }

    #[tokio::test]
    async fn copy_dir_copies_nested_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        std::fs::create_dir_all(src.join("a/b")).unwrap();
        std::fs::write(src.join("a/b/file.txt"), b"hello").unwrap();

        let dst = tmp.path().join("out/dst");
        copy_dir(&src, &dst).await.unwrap();
        assert_eq!(std::fs::read(dst.join("a/b/file.txt")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn copy_file_rejects_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let err = copy_file(tmp.path(), &tmp.path().join("x")).await.unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
