//! Artifact checksum calculation.
//!
//! Archives and disk images are single files; `.app` bundles are directory
//! trees and get a combined hash over every file they contain.

use crate::{bail, bundler::Result, bundler::error::ErrorExt};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the hex SHA-256 of a file, or of a directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;

    let mut hasher = Sha256::new();
    if metadata.is_file() {
        hash_file(path, &mut hasher).await?;
    } else if metadata.is_dir() {
        hash_directory(path, &mut hasher).await?;
    } else {
        bail!("Path is neither file nor directory: {}", path.display())
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Total size in bytes of a file or of every file under a directory.
pub async fn artifact_size(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .fs_context("reading artifact metadata", path)?;
    if metadata.is_file() {
        return Ok(metadata.len());
    }

    let mut size = 0;
    for entry in sorted_files(path) {
        size += entry
            .metadata()
            .map_err(crate::bundler::Error::WalkdirError)?
            .len();
    }
    Ok(size)
}

async fn hash_file(path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = tokio::fs::File::open(path)
        .await
        .fs_context("opening file for hashing", path)?;
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(())
}

/// Hashes relative path then content of each file, in sorted path order.
async fn hash_directory(dir: &Path, hasher: &mut Sha256) -> Result<()> {
    for entry in sorted_files(dir) {
        let rel_path = entry.path().strip_prefix(dir)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());
        hash_file(entry.path(), hasher).await?;
    }
    Ok(())
}

fn sorted_files(dir: &Path) -> Vec<walkdir::DirEntry> {
    let mut entries: Vec<_> = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();
    entries.sort_by(|a, b| a.path().cmp(b.path()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_hash_matches_known_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("hello.txt");
        std::fs::write(&file, b"hello").unwrap();

        assert_eq!(
            calculate_sha256(&file).await.unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(artifact_size(&file).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn directory_hash_depends_on_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir_all(a.join("Contents")).unwrap();
        std::fs::create_dir_all(b.join("Other")).unwrap();
        std::fs::write(a.join("Contents/x"), b"same").unwrap();
        std::fs::write(b.join("Other/x"), b"same").unwrap();

        let hash_a = calculate_sha256(&a).await.unwrap();
        assert_eq!(hash_a, calculate_sha256(&a).await.unwrap());
        assert_ne!(hash_a, calculate_sha256(&b).await.unwrap());
        assert_eq!(artifact_size(&a).await.unwrap(), 4);
    }
}
