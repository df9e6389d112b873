//! Path resolution and filesystem checks against an explicit working directory.

use path_absolutize::Absolutize;
use std::io;
use std::path::{Path, PathBuf};

/// Expected type of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryType {
    File,
    Dir,
}

/// Result of looking a path up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStatus {
    Matches,
    Missing,
    WrongType,
}

/// Makes `dir` absolute against the process directory. Used once at the
/// resolver boundary; everything after that goes through [`resolve`].
pub(crate) fn absolute_dir(dir: &Path) -> io::Result<PathBuf> {
    Ok(dir.absolutize()?.into_owned())
}

/// Resolves `raw` against `working_dir`. Absolute inputs are only normalized.
pub(crate) fn resolve(raw: &str, working_dir: &Path) -> io::Result<PathBuf> {
    Ok(Path::new(raw).absolutize_from(working_dir)?.into_owned())
}

/// Checks that `path` exists and has the expected type. Symlinks are
/// followed. Faults other than a missing entry are returned as errors.
pub(crate) fn check_entry(path: &Path, expected: EntryType) -> io::Result<EntryStatus> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(EntryStatus::Missing);
        }
        Err(e) => return Err(e),
    };

    let matches = match expected {
        EntryType::File => metadata.is_file(),
        EntryType::Dir => metadata.is_dir(),
    };
    Ok(if matches {
        EntryStatus::Matches
    } else {
        EntryStatus::WrongType
    })
}
