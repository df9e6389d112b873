//! Error types for bundle assembly.

use std::{fmt::Display, path::Path, path::PathBuf};
use thiserror::Error;

/// Result type alias for bundling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while assembling bundles and archives
#[derive(Error, Debug)]
pub enum Error {
    /// Error with a human readable context message
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// Filesystem operation failed on a specific path
    #[error("{context} {path}: {error}")]
    Fs {
        context: &'static str,
        path: PathBuf,
        error: std::io::Error,
    },

    /// IO errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Path prefix stripping failed
    #[error("{0}")]
    StripError(#[from] std::path::StripPrefixError),

    /// Directory traversal failed
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Image decoding or resizing failed
    #[error("{0}")]
    ImageError(#[from] image::ImageError),

    /// Info.plist serialization failed
    #[error("{0}")]
    PlistError(#[from] plist::Error),

    /// Zip archive creation failed
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// External tool missing from PATH
    #[error("`{tool}` is required to create {purpose} but was not found in PATH")]
    ToolNotFound {
        tool: &'static str,
        purpose: &'static str,
    },

    /// External tool exited unsuccessfully
    #[error("`{tool}` failed: {stderr}")]
    ToolFailed { tool: &'static str, stderr: String },

    /// Generic error
    #[error("{0}")]
    GenericError(String),
}

/// Attach context to a [`Result`] or an [`Option`].
pub trait Context<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Attach the failing path to IO errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
