//! Error types for configuration loading and resolution.

use super::{FieldPath, ViolationReport};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain a raw configuration. Fatal: nothing can be resolved.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("config file not found ({path})")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("configuration root must be a mapping ({origin})")]
    NotAMapping { origin: String },

    #[error("invalid working directory {path}: {source}")]
    WorkingDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A malformed schema definition. These are programming errors in the
/// schema, detected when it is built.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field {field} is declared more than once")]
    DuplicateField { field: FieldPath },

    #[error("field {field} depends on undeclared field {target}")]
    UnknownReference { field: FieldPath, target: FieldPath },

    #[error("dependency cycle through field {field}")]
    Cycle { field: FieldPath },

    #[error("group constraint names undeclared field {field}")]
    UnknownGroupMember { field: FieldPath },

    #[error("field {field} has children but is not an object")]
    ChildrenOnLeaf { field: FieldPath },
}

/// Outcome of a failed resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// One or more blocking violations. Carries the full report.
    #[error("invalid configuration ({} error(s))", .0.errors().len())]
    Invalid(ViolationReport),

    /// Filesystem fault unrelated to existence checking.
    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The resolved tree did not map onto the typed settings.
    #[error("resolved configuration does not match settings: {0}")]
    Internal(#[from] serde_json::Error),
}

impl ResolveError {
    /// Returns the violation report for [`ResolveError::Invalid`].
    pub fn report(&self) -> Option<&ViolationReport> {
        match self {
            ResolveError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}
