//! Error types for loading scenes and building parts
//!
//! Two tiers: [`Error`] aborts the run (the input document itself is
//! unusable), [`PartError`] rejects a single part record and the caller
//! carries on with the next one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that make the whole input document unusable
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input is not valid JSON
    #[error("cannot load JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level object has no `parts` array
    #[error("JSON must contain a top-level array named 'parts'")]
    MissingParts,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single part record that could not be turned into geometry
#[derive(Error, Debug, Clone, PartialEq)]
#[error("'{name}' invalid part record: {kind}")]
pub struct PartError {
    /// Position of the record in the `parts` array
    pub index: usize,
    /// Part name, or the `Part{index}` fallback
    pub name: String,
    pub kind: PartErrorKind,
}

/// Why a part record was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartErrorKind {
    /// The record is not an object or a field has the wrong type
    #[error("{0}")]
    Malformed(String),

    /// No `ecsBox` key, or it is null
    #[error("missing ecsBox")]
    MissingEcsBox,

    /// `ecsBox` cannot be reshaped into 4x4
    #[error("ecsBox has {0} elements, expected 16")]
    EcsBoxLength(usize),
}
