//! Error types for collection and archiving

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the submission core
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The spec file does not exist
    #[error("no spec file found at {}", .path.display())]
    SpecNotFound {
        /// Expected location of the spec file
        path: PathBuf,
    },

    /// I/O failure on a specific path
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The path being read or written
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },

    /// A collected file does not live under the base directory
    #[error("{} is outside of base directory {}", .path.display(), .base.display())]
    PathEscape {
        /// The offending file
        path: PathBuf,
        /// The base directory entries are relative to
        base: PathBuf,
    },

    /// Two collected files map onto the same archive entry name
    #[error("duplicate archive entry '{name}'")]
    EntryCollision {
        /// The entry name that would be written twice
        name: String,
    },

    /// Zip encoding failure
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The finished archive could not be moved into place
    #[error("failed to move archive into place at {}: {source}", .path.display())]
    Persist {
        /// Final output path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },
}

impl SubmitError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SubmitError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, SubmitError>;
