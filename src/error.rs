//! Errors raised while fingerprinting and rewriting assets.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used throughout the library.
pub type Result<T, E = StampError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StampError {
    /// Content for a name that must be hashed could not be located.
    #[error("the file '{name}' could not be found in the asset store")]
    ReferenceNotFound { name: String },

    /// A name was requested again while its own resolution was still running.
    #[error("cyclic asset reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },

    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("invalid reference pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl StampError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        Self::Io(path.into(), err)
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::ReferenceNotFound { name: name.into() }
    }
}
