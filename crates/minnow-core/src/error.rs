use std::path::PathBuf;
use thiserror::Error;

use crate::mangle::MangleError;
use crate::model::ModelError;

/// Core error type for minnow operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse options at {path}: {source}")]
    OptionsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid semantic model: {0}")]
    Model(#[from] ModelError),

    #[error("Identifier mangling failed: {0}")]
    Mangle(#[from] MangleError),
}

impl Error {
    /// Stable diagnostic code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        use crate::codes;
        match self {
            Self::Io(_) | Self::Read { .. } => codes::IO_ERROR,
            Self::OptionsParse { .. } => codes::OPTIONS_INVALID,
            Self::Model(_) => codes::MODEL_INVALID,
            Self::Mangle(err) => err.code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
