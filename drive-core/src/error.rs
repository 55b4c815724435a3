//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Drive Engine
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`.
//! Intent-level failures (`EmptyName`, `EmptyUploadBatch`, `UploadInProgress`)
//! are recoverable no-ops; `DuplicateId` signals caller misuse of the catalog.
//! Of those, only `EmptyUploadBatch` is swallowed without telling the user.

use std::{io, path::PathBuf};
use thiserror::Error;

use crate::model::entry::EntryId;

/// Unified error type for all drive operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Folder creation with a blank or whitespace-only name.
    #[error("Folder name must not be empty")]
    EmptyName,

    /// An inserted entry id already exists in the catalog (or twice in one batch).
    #[error("Duplicate entry id: {0}")]
    DuplicateId(EntryId),

    /// Upload started with zero descriptors.
    #[error("Upload batch is empty")]
    EmptyUploadBatch,

    /// Upload started while another run is still in flight.
    #[error("An upload is already in progress ({progress}%)")]
    UploadInProgress { progress: u8 },

    /// Flag mutation or lookup against an id the catalog does not hold.
    #[error("Unknown entry: {0}")]
    UnknownEntry(EntryId),

    /// Headless shell input that does not parse into an action.
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Serialization or deserialization error (e.g., JSON snapshots).
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    #[must_use]
    /// Attach extra context to an error.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        Self::Other(format!("{}: {}", ctx.into(), self))
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a config file I/O failure with the offending path
    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// True for intent rejections that leave state untouched and are not
    /// reported back to the user.
    #[must_use]
    pub const fn is_silent_rejection(&self) -> bool {
        matches!(self, Self::EmptyUploadBatch)
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
