//! Error handling for MipKit
//!
//! Provides structured error types for all layers of the core:
//! - Point errors (validation, lookup)
//! - Snapshot errors (manager restore)
//! - Persistence errors (project file I/O and decoding)
//!
//! All error types use `thiserror` for ergonomic error handling. Note that
//! rejected state transitions are NOT errors: they are an expected outcome,
//! modeled as a `(bool, reason)` result plus a `TransitionBlocked` event
//! (see `state::StateManager`).

use thiserror::Error;

/// Point validation and lookup errors
///
/// Raised when a measurement point cannot be created or addressed.
/// The manager catches these at its boundary and surfaces a
/// `None`/`false` return plus a logged reason.
#[derive(Error, Debug, Clone)]
pub enum PointError {
    /// Coordinates fall outside the board area
    #[error("Coordinates ({x}, {y}) outside the board area")]
    InvalidCoordinates {
        /// Requested x coordinate in image pixels.
        x: i32,
        /// Requested y coordinate in image pixels.
        y: i32,
    },

    /// A geometry dimension is outside the configured valid range
    #[error("{dimension} of {value}px outside valid range {min}..={max}px")]
    DimensionOutOfRange {
        /// The dimension that failed validation ("radius", "width", "height").
        dimension: &'static str,
        /// The rejected value in pixels.
        value: u32,
        /// Minimum allowed size in pixels.
        min: u32,
        /// Maximum allowed size in pixels.
        max: u32,
    },

    /// No point with the given id exists
    #[error("Point #{id} not found")]
    NotFound {
        /// The unknown point id.
        id: u32,
    },

    /// The maximum point count was reached
    #[error("Point limit of {max} reached")]
    LimitReached {
        /// The configured ceiling.
        max: usize,
    },
}

/// Manager snapshot restore errors
#[derive(Error, Debug, Clone)]
pub enum SnapshotError {
    /// Two point records carry the same id
    #[error("Duplicate point id {id} in snapshot")]
    DuplicateId {
        /// The duplicated id.
        id: u32,
    },

    /// A point record could not be rebuilt
    #[error("Invalid point record at index {index}: {reason}")]
    InvalidRecord {
        /// Position of the record in the snapshot list.
        index: usize,
        /// Why the record was rejected.
        reason: String,
    },

    /// The snapshot settings could not be applied
    #[error("Invalid snapshot settings: {reason}")]
    InvalidSettings {
        /// Why the settings were rejected.
        reason: String,
    },
}

/// Project persistence errors
///
/// These never cross the persistence boundary: the save/load functions
/// catch them, log, and return `false`/`None` to the caller.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// File does not exist
    #[error("Project file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The envelope `format` field is not "mip"
    #[error("Not a .mip project file (format field is {found:?})")]
    WrongFormat {
        /// Value of the `format` field, if any.
        found: Option<String>,
    },

    /// Gzip decompression failed
    #[error("Failed to decompress project data: {reason}")]
    Decompression {
        /// Underlying decoder message.
        reason: String,
    },

    /// Base64 image payload could not be decoded
    #[error("Invalid image payload: {reason}")]
    InvalidImagePayload {
        /// Underlying decoder message.
        reason: String,
    },

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main error type for MipKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Point error
    #[error(transparent)]
    Point(#[from] PointError),

    /// Snapshot error
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a point-not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Point(PointError::NotFound { .. }))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Point(PointError::InvalidCoordinates { .. })
                | Error::Point(PointError::DimensionOutOfRange { .. })
        )
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
