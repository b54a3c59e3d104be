//! Error types for bathy-project.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for project operations.
pub type Result<T> = std::result::Result<T, ProjectError>;

/// Errors that can occur while managing a project.
#[derive(Error, Debug)]
pub enum ProjectError {
    // Folder Errors
    #[error("The passed output folder does not exist: {path}")]
    InvalidOutputFolder { path: PathBuf },

    #[error("Directory creation failed: {path}: {source}")]
    DirectoryCreateError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    JsonSerializationError(#[from] serde_json::Error),

    // Metadata Errors
    #[error("Invalid time units: {units}")]
    InvalidTimeUnits { units: String },

    #[error("Unsupported calendar: {calendar}")]
    UnsupportedCalendar { calendar: String },

    #[error("Timestamp out of range: {value} {units}")]
    TimestampOutOfRange { value: f64, units: String },

    // Source Errors
    #[error("Unable to read source {path}: {reason}")]
    SourceError { path: PathBuf, reason: String },

    // Logging Errors
    #[error("Logger initialization failed: {0}")]
    LoggerInit(#[from] log::SetLoggerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProjectError {
    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ProjectError::InvalidOutputFolder { .. } => {
                Some("Create the folder first or pick an existing one.")
            }
            ProjectError::DirectoryCreateError { .. } | ProjectError::FileWriteError { .. } => {
                Some("Check the permissions of the project folder.")
            }
            ProjectError::JsonSerializationError(_) => {
                Some("The project info file may be corrupted. Restore it from a backup.")
            }
            ProjectError::UnsupportedCalendar { .. } => {
                Some("Only gregorian-compatible calendars are supported.")
            }
            ProjectError::SourceError { .. } => {
                Some("Check that the file is a valid BAG, GeoTIFF or ASCII Grid.")
            }
            _ => None,
        }
    }
}
