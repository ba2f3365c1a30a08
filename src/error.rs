//! Unified error hierarchy for FuelRS
//!
//! The calculation engine follows a defensive-default policy: missing or invalid
//! numbers are replaced by documented fallbacks rather than reported. The error
//! types here cover the few places where failing is the right answer, such as an
//! FFMI bulk target without a body-fat reading, malformed CLI input, or a broken
//! custom sport catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all FuelRS operations
#[derive(Debug, Error)]
pub enum FuelRsError {
    /// Input validation errors that must block a calculation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Sport catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Input validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// FFMI-based bulk targets are computed from lean mass, which needs body fat
    #[error("FFMI bulk target requires a body fat percentage")]
    BodyFatRequiredForFfmi,

    /// CLI exercise spec could not be parsed
    #[error("Invalid exercise '{spec}': {reason}")]
    InvalidExerciseSpec { spec: String, reason: String },
}

/// Sport catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Catalog file could not be read
    #[error("Could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Row does not describe a usable sport
    #[error("Invalid catalog entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },
}

/// Result type alias for FuelRS operations
pub type Result<T> = std::result::Result<T, FuelRsError>;

impl FuelRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FuelRsError::Validation(_) => ErrorSeverity::Warning,
            FuelRsError::Catalog(CatalogError::InvalidEntry { .. }) => ErrorSeverity::Warning,
            FuelRsError::Catalog(_) => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FuelRsError::Validation(ValidationError::BodyFatRequiredForFfmi) => {
                "An FFMI target needs your body fat %. Please enter it, or switch to a kg gain target."
                    .to_string()
            }
            FuelRsError::Validation(ValidationError::InvalidExerciseSpec { spec, .. }) => {
                format!(
                    "Could not understand exercise '{}'. Use sport:minutes or sport:minutes:intensity.",
                    spec
                )
            }
            FuelRsError::Catalog(CatalogError::Io { path, .. }) => {
                format!("Could not open sport catalog: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
