//! # Error Types
//!
//! Structured error types for girder_core. Every failure the engine can
//! produce is one of these variants, returned explicitly; nothing is
//! swallowed or replaced by a sentinel value.
//!
//! ## Example
//!
//! ```rust
//! use girder_core::errors::{SectionError, SectionResult};
//!
//! fn check_height(height: f64) -> SectionResult<()> {
//!     if height <= 0.0 {
//!         return Err(SectionError::validation("BoxBeam", "H1 must be a positive value"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_height(-1.0).unwrap_err().is_recoverable());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for girder_core operations
pub type SectionResult<T> = Result<T, SectionError>;

/// Structured error type for section, persistence and strand envelope operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SectionError {
    /// A dimension set is geometrically infeasible. Carries the first
    /// violated constraint only.
    #[error("{family}: {message}")]
    Validation { family: String, message: String },

    /// Persisted data cannot be parsed or migrated under any known version rule
    #[error("Invalid file format in '{unit}': {reason}")]
    InvalidFileFormat { unit: String, reason: String },

    /// A configuration call received an argument outside its legal domain
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// No harp region contains the queried strand point
    #[error("Point ({x}, {y}) is not inside any harp region")]
    PointOutsideRegion { x: f64, y: f64 },

    /// A dimension name is not part of the family's dimension set
    #[error("Dimension '{name}' not found for {family}")]
    DimensionNotFound { family: String, name: String },

    /// A family identifier did not match any known beam family
    #[error("Unknown beam family: {name}")]
    UnknownFamily { name: String },
}

impl SectionError {
    /// Create a Validation error
    pub fn validation(family: impl Into<String>, message: impl Into<String>) -> Self {
        SectionError::Validation {
            family: family.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidFileFormat error
    pub fn invalid_file_format(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::InvalidFileFormat {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        SectionError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create a DimensionNotFound error
    pub fn dimension_not_found(family: impl Into<String>, name: impl Into<String>) -> Self {
        SectionError::DimensionNotFound {
            family: family.into(),
            name: name.into(),
        }
    }

    /// Create an UnknownFamily error
    pub fn unknown_family(name: impl Into<String>) -> Self {
        SectionError::UnknownFamily { name: name.into() }
    }

    /// Expected, user-facing outcomes. The caller should ask for a
    /// correction rather than abort.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SectionError::Validation { .. } | SectionError::PointOutsideRegion { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            SectionError::Validation { .. } => "VALIDATION_ERROR",
            SectionError::InvalidFileFormat { .. } => "INVALID_FILE_FORMAT",
            SectionError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            SectionError::PointOutsideRegion { .. } => "POINT_OUTSIDE_REGION",
            SectionError::DimensionNotFound { .. } => "DIMENSION_NOT_FOUND",
            SectionError::UnknownFamily { .. } => "UNKNOWN_FAMILY",
        }
    }
}
