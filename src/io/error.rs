//! Error types for template import, tile diffing and file handling

use std::fmt;
use std::path::PathBuf;

/// Main error type for all template and tile operations
#[derive(Debug)]
pub enum TileDiffError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// In-memory raster encoding or decoding failed
    ImageCodec {
        /// Codec operation that failed
        operation: &'static str,
        /// Underlying codec error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Tile or pixel coordinates cannot describe a location on the canvas
    ///
    /// Raised for non-finite, negative or fractional coordinates and for
    /// pixel offsets that fall outside their tile.
    InvalidGeometry {
        /// Description of the rejected coordinates
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// A persisted template record could not be interpreted
    InvalidRecord {
        /// Storage key or field of the offending record
        key: String,
        /// Description of what is wrong with it
        reason: String,
    },

    /// JSON encoding or decoding failed
    Serialization {
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl fmt::Display for TileDiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::ImageCodec { operation, source } => {
                write!(f, "Image codec error during {operation}: {source}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidGeometry { reason } => {
                write!(f, "Invalid geometry: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidRecord { key, reason } => {
                write!(f, "Invalid template record '{key}': {reason}")
            }
            Self::Serialization { source } => {
                write!(f, "Serialization error: {source}")
            }
        }
    }
}

impl std::error::Error for TileDiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. }
            | Self::ImageExport { source, .. }
            | Self::ImageCodec { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for crate results
pub type Result<T> = std::result::Result<T, TileDiffError>;

impl From<image::ImageError> for TileDiffError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageCodec {
            operation: "unknown",
            source: err,
        }
    }
}

impl From<std::io::Error> for TileDiffError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for TileDiffError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization { source: err }
    }
}

impl From<base64::DecodeError> for TileDiffError {
    fn from(err: base64::DecodeError) -> Self {
        Self::InvalidRecord {
            key: "base64".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> TileDiffError {
    TileDiffError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invalid geometry error
pub fn invalid_geometry(reason: &impl ToString) -> TileDiffError {
    TileDiffError::InvalidGeometry {
        reason: reason.to_string(),
    }
}

/// Create an invalid record error
pub fn invalid_record(key: &impl ToString, reason: &impl ToString) -> TileDiffError {
    TileDiffError::InvalidRecord {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
