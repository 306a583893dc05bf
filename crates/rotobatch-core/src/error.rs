//! Error types shared across the batch pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Problems with user-entered form values, detected before any file I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A token of the angle list is not an integer.
    #[error("Rotation angles must be integers separated by commas, got {token:?}")]
    InvalidAngle { token: String },

    /// The job was built with an empty angle list.
    #[error("At least one rotation angle is required")]
    NoAngles,

    /// The background color does not start with `#`.
    #[error("Background color must be a hex color starting with '#', got {0:?}")]
    MissingHashPrefix(String),

    /// The background color has a `#` but its body is not 3, 4, 6 or 8 hex digits.
    #[error("Background color {0:?} is not a valid hex color (#rgb, #rgba, #rrggbb or #rrggbbaa)")]
    InvalidHexColor(String),
}

/// Top-level error of a rotation batch.
#[derive(Debug, Error)]
pub enum RotateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Directory listing, directory creation or file access failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: EncodeError,
    },

    /// The background worker could not start or died before reporting.
    #[error("Rotation worker failed: {0}")]
    Worker(String),
}

impl RotateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised by input validation rather than by the batch itself.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
