use std::path::PathBuf;

use rotobatch_core::{DecodeError, RotateError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Exit status for invalid user input.
pub const EXIT_VALIDATION: u8 = 2;
/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rotate(#[from] RotateError),

    #[error("Failed to read {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("{failed} of {total} images could not be processed")]
    Incomplete { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Already shown to the user through a dialog.
    #[error(transparent)]
    Reported(Box<CliError>),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Reported(inner) => inner.exit_code(),
            Self::Validation(_) => EXIT_VALIDATION,
            Self::Rotate(e) if e.is_validation() => EXIT_VALIDATION,
            _ => EXIT_FAILURE,
        }
    }

    /// Mark the error as already shown, so `main` does not print it again.
    pub fn reported(self) -> Self {
        match self {
            Self::Reported(_) => self,
            other => Self::Reported(Box::new(other)),
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}
