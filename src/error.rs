//! Errors of a command run and their exit codes

use nifi_align_core::AlignError;
use thiserror::Error;

/// Exit code of every failed run (`EX_SOFTWARE`)
pub const EXIT_FAILURE: u8 = 70;

/// Failure of a run, tagged with the phase it happened in
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Invalid input, nothing was sent to the server
    #[error("{0}")]
    Configuration(AlignError),

    /// Token exchange failed
    #[error("{0}")]
    Authentication(AlignError),

    /// Traversal or a position update failed
    #[error("Unable to align process groups: {0}")]
    Alignment(AlignError),
}

impl AppError {
    /// Underlying error
    pub fn cause(&self) -> &AlignError {
        match self {
            AppError::Configuration(e) | AppError::Authentication(e) | AppError::Alignment(e) => e,
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }
}

/// Result type for command runs
pub type AppResult<T> = Result<T, AppError>;
