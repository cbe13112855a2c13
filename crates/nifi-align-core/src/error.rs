use thiserror::Error;

/// Error type shared by the alignment engine and the remote adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    /// Invalid user supplied configuration, detected before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential exchange rejected by the server
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-success response from the server
    #[error("Remote error (status {status}): {body}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for alignment operations
pub type AlignResult<T> = Result<T, AlignError>;

impl AlignError {
    /// Build a remote error from a status code and raw body
    pub fn remote(status: u16, body: impl Into<String>) -> Self {
        AlignError::Remote {
            status,
            body: body.into(),
        }
    }

    /// Any failure talking to the server, with or without a response
    pub fn is_remote_communication(&self) -> bool {
        matches!(
            self,
            AlignError::Remote { .. } | AlignError::Transport(_) | AlignError::Serialization(_)
        )
    }

    /// Stale revision rejected by the server's optimistic concurrency check
    pub fn is_conflict(&self) -> bool {
        matches!(self, AlignError::Remote { status: 409, .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AlignError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AlignError {
    fn from(err: serde_json::Error) -> Self {
        AlignError::Serialization(err.to_string())
    }
}
