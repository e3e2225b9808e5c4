//! One discriminated error type for every component boundary.
//!
//! Components return [`Error`] values, never bare strings; the tool layer
//! renders them for the caller. "No matching tasks" is an empty `Ok`, not
//! an error.

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong talking to the two remote services.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or invalid settings. Raised before any network call.
    #[error("configuration: {0}")]
    Config(String),

    /// Network failure or a non-2xx reply on a read path.
    #[error("transport: {message}")]
    Transport {
        /// HTTP status, when the remote actually replied.
        status: Option<u16>,
        message: String,
    },

    /// A referenced project does not exist. Distinct from an empty result.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote service rejected a create/update/delete/complete.
    #[error("mutation rejected: {0}")]
    Mutation(String),

    /// Job reported success but the expected artifact key is absent.
    #[error("artifact missing: {0}")]
    ArtifactMissing(String),

    /// Launch or poll failure beyond transport: terminal failure status,
    /// exhausted poll budget.
    #[error("orchestration: {0}")]
    Orchestration(String),
}

impl Error {
    /// Transport error without an HTTP status (connection-level failure).
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Reclassify a status-bearing transport error as a mutation rejection,
    /// keeping the remote's stated reason. Connection-level failures and
    /// other kinds pass through unchanged.
    pub fn into_mutation(self) -> Self {
        match self {
            Error::Transport {
                status: Some(_),
                message,
            } => Error::Mutation(message),
            other => other,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
