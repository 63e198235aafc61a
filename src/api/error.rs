/// Error type for backend calls
use thiserror::Error;

/// Failure of a single call to the directory backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a usable response (connection refused,
    /// DNS failure, unparseable body).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with an error status. `detail` is the FastAPI
    /// `detail` field when the body carried one, else a generic HTTP line.
    #[error("{detail}")]
    Server { status: u16, detail: String },
}

impl ApiError {
    /// Human-readable message from the server, when it provided one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Server { detail, .. } => Some(detail),
            ApiError::Transport(_) => None,
        }
    }
}
