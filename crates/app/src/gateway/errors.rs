//! Gateway errors.

use thiserror::Error;

/// Errors raised when talking to the order and payment backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-2xx response or an unexpected body.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    /// The backend answered but refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}
