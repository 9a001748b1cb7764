//! HTTP client adapter error types.

use cimi_browser_domain::error::{CimiError, TransportError};

/// Errors specific to the reqwest adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The underlying client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// The request never produced a response, or its body could not be read.
    #[error("HTTP request failed")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{reason}({status})")]
    Status { status: u16, reason: String },

    /// The response body is not JSON.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),
}

impl From<HttpClientError> for CimiError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Status { status, reason } => {
                TransportError::status(status, reason).into()
            }
            HttpClientError::Build(err) | HttpClientError::Request(err) => {
                TransportError::network(err.to_string()).into()
            }
            HttpClientError::Decode(err) => CimiError::InvalidJson(err),
        }
    }
}
