//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`CimiError`]
//! via `#[from]`, so callers at the edges only ever match on one enum.

use crate::filter::FilterError;
use crate::view_mode::InvalidTransition;

/// Top-level error for every fallible operation in the browser.
#[derive(Debug, thiserror::Error)]
pub enum CimiError {
    /// The server (or the network) rejected a request.
    #[error("transport error")]
    Transport(#[from] TransportError),

    /// A fetched document does not have the shape the browser needs.
    #[error("malformed document")]
    Malformed(#[from] MalformedDocumentError),

    /// Editor contents (or a response body) are not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A `$filter` expression failed to parse.
    #[error("invalid filter")]
    Filter(#[from] FilterError),

    /// A view-mode change that the state machine does not allow.
    #[error("invalid view transition")]
    Transition(#[from] InvalidTransition),

    /// The current resource does not advertise the requested operation.
    #[error("operation `{0}` is not available")]
    MissingOperation(String),
}

impl CimiError {
    /// Text shown to the user in the message area.
    ///
    /// Transport failures read `statusText(status)`; everything else shows
    /// its most specific cause.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Transport(err) => err.to_string(),
            Self::Malformed(err) => err.to_string(),
            Self::Filter(err) => err.to_string(),
            Self::Transition(err) => err.to_string(),
            Self::InvalidJson(_) | Self::MissingOperation(_) => self.to_string(),
        }
    }
}

/// Failure reported by the HTTP layer.
///
/// Rendered the way the status line reads: `statusText(status)`. Network
/// failures that never produced a response use status `0`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status_text}({status})")]
pub struct TransportError {
    pub status: u16,
    pub status_text: String,
}

impl TransportError {
    /// Build an error for a non-2xx HTTP response.
    #[must_use]
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
        }
    }

    /// Build an error for a request that never got a response.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            status_text: message.into(),
        }
    }
}

/// A document is missing a field, or a field has the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedDocumentError {
    /// The body is JSON but not an object.
    #[error("document is not a JSON object")]
    NotAnObject,

    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// A field is present but cannot be read as the expected type.
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_transport_error_like_a_status_line() {
        let err = TransportError::status(404, "Not Found");
        assert_eq!(err.to_string(), "Not Found(404)");
    }

    #[test]
    fn should_use_status_zero_for_network_errors() {
        let err = TransportError::network("connection refused");
        assert_eq!(err.status, 0);
        assert_eq!(err.to_string(), "connection refused(0)");
    }

    #[test]
    fn should_convert_malformed_error_into_cimi_error() {
        let err: CimiError = MalformedDocumentError::MissingField("resourceURI").into();
        assert!(matches!(
            err,
            CimiError::Malformed(MalformedDocumentError::MissingField("resourceURI"))
        ));
    }

    #[test]
    fn should_display_invalid_json_with_parser_message() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err = CimiError::InvalidJson(json_err);
        assert!(err.to_string().starts_with("invalid JSON: "));
    }

    #[test]
    fn should_show_status_line_as_user_message() {
        let err: CimiError = TransportError::status(500, "Internal Server Error").into();
        assert_eq!(err.message(), "Internal Server Error(500)");
    }

    #[test]
    fn should_show_missing_field_as_user_message() {
        let err: CimiError = MalformedDocumentError::MissingField("resourceURI").into();
        assert_eq!(err.message(), "missing field `resourceURI`");
    }
}
