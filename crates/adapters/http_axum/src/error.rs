//! HTTP error response mapping.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use cimi_browser_domain::error::CimiError;

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    status: u16,
    message: String,
}

/// Maps browser failures to an HTML error page with an appropriate status.
#[derive(Debug)]
pub enum WebError {
    /// A failure reported by the application layer.
    Browser(CimiError),
    /// The request itself is unusable (unknown mode, bad form, …).
    BadRequest(String),
}

impl From<CimiError> for WebError {
    fn from(err: CimiError) -> Self {
        Self::Browser(err)
    }
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Browser(CimiError::Transport(err)) if err.status == 404 => StatusCode::NOT_FOUND,
            Self::Browser(CimiError::Transport(_) | CimiError::Malformed(_)) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Browser(CimiError::InvalidJson(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Browser(
                CimiError::Filter(_) | CimiError::Transition(_) | CimiError::MissingOperation(_),
            )
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Browser(err) => err.message(),
            Self::BadRequest(message) => message.clone(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), %message, "upstream failure");
        }
        let page = ErrorTemplate {
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error page");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
