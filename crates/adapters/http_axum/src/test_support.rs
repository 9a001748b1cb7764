//! Stub client and request helpers for router tests.

use std::collections::HashMap;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cimi_browser_app::ports::{Created, ResourceClient};
use cimi_browser_app::services::BrowserService;
use cimi_browser_domain::error::{CimiError, TransportError};
use cimi_browser_domain::reference::BaseEndpoint;

use crate::state::AppState;

pub(crate) const BASE: &str = "http://localhost/cimi/";

/// Serves canned documents by URL; unknown URLs answer `Not Found(404)`.
#[derive(Default)]
pub(crate) struct StubClient {
    documents: HashMap<String, Value>,
    failures: HashMap<String, TransportError>,
    location: Option<String>,
}

impl StubClient {
    pub fn with_document(mut self, url: &str, document: Value) -> Self {
        self.documents.insert(url.to_string(), document);
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16, status_text: &str) -> Self {
        self.failures
            .insert(url.to_string(), TransportError::status(status, status_text));
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    fn check(&self, url: &str) -> Result<(), CimiError> {
        match self.failures.get(url) {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }
}

impl ResourceClient for StubClient {
    async fn get(&self, url: &str) -> Result<Value, CimiError> {
        self.check(url)?;
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::status(404, "Not Found").into())
    }

    async fn put(&self, url: &str, _body: &Value) -> Result<(), CimiError> {
        self.check(url)
    }

    async fn post(&self, url: &str, _body: Option<&Value>) -> Result<Created, CimiError> {
        self.check(url)?;
        Ok(Created {
            location: self.location.clone(),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), CimiError> {
        self.check(url)
    }
}

pub(crate) fn test_state(client: StubClient) -> AppState<StubClient> {
    AppState::new(BrowserService::new(client, BaseEndpoint::new(BASE)))
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_form(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

/// Send `request` and collect the response body as text.
pub(crate) async fn body_text(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
