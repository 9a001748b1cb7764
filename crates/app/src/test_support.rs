//! In-memory [`ResourceClient`] for service and session tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use cimi_browser_domain::error::{CimiError, TransportError};
use serde_json::Value;

use crate::ports::{Created, ResourceClient};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Serves canned documents by URL and records every request.
///
/// `PUT` stores its body so a later `GET` sees the update.
#[derive(Default)]
pub(crate) struct StubClient {
    documents: Mutex<HashMap<String, Value>>,
    failures: HashMap<String, TransportError>,
    delays: HashMap<String, Duration>,
    location: Option<String>,
    calls: Mutex<Vec<Call>>,
}

impl StubClient {
    pub fn with_document(self, url: &str, document: Value) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(url.to_string(), document);
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16, status_text: &str) -> Self {
        self.failures
            .insert(url.to_string(), TransportError::status(status, status_text));
        self
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, url: &str, body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });
    }

    fn check(&self, url: &str) -> Result<(), CimiError> {
        match self.failures.get(url) {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        }
    }
}

impl ResourceClient for StubClient {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, CimiError>> + Send {
        self.record("GET", url, None);
        let delay = self.delays.get(url).copied();
        let result = self.check(url).and_then(|()| {
            self.documents
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| TransportError::status(404, "Not Found").into())
        });
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    fn put(&self, url: &str, body: &Value) -> impl Future<Output = Result<(), CimiError>> + Send {
        self.record("PUT", url, Some(body));
        let result = self.check(url).map(|()| {
            self.documents
                .lock()
                .unwrap()
                .insert(url.to_string(), body.clone());
        });
        async { result }
    }

    fn post(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Created, CimiError>> + Send {
        self.record("POST", url, body);
        let result = self.check(url).map(|()| Created {
            location: self.location.clone(),
        });
        async { result }
    }

    fn delete(&self, url: &str) -> impl Future<Output = Result<(), CimiError>> + Send {
        self.record("DELETE", url, None);
        let result = self.check(url);
        async { result }
    }
}
