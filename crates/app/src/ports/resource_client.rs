//! Resource client port — HTTP access to the CIMI server.

use std::future::Future;
use std::sync::Arc;

use cimi_browser_domain::error::CimiError;
use serde_json::Value;

/// Outcome of a successful `POST`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Created {
    /// Reference of the new resource, from the `Location` header.
    pub location: Option<String>,
}

/// JSON-over-HTTP access to resources by absolute URL.
///
/// Non-2xx responses fail with [`CimiError::Transport`] carrying the status
/// code and reason; requests that never got a response use status `0`.
pub trait ResourceClient {
    /// Fetch the JSON body at `url`.
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, CimiError>> + Send;

    /// Replace the resource at `url` with `body`.
    fn put(&self, url: &str, body: &Value) -> impl Future<Output = Result<(), CimiError>> + Send;

    /// Post `body` (or an empty body) to `url`.
    fn post(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Created, CimiError>> + Send;

    /// Delete the resource at `url`.
    fn delete(&self, url: &str) -> impl Future<Output = Result<(), CimiError>> + Send;
}

impl<T: ResourceClient + Send + Sync> ResourceClient for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<Value, CimiError>> + Send {
        (**self).get(url)
    }

    fn put(&self, url: &str, body: &Value) -> impl Future<Output = Result<(), CimiError>> + Send {
        (**self).put(url, body)
    }

    fn post(
        &self,
        url: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<Created, CimiError>> + Send {
        (**self).post(url, body)
    }

    fn delete(&self, url: &str) -> impl Future<Output = Result<(), CimiError>> + Send {
        (**self).delete(url)
    }
}
