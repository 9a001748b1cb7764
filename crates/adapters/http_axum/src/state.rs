//! Shared application state for axum handlers.

use std::sync::Arc;

use cimi_browser_app::ports::ResourceClient;
use cimi_browser_app::services::BrowserService;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented manually so the client type itself does not need
/// to be `Clone`; only the `Arc` wrapper is cloned.
pub struct AppState<C> {
    /// Fetch/update/create/delete use-cases against the CIMI server.
    pub browser: Arc<BrowserService<C>>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            browser: Arc::clone(&self.browser),
        }
    }
}

impl<C> AppState<C>
where
    C: ResourceClient + Send + Sync + 'static,
{
    /// Create a new application state from the browser service.
    pub fn new(browser: BrowserService<C>) -> Self {
        Self {
            browser: Arc::new(browser),
        }
    }

    /// Create a new application state from a pre-wrapped service.
    pub fn from_arc(browser: Arc<BrowserService<C>>) -> Self {
        Self { browser }
    }
}
