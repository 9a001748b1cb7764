//! Browser service — use-cases against the CIMI server.

use cimi_browser_domain::document::ResourceDocument;
use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::filter::Filter;
use cimi_browser_domain::location::PageLocation;
use cimi_browser_domain::reference::{
    BaseEndpoint, ResourceReference, compose_fetch_url, encode_query_value,
};
use cimi_browser_domain::view_mode::ViewMode;

use crate::editor::EditorBuffer;
use crate::page::Page;
use crate::ports::{Created, ResourceClient};

/// Stateless use-cases: fetch and render, then write back through
/// operation hrefs.
///
/// Every href is resolved against the base endpoint the same way fetch
/// URLs are.
pub struct BrowserService<C> {
    client: C,
    base: BaseEndpoint,
}

impl<C: ResourceClient> BrowserService<C> {
    /// Create a new service talking to `base` through `client`.
    pub fn new(client: C, base: BaseEndpoint) -> Self {
        Self { client, base }
    }

    pub fn base(&self) -> &BaseEndpoint {
        &self.base
    }

    /// Fetch the document for `reference`.
    ///
    /// # Errors
    ///
    /// Returns a transport error from the client, or
    /// [`CimiError::Malformed`] when the body is not a JSON object.
    #[tracing::instrument(skip(self, reference), fields(reference = %reference))]
    pub async fn fetch(&self, reference: &ResourceReference) -> Result<ResourceDocument, CimiError> {
        let url = compose_fetch_url(&self.base, reference);
        self.fetch_url(&url).await
    }

    /// Fetch and build the page viewed at `location`.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or [`CimiError::Malformed`] when the
    /// document cannot be rendered.
    #[tracing::instrument(
        skip(self, location),
        fields(reference = %location.resolve_resource_path())
    )]
    pub async fn load(&self, location: &PageLocation, mode: ViewMode) -> Result<Page, CimiError> {
        let document = self.fetch(location.resolve_resource_path()).await?;
        Page::build(location, &self.base, &document, mode)
    }

    /// Like [`BrowserService::load`], with `filter` attached as `$filter`.
    ///
    /// # Errors
    ///
    /// See [`BrowserService::load`].
    #[tracing::instrument(skip(self, location, filter), fields(filter = %filter))]
    pub async fn load_filtered(
        &self,
        location: &PageLocation,
        filter: &Filter,
        mode: ViewMode,
    ) -> Result<Page, CimiError> {
        let url = filtered_url(
            &compose_fetch_url(&self.base, location.resolve_resource_path()),
            filter,
        );
        let document = self.fetch_url(&url).await?;
        Page::build(location, &self.base, &document, mode)
    }

    /// Replace the resource behind `href` with `json_text`.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`] without sending anything when the
    /// text does not parse, or a transport error from the client.
    #[tracing::instrument(skip(self, json_text))]
    pub async fn update(&self, href: &str, json_text: &str) -> Result<(), CimiError> {
        let body = EditorBuffer::new(json_text).validate()?;
        self.client.put(&self.base.resolve(href), &body).await
    }

    /// Create a resource by posting `json_text` to `href`.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`] without sending anything when the
    /// text does not parse, or a transport error from the client.
    #[tracing::instrument(skip(self, json_text))]
    pub async fn create(&self, href: &str, json_text: &str) -> Result<Created, CimiError> {
        let body = EditorBuffer::new(json_text).validate()?;
        let created = self.client.post(&self.base.resolve(href), Some(&body)).await?;
        tracing::debug!(location = ?created.location, "resource created");
        Ok(created)
    }

    /// Delete the resource behind `href`.
    ///
    /// # Errors
    ///
    /// Returns a transport error from the client.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, href: &str) -> Result<(), CimiError> {
        self.client.delete(&self.base.resolve(href)).await
    }

    /// Trigger an action by posting an empty body to `href`.
    ///
    /// # Errors
    ///
    /// Returns a transport error from the client.
    #[tracing::instrument(skip(self))]
    pub async fn run_action(&self, href: &str) -> Result<(), CimiError> {
        self.client.post(&self.base.resolve(href), None).await?;
        Ok(())
    }

    async fn fetch_url(&self, url: &str) -> Result<ResourceDocument, CimiError> {
        let value = self.client.get(url).await?;
        Ok(ResourceDocument::try_from(value)?)
    }
}

/// `url` with `$filter=<filter>` appended to its query string.
fn filtered_url(url: &str, filter: &Filter) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}$filter={}",
        encode_query_value(&filter.to_string())
    )
}
