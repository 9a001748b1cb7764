//! Resource references and the base endpoint they resolve against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `/`-delimited path identifying a resource on the CIMI server.
///
/// The empty reference addresses the Cloud Entry Point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceReference(String);

impl ResourceReference {
    /// Wrap a raw reference string as found in a fragment or an `href`.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The root (Cloud Entry Point) reference.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` when the reference starts with `/` (server-absolute form).
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.0.starts_with('/')
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments in order. The root reference has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|_| !self.0.is_empty())
    }

    /// Last path segment, or `None` for the root reference.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            self.0.rsplit('/').next()
        }
    }

    /// Reference with the last segment removed.
    #[must_use]
    pub fn parent(&self) -> Self {
        match self.0.rsplit_once('/') {
            Some((head, _)) => Self(head.to_string()),
            None => Self::root(),
        }
    }
}

impl fmt::Display for ResourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Root URL of the CIMI server that references are resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseEndpoint(String);

impl BaseEndpoint {
    /// Marker in the page URI that separates the server root from the UI.
    pub const UI_MARKER: &'static str = "webui";

    /// Use `url` as-is as the base endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Derive the base endpoint from the page URI hosting the browser.
    ///
    /// Everything before the last `webui` is the server root; a page URI
    /// without the marker is its own base.
    #[must_use]
    pub fn from_page_uri(page_uri: &str) -> Self {
        match page_uri.rfind(Self::UI_MARKER) {
            Some(i) if i > 0 => Self(page_uri[..i].to_string()),
            _ => Self(page_uri.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base with a single trailing `/` removed, if present.
    #[must_use]
    pub fn without_trailing_slash(&self) -> &str {
        self.0.strip_suffix('/').unwrap_or(&self.0)
    }

    /// Resolve a reference or operation `href` to a fetchable URL.
    ///
    /// Absolute references (leading `/`) are appended to the base without
    /// its trailing slash; relative ones are appended verbatim.
    #[must_use]
    pub fn resolve(&self, reference: &str) -> String {
        if reference.starts_with('/') {
            format!("{}{reference}", self.without_trailing_slash())
        } else {
            format!("{}{reference}", self.0)
        }
    }

    /// The reference a server URL (such as a `Location` header) points at.
    ///
    /// URLs under the base lose the base prefix; anything else is taken as a
    /// reference already.
    #[must_use]
    pub fn reference_of(&self, url: &str) -> ResourceReference {
        let reference = url
            .strip_prefix(self.as_str())
            .or_else(|| url.strip_prefix(self.without_trailing_slash()))
            .unwrap_or(url);
        ResourceReference::new(reference.trim_start_matches('/'))
    }
}

impl fmt::Display for BaseEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compose the URL to fetch `reference` from `base`.
#[must_use]
pub fn compose_fetch_url(base: &BaseEndpoint, reference: &ResourceReference) -> String {
    base.resolve(reference.as_str())
}

/// Percent-encode everything but RFC 3986 unreserved characters, for use
/// as a query parameter value.
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
