//! Page location — where the viewer is, and how to link to other resources.
//!
//! The browser is hash-routed: the page URI stays fixed and the fragment
//! carries the resource reference (`http://host/cimi/webui#MachineCollection`).
//! Surfaces that cannot observe fragments (a server rendering HTML) use path
//! addressing instead (`http://host/webui/MachineCollection`).

use crate::reference::ResourceReference;

/// Label of the breadcrumb that links back to the entry point.
pub const ROOT_LABEL: &str = "CloudEntryPoint";

/// How a reference is embedded into a view URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Addressing {
    /// `page_uri#reference`
    #[default]
    Fragment,
    /// `page_uri/reference`
    Path,
}

/// The page URI plus the reference currently being viewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    page_uri: String,
    reference: ResourceReference,
    addressing: Addressing,
}

impl PageLocation {
    /// Parse a full page URL using fragment addressing.
    ///
    /// The reference is everything after the first `#`; a missing or empty
    /// fragment yields the root reference.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (page_uri, fragment) = match url.split_once('#') {
            Some((page, fragment)) => (page, fragment),
            None => (url, ""),
        };
        Self {
            page_uri: page_uri.to_string(),
            reference: ResourceReference::new(fragment),
            addressing: Addressing::Fragment,
        }
    }

    /// Build a location from its parts.
    #[must_use]
    pub fn new(
        page_uri: impl Into<String>,
        reference: ResourceReference,
        addressing: Addressing,
    ) -> Self {
        let mut page_uri = page_uri.into();
        if addressing == Addressing::Path {
            while page_uri.ends_with('/') {
                page_uri.pop();
            }
        }
        Self {
            page_uri,
            reference,
            addressing,
        }
    }

    /// The page URI without any fragment.
    #[must_use]
    pub fn page_uri(&self) -> &str {
        &self.page_uri
    }

    #[must_use]
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// The reference of the resource being viewed.
    #[must_use]
    pub fn resolve_resource_path(&self) -> &ResourceReference {
        &self.reference
    }

    /// Same page, different resource.
    #[must_use]
    pub fn with_reference(&self, reference: ResourceReference) -> Self {
        Self {
            page_uri: self.page_uri.clone(),
            reference,
            addressing: self.addressing,
        }
    }

    /// URL that views `reference` from this page.
    #[must_use]
    pub fn resource_view_url(&self, reference: &str) -> String {
        if reference.is_empty() {
            return self.page_uri.clone();
        }
        match self.addressing {
            Addressing::Fragment => format!("{}#{reference}", self.page_uri),
            Addressing::Path => {
                format!("{}/{}", self.page_uri, reference.trim_start_matches('/'))
            }
        }
    }

    /// URL of the current view.
    #[must_use]
    pub fn view_url(&self) -> String {
        self.resource_view_url(self.reference.as_str())
    }

    /// URL of the parent resource's view, used after a delete.
    #[must_use]
    pub fn parent_view_url(&self) -> String {
        self.resource_view_url(self.reference.parent().as_str())
    }

    /// Breadcrumb trail for the current reference.
    #[must_use]
    pub fn trail(&self) -> Trail {
        Trail {
            root: Breadcrumb {
                label: ROOT_LABEL.to_string(),
                path: String::new(),
                url: self.page_uri.clone(),
            },
            segments: breadcrumbs(self, &self.reference),
        }
    }
}

/// One navigation link in the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub label: String,
    /// Cumulative reference up to and including this segment.
    pub path: String,
    pub url: String,
}

/// The root crumb followed by one crumb per reference segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    pub root: Breadcrumb,
    pub segments: Vec<Breadcrumb>,
}

impl Trail {
    /// All crumbs, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Breadcrumb> {
        std::iter::once(&self.root).chain(self.segments.iter())
    }
}

/// One breadcrumb per prefix of `reference`, each linking to its cumulative path.
#[must_use]
pub fn breadcrumbs(location: &PageLocation, reference: &ResourceReference) -> Vec<Breadcrumb> {
    let mut path = String::new();
    reference
        .segments()
        .map(|segment| {
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(segment);
            Breadcrumb {
                label: segment.to_string(),
                path: path.clone(),
                url: location.resource_view_url(&path),
            }
        })
        .collect()
}
