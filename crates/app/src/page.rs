//! Page view model.
//!
//! [`Page::build`] turns a fetched document into everything a renderer
//! needs, independently of how it is drawn: HTML, a terminal, or a test.

use cimi_browser_domain::acl::AclRow;
use cimi_browser_domain::collection::Collection;
use cimi_browser_domain::document::{
    Partition, ResourceDocument, ResourceKind, classify, partition_metadata,
};
use cimi_browser_domain::entry_point::{display_value, entry_links};
use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::location::{PageLocation, Trail};
use cimi_browser_domain::metadata::Metadata;
use cimi_browser_domain::operation::{OperationDescriptor, OperationKind};
use cimi_browser_domain::reference::{BaseEndpoint, ResourceReference, compose_fetch_url};
use cimi_browser_domain::view_mode::ViewMode;

use crate::editor::ADD_TEMPLATE;

/// Shown instead of a table for an empty collection.
pub const NO_ITEMS: &str = "No items.";

/// Shown instead of the ACL table when a resource has none.
pub const NO_ACL: &str = "No explicit ACL.";

/// A `term: description` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub term: String,
    pub description: String,
}

impl Term {
    fn new(term: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            description: description.into(),
        }
    }
}

/// What a button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartView,
    FinishView,
    StartEdit,
    SaveEdit { href: String },
    CancelEdit,
    StartAdd,
    SaveAdd { href: String },
    CancelAdd,
    /// `parent` is the reference to show once the resource is gone.
    Delete {
        href: String,
        parent: ResourceReference,
    },
    Action { name: String, href: String },
}

/// An operation button and the mode it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// The button is only shown in this mode.
    pub mode: ViewMode,
    pub command: Command,
    /// Server URL the operation targets, for buttons backed by an operation.
    pub url: Option<String>,
}

impl Button {
    fn local(label: &str, mode: ViewMode, command: Command) -> Self {
        Self {
            label: label.to_string(),
            mode,
            command,
            url: None,
        }
    }

    fn remote(label: &str, mode: ViewMode, command: Command, url: &str) -> Self {
        Self {
            label: label.to_string(),
            mode,
            command,
            url: Some(url.to_string()),
        }
    }
}

/// A link in the entry point listing. Plain values have no URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRow {
    pub tag: String,
    pub url: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    pub count: i64,
    pub rows: Vec<CollectionRow>,
}

impl CollectionView {
    /// `true` when the empty-state message replaces the table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }

    /// `No items.` or `Count: N`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_empty() {
            NO_ITEMS.to_string()
        } else {
            format!("Count: {}", self.count)
        }
    }
}

/// Kind-specific body of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    EntryPoint(Vec<Link>),
    Collection(CollectionView),
    Item(Vec<Term>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclView {
    Rows(Vec<AclRow>),
    Missing,
}

/// Everything needed to render one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Last segment of `resourceURI`.
    pub title: String,
    pub kind: ResourceKind,
    pub mode: ViewMode,
    /// The viewed reference.
    pub reference: String,
    pub view_url: String,
    /// URL the document was fetched from.
    pub resource_url: String,
    pub trail: Trail,
    pub metadata: Vec<Term>,
    pub buttons: Vec<Button>,
    pub acl: AclView,
    pub content: ContentView,
    /// The document, pretty-printed.
    pub json: String,
    /// Initial contents of the JSON panel for the current mode.
    pub editor: String,
}

impl Page {
    /// Build the page for `document` viewed at `location` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::Malformed`] when `resourceURI` is missing, the
    /// ACL cannot be read, or a collection's members are unreadable.
    pub fn build(
        location: &PageLocation,
        base: &BaseEndpoint,
        document: &ResourceDocument,
        mode: ViewMode,
    ) -> Result<Self, CimiError> {
        let kind = classify(document)?;
        let title = document.type_name()?.to_string();
        let partition = partition_metadata(document);
        let metadata = Metadata::from_partition(&partition)?;

        let content = match kind {
            ResourceKind::EntryPoint => {
                ContentView::EntryPoint(entry_point_links(location, &partition))
            }
            ResourceKind::Collection => {
                let collection = Collection::from_content(&title, partition.content())?;
                ContentView::Collection(collection_view(location, &collection))
            }
            ResourceKind::Item => ContentView::Item(
                partition
                    .sorted_content()
                    .into_iter()
                    .map(|(key, value)| Term::new(key.as_str(), display_value(value)))
                    .collect(),
            ),
        };

        let acl = match &metadata.acl {
            Some(acl) => AclView::Rows(acl.rows()),
            None => AclView::Missing,
        };

        let json = document.to_pretty_json();
        let editor = if mode == ViewMode::Adding {
            ADD_TEMPLATE.to_string()
        } else {
            json.clone()
        };

        let reference = location.resolve_resource_path();
        Ok(Self {
            title,
            kind,
            mode,
            reference: reference.to_string(),
            view_url: location.view_url(),
            resource_url: compose_fetch_url(base, reference),
            trail: location.trail(),
            metadata: metadata_terms(&metadata),
            buttons: buttons(location, base, &metadata.operations),
            acl,
            content,
            json,
            editor,
        })
    }

    /// Buttons belonging to the current mode, in display order.
    pub fn visible_buttons(&self) -> impl Iterator<Item = &Button> {
        self.buttons.iter().filter(move |button| button.mode == self.mode)
    }

    /// First button whose command matches `predicate`.
    #[must_use]
    pub fn find_button(&self, predicate: impl Fn(&Command) -> bool) -> Option<&Button> {
        self.buttons.iter().find(|button| predicate(&button.command))
    }
}

fn metadata_terms(metadata: &Metadata) -> Vec<Term> {
    let mut terms = Vec::new();
    for (label, value) in [
        ("created", &metadata.created),
        ("updated", &metadata.updated),
        ("name", &metadata.name),
        ("description", &metadata.description),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            terms.push(Term::new(label, value));
        }
    }
    for (key, value) in &metadata.properties {
        terms.push(Term::new(
            format!("\"{key}\" (property)"),
            format!("\"{}\"", display_value(value)),
        ));
    }
    terms
}

fn buttons(
    location: &PageLocation,
    base: &BaseEndpoint,
    operations: &[OperationDescriptor],
) -> Vec<Button> {
    let mut buttons = vec![
        Button::local("view json", ViewMode::Normal, Command::StartView),
        Button::local("done", ViewMode::Viewing, Command::FinishView),
    ];
    for op in operations {
        let url = base.resolve(&op.href);
        let href = op.href.clone();
        match op.kind() {
            OperationKind::Edit => buttons.extend([
                Button::remote(op.name(), ViewMode::Normal, Command::StartEdit, &url),
                Button::remote("save", ViewMode::Editing, Command::SaveEdit { href }, &url),
                Button::local("cancel", ViewMode::Editing, Command::CancelEdit),
            ]),
            OperationKind::Add => buttons.extend([
                Button::remote(op.name(), ViewMode::Normal, Command::StartAdd, &url),
                Button::remote("save", ViewMode::Adding, Command::SaveAdd { href }, &url),
                Button::local("cancel", ViewMode::Adding, Command::CancelAdd),
            ]),
            OperationKind::Delete => buttons.push(Button::remote(
                op.name(),
                ViewMode::Normal,
                Command::Delete {
                    href,
                    parent: location.resolve_resource_path().parent(),
                },
                &url,
            )),
            OperationKind::Action(name) => buttons.push(Button::remote(
                &name,
                ViewMode::Normal,
                Command::Action {
                    name: name.clone(),
                    href,
                },
                &url,
            )),
        }
    }
    buttons
}

fn entry_point_links(location: &PageLocation, partition: &Partition) -> Vec<Link> {
    entry_links(partition)
        .into_iter()
        .map(|link| Link {
            label: link.label(),
            url: link.href().map(|href| location.resource_view_url(href)),
        })
        .collect()
}

fn collection_view(location: &PageLocation, collection: &Collection) -> CollectionView {
    CollectionView {
        count: collection.count,
        rows: collection
            .entries
            .iter()
            .map(|entry| CollectionRow {
                tag: entry.tag().to_string(),
                url: location.resource_view_url(&entry.id),
                name: entry.name.clone().unwrap_or_default(),
                description: entry.description.clone().unwrap_or_default(),
            })
            .collect(),
    }
}
