//! Resource pages.

use std::str::FromStr;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use cimi_browser_app::page::{AclView, Button, Command, ContentView, Page};
use cimi_browser_app::ports::ResourceClient;
use cimi_browser_domain::document::ResourceKind;
use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::filter::Filter;
use cimi_browser_domain::location::PageLocation;
use cimi_browser_domain::view_mode::ViewMode;

use super::{location_of, with_query};
use crate::error::WebError;
use crate::state::AppState;

const EDIT_CANCELLED: &str = "Edit resource cancelled.";
const ADD_CANCELLED: &str = "Adding resource cancelled.";

/// Where a control leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A plain link (mode changes, cancellation).
    Link(String),
    /// A form post against a server operation.
    Post(PostTarget),
}

/// Hidden fields of an operation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTarget {
    pub action: &'static str,
    pub href: String,
    pub name: String,
    /// Reference to return to after a delete.
    pub parent: Option<String>,
}

/// A rendered operation button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub target: Target,
}

/// The JSON panel: read-only while viewing, a form while editing or adding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    /// Form action; `None` renders the JSON read-only.
    pub action: Option<&'static str>,
    pub href: String,
    pub text: String,
    pub submit: String,
}

/// Resource page template.
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub page: Page,
    pub message: Option<String>,
    pub controls: Vec<Control>,
    pub editor: Option<EditorForm>,
    /// `Some` for collections: the current filter text.
    pub filter: Option<String>,
}

impl PageTemplate {
    /// Wrap `page` with its controls and JSON panel.
    #[must_use]
    pub fn new(page: Page, message: Option<String>, filter: Option<String>) -> Self {
        let controls = page
            .visible_buttons()
            .filter_map(|button| control(&page, button))
            .collect();
        let editor = editor_form(&page);
        let filter = (page.kind == ResourceKind::Collection).then(|| filter.unwrap_or_default());
        Self {
            page,
            message,
            controls,
            editor,
            filter,
        }
    }

    /// Replace the editor contents, keeping what the user typed after a
    /// rejected save.
    #[must_use]
    pub fn with_editor_text(mut self, text: String) -> Self {
        if let Some(editor) = self.editor.as_mut() {
            editor.text = text;
        }
        self
    }
}

impl IntoResponse for PageTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

fn control(page: &Page, button: &Button) -> Option<Control> {
    let view_url = page.view_url.as_str();
    let target = match &button.command {
        Command::StartView => Target::Link(mode_url(view_url, ViewMode::Viewing)),
        Command::FinishView => Target::Link(view_url.to_string()),
        Command::StartEdit => Target::Link(mode_url(view_url, ViewMode::Editing)),
        Command::CancelEdit => Target::Link(with_query(view_url, "message", EDIT_CANCELLED)),
        Command::StartAdd => Target::Link(mode_url(view_url, ViewMode::Adding)),
        Command::CancelAdd => Target::Link(with_query(view_url, "message", ADD_CANCELLED)),
        Command::Delete { href, parent } => Target::Post(PostTarget {
            action: "/actions/delete",
            href: href.clone(),
            name: String::new(),
            parent: Some(parent.to_string()),
        }),
        Command::Action { name, href } => Target::Post(PostTarget {
            action: "/actions/run",
            href: href.clone(),
            name: name.clone(),
            parent: None,
        }),
        Command::SaveEdit { .. } | Command::SaveAdd { .. } => return None,
    };
    Some(Control {
        label: button.label.clone(),
        target,
    })
}

fn mode_url(view_url: &str, mode: ViewMode) -> String {
    with_query(view_url, "mode", mode.as_str())
}

fn editor_form(page: &Page) -> Option<EditorForm> {
    let save = match page.mode {
        ViewMode::Normal => return None,
        ViewMode::Viewing => None,
        ViewMode::Editing => page.find_button(|c| matches!(c, Command::SaveEdit { .. })),
        ViewMode::Adding => page.find_button(|c| matches!(c, Command::SaveAdd { .. })),
    };
    let (action, href, submit) = match save.map(|button| (&button.command, &button.label)) {
        Some((Command::SaveEdit { href }, label)) => (Some("/actions/update"), href.clone(), label.clone()),
        Some((Command::SaveAdd { href }, label)) => (Some("/actions/create"), href.clone(), label.clone()),
        _ => (None, String::new(), String::new()),
    };
    Some(EditorForm {
        action,
        href,
        text: page.editor.clone(),
        submit,
    })
}

/// Query string of a resource page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub mode: Option<String>,
    pub message: Option<String>,
    pub filter: Option<String>,
}

/// `GET /webui` — the cloud entry point.
pub async fn root<C>(
    State(state): State<AppState<C>>,
    Query(query): Query<PageQuery>,
) -> Result<PageTemplate, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    show(&state, &location_of(""), query).await
}

/// `GET /webui/{*reference}` — any other resource.
pub async fn resource<C>(
    State(state): State<AppState<C>>,
    Path(reference): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<PageTemplate, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    show(&state, &location_of(&reference), query).await
}

async fn show<C>(
    state: &AppState<C>,
    location: &PageLocation,
    query: PageQuery,
) -> Result<PageTemplate, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    let mode = match query.mode.as_deref() {
        Some(mode) => ViewMode::from_str(mode).map_err(|err| WebError::BadRequest(err.to_string()))?,
        None => ViewMode::Normal,
    };
    let page = load(state, location, mode, query.filter.as_deref()).await?;
    Ok(PageTemplate::new(page, query.message, query.filter))
}

/// Fetch and build the page at `location` in `mode`.
///
/// Editing or adding a resource that does not advertise the matching
/// operation is rejected.
pub(crate) async fn load<C>(
    state: &AppState<C>,
    location: &PageLocation,
    mode: ViewMode,
    filter: Option<&str>,
) -> Result<Page, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    let filter = filter
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(Filter::parse)
        .transpose()
        .map_err(CimiError::from)?;
    let page = match &filter {
        Some(filter) => state.browser.load_filtered(location, filter, mode).await?,
        None => state.browser.load(location, mode).await?,
    };
    let missing = match mode {
        ViewMode::Editing if page.find_button(|c| matches!(c, Command::SaveEdit { .. })).is_none() => {
            Some("edit")
        }
        ViewMode::Adding if page.find_button(|c| matches!(c, Command::SaveAdd { .. })).is_none() => {
            Some("add")
        }
        _ => None,
    };
    if let Some(rel) = missing {
        return Err(CimiError::MissingOperation(rel.to_string()).into());
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use crate::router;
    use crate::test_support::{BASE, StubClient, body_text, get, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    fn stub() -> StubClient {
        StubClient::default()
            .with_document(
                BASE,
                json!({
                    "resourceURI": "http://schemas.dmtf.org/cimi/1/CloudEntryPoint",
                    "id": "",
                    "name": "demo cloud",
                    "machines": {"href": "MachineCollection"},
                    "operations": [{"rel": "edit", "href": "edit1"}]
                }),
            )
            .with_document(
                "http://localhost/cimi/MachineCollection",
                json!({"resourceURI": "http://schemas.dmtf.org/cimi/1/MachineCollection", "count": 0}),
            )
            .with_document(
                "http://localhost/cimi/MachineCollection/m1",
                json!({
                    "resourceURI": "http://schemas.dmtf.org/cimi/1/Machine",
                    "id": "MachineCollection/m1",
                    "cpu": 2,
                    "operations": [
                        {"rel": "delete", "href": "MachineCollection/m1"},
                        {"rel": "http://schemas.dmtf.org/cimi/1/action/start", "href": "MachineCollection/m1/start"}
                    ]
                }),
            )
    }

    #[tokio::test]
    async fn should_render_entry_point_with_links() {
        let app = router::build(test_state(stub()));

        let (status, body) = body_text(app, get("/webui")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("CloudEntryPoint"));
        assert!(body.contains("href=\"/webui/MachineCollection\""));
        assert!(body.contains("href=\"/webui?mode=edit\""));
        assert!(body.contains("view json"));
    }

    #[tokio::test]
    async fn should_render_empty_collection() {
        let app = router::build(test_state(stub()));

        let (status, body) = body_text(app, get("/webui/MachineCollection")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No items."));
        assert!(body.contains("name=\"filter\""));
    }

    #[tokio::test]
    async fn should_render_item_terms_and_operation_forms() {
        let app = router::build(test_state(stub()));

        let (status, body) = body_text(app, get("/webui/MachineCollection/m1")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("cpu"));
        assert!(body.contains("action=\"/actions/delete\""));
        assert!(body.contains("name=\"parent\" value=\"MachineCollection\""));
        assert!(body.contains("action=\"/actions/run\""));
        assert!(body.contains("value=\"start\""));
        assert!(body.contains("No explicit ACL."));
    }

    #[tokio::test]
    async fn should_render_editor_form_in_edit_mode() {
        let app = router::build(test_state(stub()));

        let (status, body) = body_text(app, get("/webui?mode=edit")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("action=\"/actions/update\""));
        assert!(body.contains("<textarea"));
        assert!(body.contains("value=\"edit1\""));
    }

    #[tokio::test]
    async fn should_reject_edit_mode_without_edit_operation() {
        let app = router::build(test_state(stub()));

        let (status, body) =
            body_text(app, get("/webui/MachineCollection/m1?mode=edit")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("operation `edit` is not available"));
    }

    #[tokio::test]
    async fn should_reject_unknown_mode() {
        let app = router::build(test_state(stub()));

        let (status, _) = body_text(app, get("/webui?mode=fly")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_show_message_from_query() {
        let app = router::build(test_state(stub()));

        let (_, body) =
            body_text(app, get("/webui?message=Edit%20resource%20cancelled.")).await;

        assert!(body.contains("Edit resource cancelled."));
    }

    #[tokio::test]
    async fn should_report_upstream_status_line() {
        let app = router::build(test_state(stub()));

        let (status, body) = body_text(app, get("/webui/Missing")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not Found(404)"));
    }

    #[tokio::test]
    async fn should_reject_malformed_filter() {
        let app = router::build(test_state(stub()));

        let (status, _) = body_text(app, get("/webui/MachineCollection?filter=name%3D")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_pass_filter_to_server() {
        let client = stub().with_document(
            "http://localhost/cimi/MachineCollection?$filter=cpu%3E2",
            json!({"resourceURI": "http://schemas.dmtf.org/cimi/1/MachineCollection", "count": 0}),
        );
        let app = router::build(test_state(client));

        let (status, body) =
            body_text(app, get("/webui/MachineCollection?filter=cpu%3E2")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("name=\"filter\""));
    }
}
