//! Form handlers for server operations (PRG).
//!
//! Every handler redirects back to a page; failures travel as `?message=`.
//! The one exception is a save with unparsable JSON, which re-renders the
//! editor with the rejected text so nothing the user typed is lost.

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use cimi_browser_app::ports::{Created, ResourceClient};
use cimi_browser_domain::error::CimiError;
use cimi_browser_domain::view_mode::ViewMode;

use super::pages::{PageTemplate, load};
use super::{location_of, with_query};
use crate::error::WebError;
use crate::state::AppState;

/// Fields shared by every operation form.
#[derive(Debug, Deserialize)]
pub struct OperationForm {
    /// Reference of the page the form was posted from.
    #[serde(default)]
    pub reference: String,
    /// Operation href, resolved against the base endpoint.
    pub href: String,
    /// Action name, for `/actions/run`.
    #[serde(default)]
    pub name: String,
    /// Reference the page was rendered to return to, for `/actions/delete`.
    #[serde(default)]
    pub parent: Option<String>,
    /// Editor contents, for `/actions/update` and `/actions/create`.
    #[serde(default)]
    pub json: String,
}

fn redirect_with_message(url: &str, message: &str) -> Response {
    Redirect::to(&with_query(url, "message", message)).into_response()
}

/// Re-render the editor in `mode` with the rejected text and the parse error.
async fn reject_json<C>(
    state: &AppState<C>,
    form: OperationForm,
    mode: ViewMode,
    err: &CimiError,
) -> Result<Response, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    let location = location_of(&form.reference);
    let page = load(state, &location, mode, None).await?;
    let template = PageTemplate::new(page, Some(err.message()), None).with_editor_text(form.json);
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}

/// `POST /actions/update` — replace a resource with the editor contents.
pub async fn update<C>(
    State(state): State<AppState<C>>,
    Form(form): Form<OperationForm>,
) -> Result<Response, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    let location = location_of(&form.reference);
    match state.browser.update(&form.href, &form.json).await {
        Ok(()) => Ok(Redirect::to(&location.view_url()).into_response()),
        Err(err @ CimiError::InvalidJson(_)) => {
            reject_json(&state, form, ViewMode::Editing, &err).await
        }
        Err(err) => {
            tracing::warn!(%err, href = %form.href, "update failed");
            let reference = location.resolve_resource_path();
            Ok(redirect_with_message(
                &location.view_url(),
                &format!("Update of resource {reference} failed!"),
            ))
        }
    }
}

/// `POST /actions/create` — post the editor contents, then show the new
/// resource (or the current one when the server sends no `Location`).
pub async fn create<C>(
    State(state): State<AppState<C>>,
    Form(form): Form<OperationForm>,
) -> Result<Response, WebError>
where
    C: ResourceClient + Send + Sync + 'static,
{
    let location = location_of(&form.reference);
    match state.browser.create(&form.href, &form.json).await {
        Ok(Created {
            location: Some(created),
        }) => {
            let reference = state.browser.base().reference_of(&created);
            let target = location.with_reference(reference);
            Ok(Redirect::to(&target.view_url()).into_response())
        }
        Ok(Created { location: None }) => Ok(Redirect::to(&location.view_url()).into_response()),
        Err(err @ CimiError::InvalidJson(_)) => {
            reject_json(&state, form, ViewMode::Adding, &err).await
        }
        Err(err) => {
            tracing::warn!(%err, href = %form.href, "create failed");
            Ok(redirect_with_message(
                &location.view_url(),
                "Adding resource failed!",
            ))
        }
    }
}

/// `POST /actions/delete` — delete a resource and return to the parent the
/// page was rendered with.
pub async fn delete<C>(
    State(state): State<AppState<C>>,
    Form(form): Form<OperationForm>,
) -> Response
where
    C: ResourceClient + Send + Sync + 'static,
{
    let location = location_of(&form.reference);
    match state.browser.delete(&form.href).await {
        Ok(()) => {
            let target = match form.parent.as_deref() {
                Some(parent) => location_of(parent).view_url(),
                None => location.parent_view_url(),
            };
            Redirect::to(&target).into_response()
        }
        Err(err) => {
            tracing::warn!(%err, href = %form.href, "delete failed");
            redirect_with_message(
                &location.view_url(),
                &format!("Delete of resource {} failed!", form.href),
            )
        }
    }
}

/// `POST /actions/run` — trigger a named action and reload the resource.
pub async fn run<C>(
    State(state): State<AppState<C>>,
    Form(form): Form<OperationForm>,
) -> Response
where
    C: ResourceClient + Send + Sync + 'static,
{
    let location = location_of(&form.reference);
    match state.browser.run_action(&form.href).await {
        Ok(()) => Redirect::to(&location.view_url()).into_response(),
        Err(err) => {
            tracing::warn!(%err, href = %form.href, name = %form.name, "action failed");
            redirect_with_message(
                &location.view_url(),
                &format!("Action {} failed!", form.name),
            )
        }
    }
}
