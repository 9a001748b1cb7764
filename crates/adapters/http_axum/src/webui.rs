//! Server-side rendered CIMI browser (no JavaScript).
//!
//! - `GET  /webui`                  entry point
//! - `GET  /webui/{*reference}`     any other resource; `?mode=`, `?message=`
//!   and (for collections) `?filter=` in the query string
//! - `POST /actions/update`         save the JSON editor (PRG)
//! - `POST /actions/create`         add a resource (PRG)
//! - `POST /actions/delete`         delete a resource (PRG)
//! - `POST /actions/run`            trigger a named action (PRG)

#[allow(clippy::missing_errors_doc)]
pub mod actions;
#[allow(clippy::missing_errors_doc)]
pub mod pages;

use axum::Router;
use axum::routing::{get, post};

use cimi_browser_app::ports::ResourceClient;
use cimi_browser_domain::location::{Addressing, PageLocation};
use cimi_browser_domain::reference::{ResourceReference, encode_query_value};

use crate::state::AppState;

/// Page URI every resource view hangs off.
pub const UI_ROOT: &str = "/webui";

/// Build the browser sub-router.
pub fn routes<C>() -> Router<AppState<C>>
where
    C: ResourceClient + Send + Sync + 'static,
{
    Router::new()
        .route(UI_ROOT, get(pages::root::<C>))
        .route("/webui/{*reference}", get(pages::resource::<C>))
        .route("/actions/update", post(actions::update::<C>))
        .route("/actions/create", post(actions::create::<C>))
        .route("/actions/delete", post(actions::delete::<C>))
        .route("/actions/run", post(actions::run::<C>))
}

/// Path-addressed location of `reference` under [`UI_ROOT`].
fn location_of(reference: &str) -> PageLocation {
    PageLocation::new(
        UI_ROOT,
        ResourceReference::new(reference.trim_start_matches('/')),
        Addressing::Path,
    )
}

/// `url` with `key=value` appended to its query string.
fn with_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{key}={}", encode_query_value(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_address_resources_by_path() {
        let location = location_of("MachineCollection/m1");
        assert_eq!(location.view_url(), "/webui/MachineCollection/m1");
        assert_eq!(location.parent_view_url(), "/webui/MachineCollection");
    }

    #[test]
    fn should_view_entry_point_at_ui_root() {
        assert_eq!(location_of("").view_url(), "/webui");
    }

    #[test]
    fn should_encode_query_values() {
        assert_eq!(
            with_query("/webui", "message", "Edit resource cancelled."),
            "/webui?message=Edit%20resource%20cancelled."
        );
        assert_eq!(with_query("/webui?mode=view", "a", "b"), "/webui?mode=view&a=b");
    }
}
