//! Axum router assembly.

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use cimi_browser_app::ports::ResourceClient;

use crate::state::AppState;
use crate::webui::UI_ROOT;

/// Build the top-level axum [`Router`].
///
/// Serves the browser under `/webui` and form actions under `/actions`.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<C>(state: AppState<C>) -> Router
where
    C: ResourceClient + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { Redirect::to(UI_ROOT) }))
        .merge(crate::webui::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
