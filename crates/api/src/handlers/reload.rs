use axum::extract::State;
use axum::response::Response;
use dci_db::repositories::CatalogRepo;

use crate::error::PageResult;
use crate::handlers::found;
use crate::state::AppState;

/// GET /reload
///
/// Rebuild the identifier index and link view, then redirect (302) home.
/// Runs on the reload pool so the rebuild can use a privileged role.
pub async fn reload(State(state): State<AppState>) -> PageResult<Response> {
    let summary = CatalogRepo::reload(state.reload_pool(), state.config.web_role.as_ref()).await?;

    tracing::info!(
        identifiers = summary.identifiers,
        web_role = state.config.web_role.as_ref().map(|r| r.as_str()),
        "Reload requested over HTTP",
    );

    Ok(found("/"))
}
