//! Identifier cross-reference lookups.

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use dci_core::error::CoreError;
use dci_core::inchi::Inchi;
use dci_db::repositories::LinksRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult, PageResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views;

/// GET /inchi/{*inchi}
///
/// Exact match first, then every concrete stereo variant when the
/// identifier has undefined stereocentres.
pub async fn inchi_page(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> PageResult<impl IntoResponse> {
    let inchi = Inchi::parse(&raw).map_err(CoreError::from)?;
    let lookup = LinksRepo::lookup(
        &state.pool,
        state.reload_pool(),
        state.config.web_role.as_ref(),
        &inchi,
    )
    .await?;

    tracing::debug!(
        inchi = %inchi,
        match_kind = ?lookup.match_kind,
        matches = lookup.matches.len(),
        "Identifier lookup",
    );

    Ok(Html(views::inchi::page(&lookup)))
}

#[derive(Debug, Deserialize)]
pub struct LinksParams {
    pub inchi: Option<String>,
}

/// GET /api/v1/links?inchi=
pub async fn links_api(
    State(state): State<AppState>,
    Query(params): Query<LinksParams>,
) -> AppResult<impl IntoResponse> {
    let raw = params
        .inchi
        .ok_or_else(|| AppError::BadRequest("Missing inchi parameter".to_string()))?;
    let inchi = Inchi::parse(&raw).map_err(CoreError::from)?;
    let lookup = LinksRepo::lookup(
        &state.pool,
        state.reload_pool(),
        state.config.web_role.as_ref(),
        &inchi,
    )
    .await?;
    Ok(Json(DataResponse { data: lookup }))
}
