//! Term search: redirect, HTML results, and the autocomplete JSON.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use dci_core::encoding::encode_query_value;
use dci_core::search::{normalize_term, QUERY_RESULT_LIMIT};
use dci_db::models::search::{SearchHit, SearchSuggestion};
use dci_db::repositories::SearchRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult, PageResult};
use crate::handlers::found;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
    /// Any non-empty value returns the statement instead of running it.
    pub debug: Option<String>,
}

/// Run the union search under the configured deadline.
async fn run_search(
    state: &AppState,
    term: &str,
    limit: Option<i64>,
) -> Result<Vec<SearchHit>, AppError> {
    let deadline = Duration::from_secs(state.config.search_timeout_secs);
    match tokio::time::timeout(deadline, SearchRepo::search(&state.pool, term, limit)).await {
        Ok(hits) => Ok(hits?),
        Err(_elapsed) => {
            tracing::warn!(term, timeout_secs = deadline.as_secs(), "Search timed out");
            Err(AppError::Timeout("The search took too long".to_string()))
        }
    }
}

/// GET /search?term=
///
/// Redirect (302) to the full results page.
pub async fn search_redirect(Query(params): Query<SearchParams>) -> Response {
    let term = params.term.as_deref().unwrap_or_default();
    found(&format!("/search/results?term={}", encode_query_value(term)))
}

/// GET /search/results?term=
///
/// Every match, unlimited.
pub async fn search_results(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> PageResult<Html<String>> {
    let Some(term) = normalize_term(params.term.as_deref()) else {
        return Ok(Html(views::search::empty_page()));
    };

    let hits = run_search(&state, term, None).await?;
    Ok(Html(views::search::results_page(term, &hits)))
}

/// GET /search/query?term=&debug=
///
/// At most [`QUERY_RESULT_LIMIT`] autocomplete records as a bare JSON
/// array. With `debug`, the parameterized statement and its bound values.
pub async fn search_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let term = normalize_term(params.term.as_deref())
        .ok_or_else(|| AppError::BadRequest("Specify term.".to_string()))?;

    if params.debug.as_deref().is_some_and(|d| !d.is_empty()) {
        return Ok(Json(SearchRepo::debug_sql(term, Some(QUERY_RESULT_LIMIT))).into_response());
    }

    let suggestions: Vec<SearchSuggestion> = run_search(&state, term, Some(QUERY_RESULT_LIMIT))
        .await?
        .into_iter()
        .map(SearchSuggestion::from)
        .collect();

    Ok(Json(suggestions).into_response())
}
