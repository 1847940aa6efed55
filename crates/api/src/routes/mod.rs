pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the HTML page routes.
///
/// ```text
/// /                       GET   home page (upload form)
/// /upload                 POST  convert upload, 303 to /inchi/{inchi}
/// /inchi/{*inchi}         GET   cross-reference page
/// /search                 GET   302 to /search/results
/// /search/results         GET   full results page
/// /search/query           GET   autocomplete JSON
/// /pubchem/{cid}          GET   PubChem compound page
/// /reload                 GET   rebuild derived data, 302 to /
/// ```
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::home))
        .route("/upload", post(handlers::convert::upload))
        .route("/inchi/{*inchi}", get(handlers::inchi::inchi_page))
        .route("/search", get(handlers::search::search_redirect))
        .route("/search/results", get(handlers::search::search_results))
        .route("/search/query", get(handlers::search::search_query))
        .route("/pubchem/{cid}", get(handlers::compound::pubchem_page))
        .route("/reload", get(handlers::reload::reload))
}

/// Build the `/api/v1` route tree.
///
/// ```text
/// /convert                POST  multipart upload -> {"data": {"inchi"}}
/// /links?inchi=           GET   {"data": LinkLookup}
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/convert", post(handlers::convert::convert_api))
        .route("/links", get(handlers::inchi::links_api))
}
