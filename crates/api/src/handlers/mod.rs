pub mod compound;
pub mod convert;
pub mod home;
pub mod inchi;
pub mod reload;
pub mod search;
pub mod upload;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A `302 Found` redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
