//! Structure upload and conversion.

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use dci_core::conversion::ConversionRequest;
use dci_core::inchi::Inchi;
use serde::Serialize;

use crate::error::{AppError, AppResult, PageResult};
use crate::handlers::upload::UploadForm;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::inchi_href;

#[derive(Debug, Serialize)]
pub struct ConvertResult {
    pub inchi: Inchi,
}

async fn convert(state: &AppState, request: ConversionRequest) -> Result<Inchi, AppError> {
    let format = request.format;
    let inchi = state.converter.convert(request).await?;
    tracing::info!(
        backend = state.converter.name(),
        format = %format,
        inchi = %inchi,
        "Structure converted",
    );
    Ok(inchi)
}

/// POST /upload
///
/// Convert the uploaded structure and redirect (303) to its
/// cross-reference page.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> PageResult<impl IntoResponse> {
    let request = UploadForm::read(multipart).await?.into_request()?;
    let inchi = convert(&state, request).await?;
    Ok(Redirect::to(&inchi_href(inchi.as_str())))
}

/// POST /api/v1/convert
///
/// Same form as `/upload`; responds with the identifier as JSON.
pub async fn convert_api(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let request = UploadForm::read(multipart).await?.into_request()?;
    let inchi = convert(&state, request).await?;
    Ok(Json(DataResponse {
        data: ConvertResult { inchi },
    }))
}
