use axum::extract::{Path, State};
use axum::response::Html;
use dci_core::error::CoreError;
use dci_core::search::pubchem_id;
use dci_db::repositories::{CompoundRepo, LinksRepo};

use crate::error::PageResult;
use crate::state::AppState;
use crate::views;

/// GET /pubchem/{cid}
pub async fn pubchem_page(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> PageResult<Html<String>> {
    let not_found = || CoreError::NotFound {
        entity: "PubChem compound",
        id: raw.clone(),
    };

    let cid = pubchem_id(&raw).ok_or_else(not_found)?;
    let compound = CompoundRepo::find(&state.pool, cid)
        .await?
        .ok_or_else(not_found)?;
    let names = CompoundRepo::names(&state.pool, cid).await?;
    let links = match &compound.inchi {
        Some(inchi) => LinksRepo::find(&state.pool, inchi).await?,
        None => None,
    };

    Ok(Html(views::compound::page(&compound, &names, links.as_ref())))
}
