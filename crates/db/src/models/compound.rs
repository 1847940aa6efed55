use dci_core::types::CompoundId;
use serde::Serialize;
use sqlx::FromRow;

/// A PubChem compound row from `dci.compound_metadata`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Compound {
    pub id: CompoundId,
    pub inchi: Option<String>,
    pub formula: Option<String>,
    pub molecular_weight: Option<f64>,
}

/// A PubChem synonym from `dci.compound_name`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompoundName {
    pub seq: i32,
    pub name: String,
}
