//! Repository for PubChem compound metadata and synonyms.

use dci_core::types::CompoundId;
use sqlx::PgPool;

use crate::models::compound::{Compound, CompoundName};

/// Provides read access to PubChem compounds.
pub struct CompoundRepo;

impl CompoundRepo {
    pub async fn find(pool: &PgPool, id: CompoundId) -> Result<Option<Compound>, sqlx::Error> {
        sqlx::query_as::<_, Compound>(
            "SELECT id, inchi, formula, molecular_weight \
             FROM dci.compound_metadata WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Synonyms in preferred order.
    pub async fn names(pool: &PgPool, id: CompoundId) -> Result<Vec<CompoundName>, sqlx::Error> {
        sqlx::query_as::<_, CompoundName>(
            "SELECT seq, name FROM dci.compound_name WHERE id = $1 ORDER BY seq",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
