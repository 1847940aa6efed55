//! Cross-reference rows from the `dci.db_links` view.

use serde::Serialize;
use sqlx::FromRow;

/// Every source-database id registered under one InChI.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq)]
pub struct DbLinks {
    pub inchi: String,
    pub alatis_ids: Vec<String>,
    pub gissmo_ids: Vec<String>,
    pub camp_ids: Vec<String>,
    pub bmod_ids: Vec<String>,
    pub pubchem_ids: Vec<String>,
}

impl DbLinks {
    /// Whether no source database references this identifier.
    pub fn is_empty(&self) -> bool {
        self.alatis_ids.is_empty()
            && self.gissmo_ids.is_empty()
            && self.camp_ids.is_empty()
            && self.bmod_ids.is_empty()
            && self.pubchem_ids.is_empty()
    }
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The identifier itself is indexed.
    Exact,
    /// Only concrete stereo variants of the identifier are indexed.
    StereoExpanded,
    /// Nothing is indexed for the identifier or its variants.
    None,
}

/// Result of an identifier lookup.
#[derive(Debug, Clone, Serialize)]
pub struct LinkLookup {
    pub inchi: String,
    pub match_kind: MatchKind,
    /// Number of identifiers queried (1 unless stereo was expanded).
    pub variants_searched: usize,
    pub matches: Vec<DbLinks>,
}

/// Outcome of a derived-data rebuild.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadSummary {
    pub identifiers: i64,
    pub reloaded_at: dci_core::types::Timestamp,
}
