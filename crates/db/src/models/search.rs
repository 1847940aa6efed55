//! Search result rows and the autocomplete record built from them.

use serde::Serialize;
use sqlx::FromRow;

/// One merged row from the union search.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub database: String,
    pub term: String,
    pub termname: String,
    pub data_path: String,
    pub sml: f32,
}

/// Autocomplete record consumed by the search box script.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchSuggestion {
    pub link: String,
    pub db: String,
    pub entry: String,
    pub termname: String,
    pub term: String,
}

impl From<SearchHit> for SearchSuggestion {
    fn from(hit: SearchHit) -> Self {
        Self {
            link: hit.data_path,
            db: hit.database,
            entry: hit.id,
            termname: hit.termname,
            term: hit.term,
        }
    }
}

/// The search SQL with its bound values, returned by the `debug` flag.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDebug {
    pub sql: String,
    pub params: Vec<String>,
}
