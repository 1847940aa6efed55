//! Repository for term search across source databases and PubChem.
//!
//! One query unions four sources: prefix matches on `search_terms`,
//! full-text matches on `search_terms.identical_term`, the PubChem compound
//! whose id equals the term, and prefix matches on PubChem synonyms.

use std::sync::LazyLock;

use dci_core::search::{
    like_prefix_pattern, pubchem_id, PUBCHEM_DATABASE, PUBCHEM_NAME_LIMIT, PUBCHEM_PATH_PREFIX,
    UNKNOWN_NAME,
};
use sqlx::PgPool;

use crate::models::search::{SearchDebug, SearchHit};

/// Union search. Binds: `$1` term, `$2` prefix pattern, `$3` PubChem id (or
/// NULL), `$4` synonym cap, `$5` result limit (NULL for no limit).
static SEARCH_SQL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "\
        SELECT id, database, term, termname, data_path, sml FROM ( \
            SELECT id, db AS database, term, termname, data_path, \
                   similarity(term, $1::text)::real AS sml \
            FROM dci.search_terms \
            WHERE lower(term) LIKE lower($2::text) \
          UNION \
            SELECT id, db, term, termname, data_path, \
                   similarity(term, $1::text)::real \
            FROM dci.search_terms \
            WHERE identical_term @@ plainto_tsquery('simple', $1::text) \
          UNION \
            (SELECT cm.id::text, '{PUBCHEM_DATABASE}', coalesce(cn.name, '{UNKNOWN_NAME}'), 'Compound', \
                    '{PUBCHEM_PATH_PREFIX}' || cm.id, 1::real \
             FROM dci.compound_metadata AS cm \
             LEFT JOIN dci.compound_name AS cn ON cn.id = cm.id \
             WHERE cm.id = $3::int \
             ORDER BY cn.seq \
             LIMIT 1) \
          UNION \
            (SELECT id::text, '{PUBCHEM_DATABASE}', name, 'Compound', '{PUBCHEM_PATH_PREFIX}' || id, \
                    similarity(lower(name), lower($1::text))::real \
             FROM dci.compound_name \
             WHERE lower(name) LIKE lower($2::text) \
             LIMIT $4) \
        ) AS f \
        ORDER BY sml DESC, database != '{PUBCHEM_DATABASE}', id ASC \
        LIMIT $5"
    )
});

/// Provides term search over the denormalized search tables.
pub struct SearchRepo;

impl SearchRepo {
    /// Run the union search for `term`.
    ///
    /// Rows are ordered by trigram similarity, then PubChem first, then id.
    /// `limit = None` returns every match.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        limit: Option<i64>,
    ) -> Result<Vec<SearchHit>, sqlx::Error> {
        sqlx::query_as::<_, SearchHit>(SEARCH_SQL.as_str())
            .bind(term)
            .bind(like_prefix_pattern(term))
            .bind(pubchem_id(term))
            .bind(PUBCHEM_NAME_LIMIT)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// The statement [`search`](Self::search) would run, with its bound values.
    pub fn debug_sql(term: &str, limit: Option<i64>) -> SearchDebug {
        SearchDebug {
            sql: SEARCH_SQL.clone(),
            params: vec![
                term.to_string(),
                like_prefix_pattern(term),
                pubchem_id(term).map_or_else(|| "NULL".to_string(), |id| id.to_string()),
                PUBCHEM_NAME_LIMIT.to_string(),
                limit.map_or_else(|| "NULL".to_string(), |l| l.to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_sql_lists_bound_values_in_order() {
        let debug = SearchRepo::debug_sql("702", Some(75));
        assert_eq!(debug.params, vec!["702", "702%", "702", "50", "75"]);
        assert!(debug.sql.contains("plainto_tsquery"));
    }

    #[test]
    fn pubchem_rows_use_shared_label_and_path() {
        let sql = SearchRepo::debug_sql("methane", None).sql;
        assert!(sql.contains("'PubChem', coalesce(cn.name, 'Unknown Name')"));
        assert!(sql.contains("'pubchem/' || cm.id"));
        assert!(sql.contains("database != 'PubChem'"));
    }

    #[test]
    fn debug_sql_reports_null_for_non_numeric_term_and_no_limit() {
        let debug = SearchRepo::debug_sql("ethanol", None);
        assert_eq!(debug.params[2], "NULL");
        assert_eq!(debug.params[4], "NULL");
    }
}
