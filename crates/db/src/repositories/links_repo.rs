//! Repository for identifier cross-references (`dci.db_links`).

use dci_core::inchi::{expand_undefined_stereo, Inchi, MAX_STEREO_VARIANTS};
use sqlx::PgPool;

use crate::models::links::{DbLinks, LinkLookup, MatchKind};
use crate::repositories::{CatalogRepo, GrantRole};

/// Column list for `db_links` queries.
const COLUMNS: &str = "inchi, alatis_ids, gissmo_ids, camp_ids, bmod_ids, pubchem_ids";

/// SQLSTATE codes treated as a stale or missing derived schema.
const SCHEMA_ERROR_CODES: [&str; 2] = [
    "42P01", // undefined_table
    "42703", // undefined_column
];

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Identifier(#[from] dci_core::inchi::InchiError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides identifier lookups against the link view.
pub struct LinksRepo;

impl LinksRepo {
    /// Fetch the link row for one identifier.
    pub async fn find(pool: &PgPool, inchi: &str) -> Result<Option<DbLinks>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dci.db_links WHERE inchi = $1");
        sqlx::query_as::<_, DbLinks>(&query)
            .bind(inchi)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the link rows for any of the given identifiers, ordered by InChI.
    pub async fn find_any(pool: &PgPool, inchis: &[String]) -> Result<Vec<DbLinks>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dci.db_links WHERE inchi = ANY($1) ORDER BY inchi COLLATE \"C\""
        );
        sqlx::query_as::<_, DbLinks>(&query)
            .bind(inchis)
            .fetch_all(pool)
            .await
    }

    /// Look up an identifier, broadening to stereo variants when needed.
    ///
    /// An exact match wins. Otherwise, if the identifier has undefined
    /// stereocentres, every concrete assignment is looked up instead. A
    /// missing view or column triggers one synchronous reload on
    /// `reload_pool`, granting `grant_role` read access, and a retry on `pool`.
    pub async fn lookup(
        pool: &PgPool,
        reload_pool: &PgPool,
        grant_role: Option<&GrantRole>,
        inchi: &Inchi,
    ) -> Result<LinkLookup, LookupError> {
        match Self::lookup_once(pool, inchi).await {
            Err(LookupError::Database(err)) if is_schema_error(&err) => {
                tracing::warn!(error = %err, inchi = %inchi, "Link view unusable, rebuilding");
                CatalogRepo::reload(reload_pool, grant_role).await?;
                Self::lookup_once(pool, inchi).await
            }
            other => other,
        }
    }

    async fn lookup_once(pool: &PgPool, inchi: &Inchi) -> Result<LinkLookup, LookupError> {
        if let Some(exact) = Self::find(pool, inchi.as_str()).await? {
            return Ok(LinkLookup {
                inchi: inchi.to_string(),
                match_kind: MatchKind::Exact,
                variants_searched: 1,
                matches: vec![exact],
            });
        }

        if !inchi.has_undefined_stereo() {
            return Ok(LinkLookup {
                inchi: inchi.to_string(),
                match_kind: MatchKind::None,
                variants_searched: 1,
                matches: Vec::new(),
            });
        }

        let variants: Vec<String> = expand_undefined_stereo(inchi, MAX_STEREO_VARIANTS)?
            .into_iter()
            .map(Inchi::into_string)
            .collect();
        let matches = Self::find_any(pool, &variants).await?;

        tracing::debug!(
            inchi = %inchi,
            variants = variants.len(),
            matches = matches.len(),
            "Stereo-expanded lookup",
        );

        let match_kind = if matches.is_empty() {
            MatchKind::None
        } else {
            MatchKind::StereoExpanded
        };

        Ok(LinkLookup {
            inchi: inchi.to_string(),
            match_kind,
            variants_searched: variants.len(),
            matches,
        })
    }
}

/// Whether a database error means the derived objects need rebuilding.
pub fn is_schema_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| SCHEMA_ERROR_CODES.iter().any(|c| *c == code)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_schema_errors() {
        assert!(!is_schema_error(&sqlx::Error::RowNotFound));
        assert!(!is_schema_error(&sqlx::Error::PoolTimedOut));
    }
}
