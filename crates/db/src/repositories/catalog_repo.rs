//! Rebuild of the derived identifier index and link view.
//!
//! Source tables are loaded out of band; the gateway only regenerates the
//! objects derived from them. The whole rebuild runs in one transaction, so
//! readers see either the previous index and view or the new ones.

use sqlx::PgPool;

use crate::models::links::ReloadSummary;

/// Every identifier known to any source database.
const REFILL_INDEX_SQL: &str = "\
    INSERT INTO dci.inchi_index (inchi) \
    SELECT DISTINCT inchi FROM ( \
        SELECT inchi FROM alatis.compound_alatis \
        UNION SELECT inchi FROM gissmo.entries \
        UNION SELECT inchi FROM camp.camp \
        UNION SELECT inchi FROM bmod.entries \
        UNION SELECT inchi FROM dci.compound_metadata \
    ) AS sources \
    WHERE inchi IS NOT NULL AND inchi <> ''";

const CREATE_LINKS_VIEW_SQL: &str = "\
    CREATE VIEW dci.db_links AS SELECT \
        d.inchi, \
        array_remove(array_agg(DISTINCT a.id), NULL) AS alatis_ids, \
        array_remove(array_agg(DISTINCT g.id), NULL) AS gissmo_ids, \
        array_remove(array_agg(DISTINCT c.id), NULL) AS camp_ids, \
        array_remove(array_agg(DISTINCT b.id), NULL) AS bmod_ids, \
        array_remove(array_agg(DISTINCT p.id::text), NULL) AS pubchem_ids \
    FROM dci.inchi_index AS d \
        LEFT JOIN alatis.compound_alatis AS a ON a.inchi = d.inchi \
        LEFT JOIN gissmo.entries AS g ON g.inchi = d.inchi \
        LEFT JOIN camp.camp AS c ON c.inchi = d.inchi \
        LEFT JOIN bmod.entries AS b ON b.inchi = d.inchi \
        LEFT JOIN dci.compound_metadata AS p ON p.inchi = d.inchi \
    GROUP BY d.inchi";

#[derive(Debug, thiserror::Error)]
#[error("invalid role name: {0}")]
pub struct InvalidRole(pub String);

/// A database role validated for use in GRANT statements.
///
/// Only `[A-Za-z_][A-Za-z0-9_]*` is accepted, since the name is spliced
/// into statements that cannot take bind parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRole(String);

impl GrantRole {
    pub fn parse(role: &str) -> Result<Self, InvalidRole> {
        let mut chars = role.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if valid_start && valid_rest {
            Ok(Self(role.to_string()))
        } else {
            Err(InvalidRole(role.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The role as a quoted SQL identifier.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

/// Provides the reload operation.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Regenerate `inchi_index` and `db_links`, then optionally grant read
    /// access on the `dci` schema to `grant_role`.
    ///
    /// Returns the number of indexed identifiers.
    pub async fn reload(
        pool: &PgPool,
        grant_role: Option<&GrantRole>,
    ) -> Result<ReloadSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DROP VIEW IF EXISTS dci.db_links")
            .execute(&mut *tx)
            .await?;
        sqlx::query("CREATE TABLE IF NOT EXISTS dci.inchi_index (inchi TEXT NOT NULL)")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DROP INDEX IF EXISTS dci.uq_inchi_index_inchi")
            .execute(&mut *tx)
            .await?;
        sqlx::query("TRUNCATE dci.inchi_index")
            .execute(&mut *tx)
            .await?;
        sqlx::query(REFILL_INDEX_SQL).execute(&mut *tx).await?;
        sqlx::query("CREATE UNIQUE INDEX uq_inchi_index_inchi ON dci.inchi_index (inchi)")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_LINKS_VIEW_SQL)
            .execute(&mut *tx)
            .await?;

        if let Some(role) = grant_role.map(GrantRole::quoted) {
            sqlx::query(&format!("GRANT USAGE ON SCHEMA dci TO {role}"))
                .execute(&mut *tx)
                .await?;
            sqlx::query(&format!("GRANT SELECT ON ALL TABLES IN SCHEMA dci TO {role}"))
                .execute(&mut *tx)
                .await?;
        }

        let identifiers = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dci.inchi_index")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(identifiers, granted = grant_role.is_some(), "Catalog reloaded");

        Ok(ReloadSummary {
            identifiers,
            reloaded_at: chrono::Utc::now(),
        })
    }
}
