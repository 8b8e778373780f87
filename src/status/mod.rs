//! Read-status catalog.
//!
//! A small fixed lookup table mapping a state label ("non lu" / "lu") to an
//! identifier. Seeded lazily; safe to seed concurrently from multiple
//! requests thanks to the UNIQUE constraint on the label.

use serde::Serialize;
use sqlx::{QueryBuilder, SqlitePool};

use crate::{MessagerieError, Result};

/// Label for the unread state.
pub const ETAT_NON_LU: &str = "non lu";

/// Label for the read state.
pub const ETAT_LU: &str = "lu";

/// A read-status row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Statut {
    /// Status ID.
    pub id: i64,
    /// State label.
    pub etat: String,
}

/// Catalog of read statuses.
pub struct StatusCatalog;

impl StatusCatalog {
    /// Ensure the two canonical labels exist, inserting only the missing
    /// ones in a single batch.
    ///
    /// Idempotent. Concurrent callers may race the existence check; the
    /// INSERT OR IGNORE plus the UNIQUE constraint on `etat` guarantee at
    /// most one row per label either way.
    pub async fn ensure_seeded(pool: &SqlitePool) -> Result<()> {
        let existing: Vec<String> =
            sqlx::query_scalar("SELECT etat FROM statuts WHERE etat IN (?, ?)")
                .bind(ETAT_NON_LU)
                .bind(ETAT_LU)
                .fetch_all(pool)
                .await?;

        let missing: Vec<&str> = [ETAT_NON_LU, ETAT_LU]
            .into_iter()
            .filter(|etat| !existing.iter().any(|e| e == etat))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("INSERT OR IGNORE INTO statuts (etat) ");
        query.push_values(missing.iter().copied(), |mut b, etat| {
            b.push_bind(etat);
        });
        query.build().execute(pool).await?;

        tracing::debug!(added = ?missing, "Seeded missing read statuses");
        Ok(())
    }

    /// Resolve a state label to its ID.
    pub async fn lookup(pool: &SqlitePool, etat: &str) -> Result<i64> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM statuts WHERE etat = ?")
            .bind(etat)
            .fetch_optional(pool)
            .await?;

        id.ok_or_else(|| MessagerieError::NotFound(format!("statut '{etat}'")))
    }

    /// List all statuses.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Statut>> {
        let statuts = sqlx::query_as::<_, Statut>("SELECT id, etat FROM statuts ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(statuts)
    }

    /// Create a new status with the given label.
    pub async fn create(pool: &SqlitePool, etat: &str) -> Result<Statut> {
        if etat.trim().is_empty() {
            return Err(MessagerieError::Validation(
                "Le champ 'etat' est requis.".to_string(),
            ));
        }

        let result = sqlx::query("INSERT INTO statuts (etat) VALUES (?)")
            .bind(etat)
            .execute(pool)
            .await?;

        Ok(Statut {
            id: result.last_insert_rowid(),
            etat: etat.to_string(),
        })
    }
}
