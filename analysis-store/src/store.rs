//! Store operations: open, create-once, list.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::ErrorCode;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};
use crate::types::AnalysisRecord;

/// Handle to the SQLite-backed analysis store.
///
/// Cheap to clone; every clone shares the same background connection.
#[derive(Clone)]
pub struct AnalysisStore {
    conn: Connection,
}

impl AnalysisStore {
    /// Opens (or creates) the database at `path`, configures WAL mode and
    /// applies schema migrations.
    ///
    /// This is the single entry point for all store connections. It sets
    /// `busy_timeout` via the `Connection` method (not a PRAGMA string) so
    /// the setting takes effect regardless of pragma caching.
    pub async fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(tokio_rusqlite::Error::from)?;

        conn.call(|db| -> Result<(), rusqlite::Error> {
            db.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA foreign_keys=ON;",
            )?;
            db.busy_timeout(Duration::from_secs(5))?;
            crate::schema::migrate(db)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Inserts the record, failing with [`StoreError::Duplicate`] when an
    /// analysis already exists for the same (`repository`, `pr_number`).
    ///
    /// The record is returned unchanged on success so callers can hand the
    /// stored value straight back to their own callers.
    pub async fn create(&self, record: AnalysisRecord) -> StoreResult<AnalysisRecord> {
        let issues_json = serde_json::to_string(&record.issues)?;
        let row = (
            record.analysis_id.clone(),
            record.repository.clone(),
            record.pr_number,
            issues_json,
            record.created_at.to_rfc3339(),
        );

        let result = self
            .conn
            .call(move |db| -> Result<(), rusqlite::Error> {
                db.execute(
                    "INSERT INTO analyses (analysis_id, repository, pr_number, issues, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![row.0, row.1, row.2, row.3, row.4],
                )?;
                Ok(())
            })
            .await;

        match result {
            Ok(()) => {
                debug!(
                    repository = %record.repository,
                    pr_number = record.pr_number,
                    analysis_id = %record.analysis_id,
                    "analysis stored"
                );
                Ok(record)
            }
            Err(tokio_rusqlite::Error::Error(rusqlite::Error::SqliteFailure(e, _)))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns every stored record, oldest first.
    pub async fn find_all(&self) -> StoreResult<Vec<AnalysisRecord>> {
        let rows = self
            .conn
            .call(
                |db| -> Result<Vec<(String, String, u64, String, String)>, rusqlite::Error> {
                    let mut stmt = db.prepare(
                        "SELECT analysis_id, repository, pr_number, issues, created_at
                         FROM analyses
                         ORDER BY created_at",
                    )?;
                    let rows = stmt
                        .query_map([], |r| {
                            Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?))
                        })?
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(rows)
                },
            )
            .await?;

        rows.into_iter().map(decode_row).collect()
    }
}

fn decode_row(
    (analysis_id, repository, pr_number, issues, created_at): (String, String, u64, String, String),
) -> StoreResult<AnalysisRecord> {
    let issues = serde_json::from_str(&issues)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::Corrupt(format!("created_at: {e}")))?
        .with_timezone(&Utc);

    Ok(AnalysisRecord {
        analysis_id,
        repository,
        pr_number,
        issues,
        created_at,
    })
}
