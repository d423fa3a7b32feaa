//! SQLite schema and migrations for the analysis store.
//!
//! Versioning goes through the `schema_version` table; `migrate` is applied
//! on every open and is a no-op once the version is current.

/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every DB open (before checking the version),
/// using `IF NOT EXISTS` so it is safe to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the full v1 schema.
///
/// A single `analyses` table: one row per analyzed pull request, keyed by a
/// UUID v4 text id. `issues` holds the normalized issue list as a JSON array.
/// The composite UNIQUE constraint on (`repository`, `pr_number`) is what
/// makes a second analysis of the same PR fail distinguishably.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS analyses (
        analysis_id TEXT    PRIMARY KEY,
        repository  TEXT    NOT NULL,
        pr_number   INTEGER NOT NULL,
        issues      TEXT    NOT NULL,
        created_at  TEXT    NOT NULL,
        UNIQUE (repository, pr_number)
    ) STRICT;
";

/// Applies pending migrations inside a transaction.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        let tx = db.transaction()?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}
