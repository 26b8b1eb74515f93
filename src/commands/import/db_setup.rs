use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use tracing::warn;

use super::store_values::{StoreValueError, coerce_record};
use crate::model::{MEDIA_COLUMNS, MediaRecord, is_integer_column};

pub(crate) const DB_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PersistStats {
    pub written: usize,
    pub skipped_unidentified: usize,
}

pub(crate) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

/// Creates the `media` and `metadata` tables when they do not exist yet.
pub(crate) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS media (
              {},
              PRIMARY KEY(id)
            );
            ",
            media_column_definitions()
        ))
        .context("failed to create media schema")?;

    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;

    Ok(())
}

fn media_column_definitions() -> String {
    MEDIA_COLUMNS
        .iter()
        .map(|column| {
            let sql_type = if is_integer_column(column) {
                "INTEGER"
            } else {
                "TEXT"
            };
            format!("{column} {sql_type}")
        })
        .collect::<Vec<_>>()
        .join(",\n              ")
}

fn upsert_sql() -> String {
    let placeholders = (1..=MEDIA_COLUMNS.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT OR REPLACE INTO media ({}) VALUES ({placeholders})",
        MEDIA_COLUMNS.join(", ")
    )
}

/// Writes records with full-row replacement on `id`.
///
/// A record without an `id` fails the call unless `skip_unidentified` is set,
/// in which case it is logged and left out.
pub(crate) fn persist_records(
    connection: &Connection,
    records: &[MediaRecord],
    skip_unidentified: bool,
) -> Result<PersistStats> {
    let mut statement = connection
        .prepare_cached(&upsert_sql())
        .context("failed to prepare media upsert")?;
    let mut stats = PersistStats::default();

    for record in records {
        let values = match coerce_record(record) {
            Ok(values) => values,
            Err(StoreValueError::MissingIdentifier { name }) if skip_unidentified => {
                warn!(name = ?name, "skipping record without a catalog id");
                stats.skipped_unidentified += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        statement
            .execute(params_from_iter(values.iter()))
            .with_context(|| format!("failed to upsert media id {}", record.id().unwrap_or("?")))?;
        stats.written += 1;
    }

    Ok(stats)
}

/// Keeps only the most recently written row of every `(id, name)` group.
pub(crate) fn remove_duplicates(connection: &Connection) -> Result<usize> {
    let removed = connection
        .execute(
            "DELETE FROM media
             WHERE rowid NOT IN (SELECT MAX(rowid) FROM media GROUP BY id, name)",
            [],
        )
        .context("failed to remove duplicate media rows")?;
    Ok(removed)
}

pub(crate) fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

pub(crate) fn read_schema_version(connection: &Connection) -> Result<Option<String>> {
    let version = connection
        .query_row(
            "SELECT value FROM metadata WHERE key = 'db_schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read db_schema_version")?;
    Ok(version)
}
