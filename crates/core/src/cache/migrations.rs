//! Schema initialization for the cover cache.
//!
//! Uses a version table to track applied schema scripts. The cache ships a
//! single script; the version check makes reopening an existing file a
//! no-op, so the absent → present transition of the store happens exactly
//! once per file.

use std::num::ParseIntError;

use super::Error;
use rusqlite::{Connection, params};

/// Schema scripts: (version, SQL).
///
/// Applied in order. The version number is an incrementing integer used to
/// track which scripts have already been applied to a given file.
const MIGRATIONS: &[(&str, &str)] = &[("1", include_str!("../../migrations/001_covers.sql"))];

/// Apply any schema scripts the database file hasn't seen yet.
///
/// Creates the _migrations table if it doesn't exist, checks the recorded
/// version, and applies anything newer.
///
/// # Errors
///
/// Returns an error if a script fails to execute.
pub fn run(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;

    let current: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

    for (version, sql) in MIGRATIONS {
        let version_num: i64 = version
            .parse()
            .map_err(|e: ParseIntError| Error::MigrationFailed(e.to_string()))?;
        if version_num > current {
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version_num, chrono::Utc::now().to_rfc3339()],
            )?;
        }
    }

    Ok(())
}
