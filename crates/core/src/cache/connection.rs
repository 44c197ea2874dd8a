//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying the required
//! pragmas (WAL mode), and running schema initialization.

use super::migrations;
use crate::Error;
use rusqlite::Connection;
use std::path::Path;

/// Cover cache handle.
///
/// Wraps a rusqlite Connection. All operations are synchronous and run to
/// completion on the caller's thread; the handle is meant to be owned by
/// exactly one caller.
#[derive(Debug)]
pub struct CoverCache {
    pub(crate) conn: Connection,
}

impl CoverCache {
    /// Open a cache at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies the pragma block, and
    /// initializes the schema on a fresh file. Reopening an existing file
    /// leaves its schema and contents untouched.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| Error::Open { path: path.to_path_buf(), source: e })?;
        tracing::debug!(path = %path.display(), "opening cover cache");
        Self::init(conn)
    }

    /// Open an in-memory cache.
    ///
    /// Same pragma configuration and schema as file-backed caches.
    ///
    /// Note:
    /// - In-memory databases are destroyed when the handle is dropped.
    /// - Not gated behind `#[cfg(test)]` so dependent crates can use it in
    ///   their own tests.
    pub fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA temp_store=MEMORY;
             PRAGMA foreign_keys=ON;",
        )?;

        migrations::run(&conn)?;

        Ok(Self { conn })
    }
}
