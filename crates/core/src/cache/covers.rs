//! Cover entry lookup and insert.
//!
//! The covers table is append-only: a DOI is written once, on first
//! resolution, and never updated or deleted.

use super::connection::CoverCache;
use crate::Error;
use rusqlite::params;

impl CoverCache {
    /// Look up the cached cover URL for a DOI.
    ///
    /// Returns None if the DOI has no entry; a miss is the expected
    /// outcome for unseen books, not an error.
    pub fn lookup(&self, doi: &str) -> Result<Option<String>, Error> {
        let mut stmt = self.conn.prepare("SELECT cover_url FROM covers WHERE doi = ?1")?;

        let result = stmt.query_row(params![doi], |row| row.get(0));

        match result {
            Ok(url) => Ok(Some(url)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a newly resolved cover URL.
    ///
    /// The statement commits before this returns. There are no upsert
    /// semantics: storing a DOI that already has an entry fails with
    /// [`Error::DuplicateKey`] — callers that care must look up first.
    pub fn store(&self, doi: &str, cover_url: &str) -> Result<(), Error> {
        let inserted = self.conn.execute(
            "INSERT INTO covers (doi, cover_url) VALUES (?1, ?2)",
            params![doi, cover_url],
        );

        match inserted {
            Ok(_) => {
                tracing::debug!(doi, "cover cached");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateKey { key: doi.to_string() }),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of cached covers.
    pub fn count(&self) -> Result<u64, Error> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM covers", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
