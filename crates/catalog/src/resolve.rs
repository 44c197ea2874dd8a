//! Cover resolution seam and the batch enrichment loop.
//!
//! Resolving a cover image for an OAPEN resource id is an external
//! concern; [`CoverResolver`] is the boundary where that service plugs in.
//! [`enrich`] is the whole batch run: walk the metadata rows, look each
//! book up in the cache, and resolve-and-store the misses.

use crate::records::{BookRecords, RowError, RowOutcome};
use covercache_core::CoverCache;
use std::collections::HashMap;

/// A cover resolution that could not be completed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("cover resolution failed for {oapen_id}: {reason}")]
pub struct ResolveError {
    pub oapen_id: String,
    pub reason: String,
}

/// Resolves an OAPEN resource id to a cover-image URL.
///
/// Implementations are synchronous; the batch loop consults them one book
/// at a time on the caller's thread.
pub trait CoverResolver {
    fn cover_url(&self, oapen_id: &str) -> Result<String, ResolveError>;
}

/// In-memory resolver serving cover URLs from a fixed table.
///
/// Unknown resource ids fail with [`ResolveError`]. Not gated behind
/// `#[cfg(test)]` so dependent crates can use it in their own tests.
#[derive(Debug, Clone, Default)]
pub struct FixedResolver {
    covers: HashMap<String, String>,
}

impl FixedResolver {
    /// Create a resolver pre-populated with (resource id, cover URL) pairs.
    pub fn with_covers<I, K, V>(covers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { covers: covers.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl CoverResolver for FixedResolver {
    fn cover_url(&self, oapen_id: &str) -> Result<String, ResolveError> {
        self.covers.get(oapen_id).cloned().ok_or_else(|| ResolveError {
            oapen_id: oapen_id.to_string(),
            reason: "no cover known for this resource id".to_string(),
        })
    }
}

/// Error type for a failed enrichment run.
///
/// Whichever layer fails first aborts the run; this is a one-shot batch
/// with no retries and no partial-result recovery.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Cache(#[from] covercache_core::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Summary of one enrichment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Books seen in the metadata CSV.
    pub books: u64,
    /// Books whose cover URL was already cached.
    pub cache_hits: u64,
    /// Books freshly resolved and stored this run.
    pub resolved: u64,
    /// Rows excluded by the inclusion rule.
    pub skipped: u64,
}

/// Walk the metadata rows and ensure every OAPEN-hosted book has a cached
/// cover URL.
///
/// Per book: point lookup by DOI; on a miss the resolver is consulted and
/// the result stored before moving on. Storing only ever happens after a
/// miss, so [`covercache_core::Error::DuplicateKey`] escaping this loop
/// indicates a logic error rather than ordinary operation.
pub fn enrich<R: CoverResolver>(
    records: BookRecords,
    cache: &CoverCache,
    resolver: &R,
) -> Result<EnrichReport, EnrichError> {
    let mut report = EnrichReport::default();

    for outcome in records {
        match outcome? {
            RowOutcome::Skipped(_) => report.skipped += 1,
            RowOutcome::Book(book) => {
                report.books += 1;
                match cache.lookup(&book.doi)? {
                    Some(_) => report.cache_hits += 1,
                    None => {
                        let cover = resolver.cover_url(&book.oapen_id)?;
                        cache.store(&book.doi, &cover)?;
                        report.resolved += 1;
                    }
                }
            }
        }
    }

    tracing::info!(
        books = report.books,
        cache_hits = report.cache_hits,
        resolved = report.resolved,
        skipped = report.skipped,
        "enrichment run finished"
    );

    Ok(report)
}
