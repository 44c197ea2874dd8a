//! Unified error types for covercache.

use std::path::PathBuf;

/// Unified error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The cache file could not be opened or created.
    #[error("cannot open cover cache at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Database operation failed.
    #[error("cover cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Schema initialization failed to apply.
    #[error("schema initialization failed: {0}")]
    MigrationFailed(String),

    /// A cover is already cached under this key; entries are never
    /// overwritten. Hitting this means the caller skipped its lookup.
    #[error("cover already cached for {key}")]
    DuplicateKey { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::DuplicateKey { key: "10.21983/P3.0001.1.00".to_string() };
        assert!(err.to_string().contains("already cached"));
        assert!(err.to_string().contains("10.21983/P3.0001.1.00"));
    }

    #[test]
    fn test_open_error_carries_path() {
        let err = Error::Open {
            path: PathBuf::from("/no/such/dir/cache.sqlite"),
            source: rusqlite::Error::InvalidQuery,
        };
        assert!(err.to_string().contains("/no/such/dir/cache.sqlite"));
    }
}
