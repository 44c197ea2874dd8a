//! SQLite-backed cache for resolved cover-image URLs.
//!
//! This module provides the persistent DOI → cover-URL memoization store.
//! It supports:
//!
//! - Lazy schema initialization on first open of a missing file
//! - WAL mode with the standard pragma block
//! - Point lookup (a miss is a value, not an error) and point insert
//!   (duplicate keys fail; entries are never overwritten)

pub mod connection;
pub mod covers;
pub mod migrations;

pub use crate::Error;

pub use connection::CoverCache;
