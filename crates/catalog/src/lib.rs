//! Publisher metadata ingestion and OAPEN catalog identifiers.
//!
//! This crate provides:
//! - OAPEN resource-id extraction from catalog URLs
//! - Streaming of book records from a metadata CSV, with the fixed
//!   inclusion rule and both row-exclusion strategies
//! - The cover resolution seam and the batch enrichment loop

pub mod oapen;
pub mod records;
pub mod resolve;

pub use oapen::{OapenError, resource_id};
pub use records::{BookRecord, BookRecords, RowError, RowOutcome, RowPolicy, SkipReason};
pub use resolve::{CoverResolver, EnrichError, EnrichReport, FixedResolver, ResolveError, enrich};
