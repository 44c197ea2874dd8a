//! Core types and shared functionality for covercache.
//!
//! This crate provides:
//! - Cover cache implementation with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::CoverCache;
pub use config::AppConfig;
pub use error::Error;
