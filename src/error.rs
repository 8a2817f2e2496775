//! Error handling for the datatable query engine
//!
//! This module provides idiomatic Rust error types using thiserror. Storage
//! failures are wrapped once at the crate boundary and propagated unchanged;
//! the engine never retries a failed query.

use thiserror::Error;

/// Main error type for datatable queries
#[derive(Error, Debug)]
pub enum DatatableError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
