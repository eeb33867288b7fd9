//! # Storage Error Types
//!
//! Typed errors for the persistence and export layers.
//!
//! ## Design Principles
//! 1. Errors are enum variants, never String at the boundary
//! 2. Each variant carries enough context to log usefully
//! 3. Callers decide severity: a failed stats load degrades to defaults,
//!    a failed export is reported to the operator once

use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open or create the database.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A query failed at runtime.
    #[error("Database query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    /// A persisted blob could not be serialized or deserialized.
    ///
    /// Readers treat this as "record absent" and fall back to defaults;
    /// the variant exists so writers can still report it.
    #[error("Persisted value for '{key}' is not valid JSON: {reason}")]
    CorruptValue { key: String, reason: String },
}

// =============================================================================
// Export Error
// =============================================================================

/// Export-artifact failures. Reported once to the caller; never retried
/// automatically.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Refusing to produce a zero-item order file.
    #[error("Cart is empty - nothing to export")]
    EmptyCart,

    /// Payload serialization failed.
    #[error("Failed to serialize export payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing or renaming the artifact failed.
    #[error("Failed to write export file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
