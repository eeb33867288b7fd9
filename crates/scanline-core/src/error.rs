//! # Error Types
//!
//! Domain-specific error types for scanline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  scanline-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Catalog/input validation failures              │
//! │                                                                         │
//! │  scanline-store errors (separate crate)                                │
//! │  ├── StoreError       - Persistence failures                           │
//! │  └── ExportError      - Export-file failures                           │
//! │                                                                         │
//! │  scanline-vision errors (separate crate)                               │
//! │  ├── VisionError      - Model load / inference failures                │
//! │  └── CameraError      - Capture access failures                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (label, id, etc.)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No catalog product carries the given classifier label.
    #[error("No product registered for label: {0}")]
    UnknownLabel(String),

    /// A cart item id was not found in the cart.
    #[error("Cart item not found: {0}")]
    ItemNotFound(u64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog and input validation errors.
///
/// Used for early validation before business logic runs - mainly when
/// assembling the product catalog at startup.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Confidence values live in [0, 1].
    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    OutOfUnitRange { field: String, value: f32 },

    /// Duplicate value (e.g., duplicate classifier label).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Value is reserved and may not be used.
    #[error("{field} '{value}' is reserved")]
    Reserved { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownLabel("soda".to_string());
        assert_eq!(err.to_string(), "No product registered for label: soda");

        let err = CoreError::ItemNotFound(42);
        assert_eq!(err.to_string(), "Cart item not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "classifier_label".to_string(),
        };
        assert_eq!(err.to_string(), "classifier_label is required");

        let err = ValidationError::Duplicate {
            field: "classifier_label".to_string(),
            value: "caffee".to_string(),
        };
        assert_eq!(err.to_string(), "classifier_label 'caffee' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
