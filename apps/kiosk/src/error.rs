//! # Kiosk Error Type
//!
//! Unified error for the session layer: every lower-layer failure funnels
//! into one type the binary can report.
//!
//! ```text
//! StoreError ──┐
//!              ┼──► KioskError ──► main.rs (anyhow context + exit code)
//! ExportError ─┘
//! ```
//!
//! Vision errors stay out of this type on purpose: the session never
//! talks to the classifier - the binary wires poller output into it and
//! reports vision failures directly.

use thiserror::Error;

use scanline_store::{ExportError, StoreError};

/// Application-level error for session operations.
#[derive(Debug, Error)]
pub enum KioskError {
    /// Persistence failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Export failed (including the empty-cart refusal).
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Convenience alias for session results.
pub type KioskResult<T> = Result<T, KioskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_keeps_its_message() {
        let err: KioskError = ExportError::EmptyCart.into();
        assert!(err.to_string().contains("Cart is empty"));
    }
}
