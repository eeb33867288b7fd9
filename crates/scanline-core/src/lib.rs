//! # scanline-core: Pure Business Logic for Scanline POS
//!
//! This crate is the **heart** of Scanline POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scanline POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Kiosk Application (CLI)                      │   │
//! │  │    Poll loop ──► Checkout session ──► Rendering projection     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ scanline-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  catalog  │  │   cart    │  │   stats   │  │   │
//! │  │   │   Money   │  │  Product  │  │   Cart    │  │StatsRecord│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                       ┌───────────┐                            │   │
//! │  │                       │ detection │                            │   │
//! │  │                       │ Detection │                            │   │
//! │  │                       └───────────┘                            │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO INFERENCE • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     scanline-store (SQLite, exports)  scanline-vision (ONNX)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Product table and classifier-label matching
//! - [`cart`] - Cart, cart items, snapshots
//! - [`stats`] - Session counters persisted by the store layer
//! - [`detection`] - Detection events and the cosmetic bounding box
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, model runtime and file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in centimes (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod detection;
pub mod error;
pub mod money;
pub mod stats;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use scanline_core::Money` instead of
// `use scanline_core::money::Money`

pub use cart::{Cart, CartItem, CartSnapshot};
pub use catalog::{Catalog, DisplayNames, Product};
pub use detection::{BoundingBox, Detection};
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use stats::StatsRecord;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum winning-class probability for a classification to count as a
/// detection. Anything below this is treated as "nothing recognizable in
/// frame".
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Classifier label that means "no product in frame". Always excluded from
/// detection results, no matter how confident the model is.
pub const EMPTY_LABEL: &str = "empty";

/// Side of the cosmetic bounding box, as a fraction of the shorter frame
/// dimension. The classifier produces no localization; the box is drawn
/// centered purely for display.
pub const BOX_RATIO: f32 = 0.6;
