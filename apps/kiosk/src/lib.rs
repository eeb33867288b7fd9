//! # Scanline Kiosk Library
//!
//! Core library for the Scanline POS kiosk application.
//!
//! ## Module Organization
//! ```text
//! scanline_kiosk_lib/
//! ├── lib.rs          ◄─── You are here (exports + logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state (Arc<Mutex<Cart>>)
//! │   └── config.rs   ◄─── Kiosk configuration
//! ├── session.rs      ◄─── Checkout session coordinator
//! ├── render.rs       ◄─── Pure rendering projections
//! └── error.rs        ◄─── Unified application error
//! ```
//!
//! ## Startup Sequence (performed by main.rs)
//! 1. Initialize tracing (logging)
//! 2. Load configuration (defaults + SCANLINE_* env overrides)
//! 3. Open the store & run migrations
//! 4. Load the classifier model (explicit, user-visible on failure)
//! 5. Wire CartState + StatsRepository + Exporter into a CheckoutSession
//! 6. Start the poller and feed its batches into the session

pub mod error;
pub mod render;
pub mod session;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=scanline=trace` - Trace for scanline crates only
/// - Default: INFO level, with sqlx chatter reduced
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scanline=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
