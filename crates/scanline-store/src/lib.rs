//! # scanline-store: Persistence Layer for Scanline POS
//!
//! Everything that touches disk lives here:
//!
//! - [`db`] - SQLite connection pool and the `kv_store` table that holds
//!   the persisted stats record
//! - [`repository`] - typed access to persisted records
//! - [`export`] - JSON export artifacts for completed orders and session
//!   snapshots
//! - [`error`] - storage and export error types
//!
//! ## Failure Policy
//! Persistence failures never take the kiosk down: reads fall back to
//! defaults (a fresh stats record), writes surface a typed [`StoreError`]
//! the caller can log and move past. Export failures are reported once
//! with a reason and leave no partial file behind.

pub mod db;
pub mod error;
pub mod export;
mod migrations;
pub mod repository;

pub use db::{Store, StoreConfig};
pub use error::{ExportError, StoreError, StoreResult};
pub use export::{ExportReceipt, Exporter, OrderExport, SessionExport};
pub use repository::stats::StatsRepository;
