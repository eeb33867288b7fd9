//! # Export Module
//!
//! JSON export artifacts: one file per completed order, plus an aggregate
//! session snapshot.
//!
//! ## No Partial Files
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Export Write Path                                  │
//! │                                                                         │
//! │  serialize payload ──► write  <name>.json.tmp  ──► rename to           │
//! │        │                        │                   <name>.json         │
//! │        │ error                  │ error                                 │
//! │        ▼                        ▼                                       │
//! │   report once,             remove tmp,                                  │
//! │   nothing written          report once                                  │
//! │                                                                         │
//! │  The final path either contains a complete artifact or does not        │
//! │  exist. Exports are never retried automatically.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;
use scanline_core::{CartItem, CartSnapshot, StatsRecord};

// =============================================================================
// Export Payloads
// =============================================================================

/// A completed order, as written to disk.
///
/// Write-once artifact; not retained in memory after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderExport {
    /// Unique order id (timestamp plus sub-second suffix).
    pub order_id: String,

    /// When the order was completed.
    pub timestamp: DateTime<Utc>,

    /// Item snapshots, in scan order.
    pub items: Vec<CartItem>,

    /// Order total in centimes.
    pub total_centimes: i64,

    /// Number of items.
    pub items_count: usize,
}

/// Aggregate session snapshot, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionExport {
    /// When the export was taken.
    pub export_timestamp: DateTime<Utc>,

    /// Counters at export time.
    pub stats: StatsRecord,
}

/// What the caller gets back from a successful export.
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    /// Id of the exported artifact (order id, or the session file stem).
    pub export_id: String,

    /// Where the artifact landed.
    pub path: PathBuf,
}

// =============================================================================
// Exporter
// =============================================================================

/// Writes export artifacts into a fixed directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Creates an exporter rooted at `dir`. The directory is created on
    /// first use, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Exporter { dir: dir.into() }
    }

    /// Export directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Exports a completed order.
    ///
    /// An empty snapshot is refused with [`ExportError::EmptyCart`] -
    /// a zero-item order file is never produced.
    pub fn export_order(&self, snapshot: &CartSnapshot) -> Result<ExportReceipt, ExportError> {
        if snapshot.is_empty() {
            return Err(ExportError::EmptyCart);
        }

        let order_id = generate_order_id();
        let payload = OrderExport {
            order_id: order_id.clone(),
            timestamp: snapshot.taken_at,
            items: snapshot.items.clone(),
            total_centimes: snapshot.total.centimes(),
            items_count: snapshot.items.len(),
        };

        let path = self.write_json(&format!("order-{order_id}.json"), &payload)?;
        info!(order_id = %order_id, path = %path.display(), items = payload.items_count, "Order exported");

        Ok(ExportReceipt {
            export_id: order_id,
            path,
        })
    }

    /// Exports the aggregate session snapshot.
    pub fn export_session(&self, stats: &StatsRecord) -> Result<ExportReceipt, ExportError> {
        let export_timestamp = Utc::now();
        let stem = format!("session-{}", export_timestamp.format("%y%m%d-%H%M%S"));
        let payload = SessionExport {
            export_timestamp,
            stats: *stats,
        };

        let path = self.write_json(&format!("{stem}.json"), &payload)?;
        info!(path = %path.display(), "Session stats exported");

        Ok(ExportReceipt {
            export_id: stem,
            path,
        })
    }

    /// Serializes `payload` and writes it under `file_name` via a temp
    /// file and an atomic rename, so the final path never holds a partial
    /// artifact.
    fn write_json<T: Serialize>(
        &self,
        file_name: &str,
        payload: &T,
    ) -> Result<PathBuf, ExportError> {
        // Serialize before touching the filesystem.
        let json = serde_json::to_string_pretty(payload)?;

        fs::create_dir_all(&self.dir).map_err(|e| ExportError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let final_path = self.dir.join(file_name);
        let tmp_path = self.dir.join(format!("{file_name}.tmp"));

        if let Err(e) = fs::write(&tmp_path, &json) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ExportError::Io {
                path: tmp_path.display().to_string(),
                source: e,
            });
        }

        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ExportError::Io {
                path: final_path.display().to_string(),
                source: e,
            });
        }

        Ok(final_path)
    }
}

/// Generates an order id: UTC timestamp plus a sub-second suffix.
///
/// Collision probability is negligible but not zero, which is acceptable
/// for kiosk export files.
fn generate_order_id() -> String {
    let now = Utc::now();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let suffix: u16 = (nanos % 10_000) as u16;
    format!("{}-{:04}", now.format("%y%m%d-%H%M%S"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use scanline_core::{Cart, Catalog};

    fn full_cart() -> CartSnapshot {
        let catalog = Catalog::reference();
        let coffee = catalog.match_label("caffee").unwrap();
        let water = catalog.match_label("water").unwrap();

        let mut cart = Cart::new();
        cart.add_item(coffee, Some(0.82));
        cart.add_item(water, Some(0.91));
        cart.add_item(coffee, None);
        cart.snapshot()
    }

    #[test]
    fn test_export_order_writes_parseable_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let snapshot = full_cart();
        let receipt = exporter.export_order(&snapshot).unwrap();

        assert!(receipt.path.exists());
        let json = fs::read_to_string(&receipt.path).unwrap();
        let back: OrderExport = serde_json::from_str(&json).unwrap();

        assert_eq!(back.order_id, receipt.export_id);
        assert_eq!(back.items_count, 3);
        // 100 + 30 + 100 = 230 DA
        assert_eq!(back.total_centimes, 23_000);
        assert_eq!(back.items.len(), 3);
    }

    #[test]
    fn test_export_empty_cart_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let empty = Cart::new().snapshot();
        let err = exporter.export_order(&empty).unwrap_err();
        assert!(matches!(err, ExportError::EmptyCart));

        // No file of any kind was produced.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_session_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let mut stats = StatsRecord::new();
        stats.record_scan(4);
        stats.record_order(scanline_core::Money::from_centimes(23_000));

        let receipt = exporter.export_session(&stats).unwrap();
        let json = fs::read_to_string(&receipt.path).unwrap();
        let back: SessionExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats, stats);
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // Point the exporter at a path that exists as a FILE, so
        // create_dir_all fails.
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let exporter = Exporter::new(&blocker);
        let err = exporter.export_order(&full_cart()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));

        // The blocking file is untouched and no .tmp/.json appeared
        // anywhere beside it.
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_no_tmp_residue_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        exporter.export_order(&full_cart()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
