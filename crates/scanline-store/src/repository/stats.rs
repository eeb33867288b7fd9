//! # Stats Repository
//!
//! Durable storage for the single [`StatsRecord`].
//!
//! ## Persistence Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stats Persistence                                    │
//! │                                                                         │
//! │  kv_store table                                                         │
//! │  ┌──────────────────┬─────────────────────────────────┬─────────────┐  │
//! │  │ key              │ value                           │ updated_at  │  │
//! │  ├──────────────────┼─────────────────────────────────┼─────────────┤  │
//! │  │ "scanline_stats" │ {"itemsScanned":12,...}         │ 2026-08-... │  │
//! │  └──────────────────┴─────────────────────────────────┴─────────────┘  │
//! │                                                                         │
//! │  Every mutation is read-modify-write of the full record, then an       │
//! │  upsert of the whole JSON blob (last-writer-wins; the kiosk is         │
//! │  single-process).                                                       │
//! │                                                                         │
//! │  Load failures (missing row, corrupt JSON) are logged and degrade      │
//! │  to a zeroed record - stats must never block the sales flow.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::StoreResult;
use scanline_core::{Money, StatsRecord};

/// The single key the stats record is persisted under.
pub const STATS_KEY: &str = "scanline_stats";

/// Repository for the persisted stats record.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository over the shared pool.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Loads the persisted record.
    ///
    /// Missing row or corrupt JSON is NOT fatal: both degrade to a zeroed
    /// record with a warning, and the kiosk keeps selling.
    pub async fn load(&self) -> StoreResult<StatsRecord> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM kv_store WHERE key = ?1")
                .bind(STATS_KEY)
                .fetch_optional(&self.pool)
                .await?;

        let record = match row {
            Some((json,)) => match serde_json::from_str::<StatsRecord>(&json) {
                Ok(record) => record,
                Err(e) => {
                    warn!(key = STATS_KEY, error = %e, "Corrupt stats record, falling back to zeros");
                    StatsRecord::default()
                }
            },
            None => {
                debug!(key = STATS_KEY, "No persisted stats, starting from zeros");
                StatsRecord::default()
            }
        };

        Ok(record)
    }

    /// Persists the full record (upsert of the whole JSON blob).
    pub async fn save(&self, record: &StatsRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record).map_err(|e| {
            crate::error::StoreError::CorruptValue {
                key: STATS_KEY.to_string(),
                reason: e.to_string(),
            }
        })?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(STATS_KEY)
        .bind(&json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = STATS_KEY, "Stats persisted");
        Ok(())
    }

    /// Records scanned items: read-modify-write, persisted immediately.
    /// Returns the updated record.
    pub async fn record_scan(&self, count: u64) -> StoreResult<StatsRecord> {
        let mut record = self.load().await?;
        record.record_scan(count);
        self.save(&record).await?;
        Ok(record)
    }

    /// Records a completed order: read-modify-write, persisted immediately.
    /// Returns the updated record.
    pub async fn record_order(&self, order_total: Money) -> StoreResult<StatsRecord> {
        let mut record = self.load().await?;
        record.record_order(order_total);
        self.save(&record).await?;
        Ok(record)
    }

    /// Zeroes all counters and persists.
    pub async fn reset(&self) -> StoreResult<StatsRecord> {
        let record = StatsRecord::default();
        self.save(&record).await?;
        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
