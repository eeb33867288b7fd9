//! # Stats Module
//!
//! Session counters: items scanned, orders completed, total revenue.
//!
//! The record itself is pure data with pure mutations. Durability is the
//! store layer's job: it loads the record at startup (falling back to
//! zeros on missing or corrupt data) and rewrites it after every mutation.
//!
//! ## Revenue Invariant
//! `total_revenue` only ever increases, by exactly the completed order's
//! total, at order completion. `reset()` is the single exception and is an
//! explicit operator action.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Stats Record
// =============================================================================

/// Persisted session counters.
///
/// ## Corruption Tolerance
/// Every field carries `#[serde(default)]`, so a persisted blob with
/// missing fields still deserializes - absent counters come back as zero
/// instead of failing the whole load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Items added to carts by successful detections.
    #[serde(default)]
    pub items_scanned: u64,

    /// Completed (checked-out) orders.
    #[serde(default)]
    pub orders_completed: u64,

    /// Revenue across all completed orders.
    #[serde(default)]
    pub total_revenue: Money,
}

impl StatsRecord {
    /// A zeroed record.
    pub fn new() -> Self {
        StatsRecord::default()
    }

    /// Records `count` scanned items.
    pub fn record_scan(&mut self, count: u64) {
        self.items_scanned += count;
    }

    /// Records a completed order with the given total.
    ///
    /// Increments `orders_completed` by one and `total_revenue` by exactly
    /// `order_total`.
    pub fn record_order(&mut self, order_total: Money) {
        self.orders_completed += 1;
        self.total_revenue += order_total;
    }

    /// Zeroes all counters.
    pub fn reset(&mut self) {
        *self = StatsRecord::default();
    }

    /// True when every counter is zero.
    pub fn is_zeroed(&self) -> bool {
        *self == StatsRecord::default()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_scan_accumulates() {
        let mut stats = StatsRecord::new();
        stats.record_scan(1);
        stats.record_scan(2);
        assert_eq!(stats.items_scanned, 3);
        assert_eq!(stats.orders_completed, 0);
        assert_eq!(stats.total_revenue, Money::zero());
    }

    #[test]
    fn test_record_order_adds_exact_total() {
        let mut stats = StatsRecord::new();
        stats.record_order(Money::from_centimes(23_000));
        stats.record_order(Money::from_centimes(3_000));

        assert_eq!(stats.orders_completed, 2);
        assert_eq!(stats.total_revenue.centimes(), 26_000);
    }

    #[test]
    fn test_revenue_equals_sum_of_order_totals() {
        let totals = [13_000_i64, 23_000, 10_000, 3_000];
        let mut stats = StatsRecord::new();
        for t in totals {
            stats.record_order(Money::from_centimes(t));
        }
        assert_eq!(stats.orders_completed, totals.len() as u64);
        assert_eq!(stats.total_revenue.centimes(), totals.iter().sum::<i64>());
    }

    #[test]
    fn test_reset() {
        let mut stats = StatsRecord::new();
        stats.record_scan(5);
        stats.record_order(Money::from_centimes(10_000));
        stats.reset();
        assert!(stats.is_zeroed());
    }

    #[test]
    fn test_partial_json_defaults_missing_fields() {
        // A blob persisted by an older build (or half-corrupted) still
        // loads, with absent counters defaulting to zero.
        let stats: StatsRecord = serde_json::from_str(r#"{"itemsScanned": 7}"#).unwrap();
        assert_eq!(stats.items_scanned, 7);
        assert_eq!(stats.orders_completed, 0);
        assert_eq!(stats.total_revenue, Money::zero());
    }

    #[test]
    fn test_round_trip() {
        let mut stats = StatsRecord::new();
        stats.record_scan(4);
        stats.record_order(Money::from_centimes(23_000));

        let json = serde_json::to_string(&stats).unwrap();
        let back: StatsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
