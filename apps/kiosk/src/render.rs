//! # Rendering Projections
//!
//! Pure functions from snapshots to display strings. Business operations
//! return plain data; these projections are the only place that data is
//! turned into something for the operator to look at, which keeps every
//! other layer headless-testable.

use crate::session::CheckoutReceipt;
use crate::state::KioskConfig;
use scanline_core::{CartSnapshot, Detection, StatsRecord};

/// Renders a detection batch as one line per event.
pub fn render_detections(batch: &[Detection], config: &KioskConfig) -> String {
    if batch.is_empty() {
        return "  (nothing recognized)".to_string();
    }

    batch
        .iter()
        .map(|d| {
            format!(
                "  + {} {} — {} ({:.0}%)",
                d.product.names.primary,
                d.product.names.secondary,
                config.format_currency(d.product.price),
                d.confidence * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the current cart with line ids and the running total.
pub fn render_cart(snapshot: &CartSnapshot, config: &KioskConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("Cart ({} items)\n", snapshot.item_count()));

    for item in &snapshot.items {
        out.push_str(&format!(
            "  [{}] {} {} — {}\n",
            item.id,
            item.names.primary,
            item.names.secondary,
            config.format_currency(item.price)
        ));
    }

    out.push_str(&format!("Total: {}", config.format_currency(snapshot.total)));
    out
}

/// Renders a completed-order receipt.
pub fn render_receipt(receipt: &CheckoutReceipt, config: &KioskConfig) -> String {
    format!(
        "{}\nOrder {} — {} items\nTotal: {}\nSaved to: {}",
        config.store_name,
        receipt.order_id,
        receipt.items_count,
        config.format_currency(receipt.total),
        receipt.export_path.display()
    )
}

/// Renders the persisted counters.
pub fn render_stats(stats: &StatsRecord, config: &KioskConfig) -> String {
    format!(
        "Items scanned:    {}\nOrders completed: {}\nTotal revenue:    {}",
        stats.items_scanned,
        stats.orders_completed,
        config.format_currency(stats.total_revenue)
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
