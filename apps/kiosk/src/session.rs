//! # Checkout Session
//!
//! The coordinating layer between detection batches and the sales flow.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Session Flow                              │
//! │                                                                         │
//! │  Poller batch ──► handle_detections()                                   │
//! │                     │  for each detection:                              │
//! │                     │    cart.add_item(product, confidence)             │
//! │                     │  stats.record_scan(n)      (persisted)            │
//! │                                                                         │
//! │  Operator ───────► checkout()                                           │
//! │                     │  snapshot cart (empty ⇒ refuse, nothing written)  │
//! │                     │  export order file                                │
//! │                     │  stats.record_order(total) (persisted)            │
//! │                     │  cart.clear()                                     │
//! │                     └─► CheckoutReceipt                                 │
//! │                                                                         │
//! │  The cart itself never touches stats or disk - that separation is      │
//! │  exactly why this coordinator exists.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::KioskResult;
use crate::state::CartState;
use scanline_core::{CartItem, CartSnapshot, Detection, Money, StatsRecord};
use scanline_store::{Exporter, StatsRepository};

// =============================================================================
// Checkout Receipt
// =============================================================================

/// What a completed checkout hands back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    /// Id of the exported order.
    pub order_id: String,

    /// Where the order artifact landed.
    pub export_path: PathBuf,

    /// Order total.
    pub total: Money,

    /// Number of items sold.
    pub items_count: usize,

    /// Counters after the order was recorded.
    pub stats: StatsRecord,
}

// =============================================================================
// Checkout Session
// =============================================================================

/// Coordinates cart, stats and exports for one kiosk session.
///
/// All dependencies are constructor-injected; the session owns no
/// process-wide state.
pub struct CheckoutSession {
    cart: CartState,
    stats: StatsRepository,
    exporter: Exporter,
}

impl CheckoutSession {
    /// Wires a session from its parts.
    pub fn new(cart: CartState, stats: StatsRepository, exporter: Exporter) -> Self {
        CheckoutSession {
            cart,
            stats,
            exporter,
        }
    }

    /// The shared cart handle.
    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Current cart snapshot, for rendering.
    pub fn cart_snapshot(&self) -> CartSnapshot {
        self.cart.with_cart(|cart| cart.snapshot())
    }

    /// Adds a detection batch to the cart and records the scans.
    ///
    /// Returns the created cart items (empty for an empty batch). Stats
    /// are updated here, by the coordinator - the cart knows nothing
    /// about them.
    pub async fn handle_detections(&self, batch: &[Detection]) -> KioskResult<Vec<CartItem>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let added: Vec<CartItem> = self.cart.with_cart_mut(|cart| {
            batch
                .iter()
                .map(|d| cart.add_item(&d.product, Some(d.confidence)))
                .collect()
        });

        self.stats.record_scan(added.len() as u64).await?;
        debug!(added = added.len(), "Detections added to cart");
        Ok(added)
    }

    /// Completes the current order.
    ///
    /// Snapshot → export → record order → clear cart, in that order: an
    /// empty cart is refused before anything is written, and the counters
    /// only move once the artifact exists.
    pub async fn checkout(&self) -> KioskResult<CheckoutReceipt> {
        let snapshot = self.cart_snapshot();
        let receipt = self.exporter.export_order(&snapshot)?;
        let stats = self.stats.record_order(snapshot.total).await?;
        self.cart.with_cart_mut(|cart| cart.clear());

        info!(
            order_id = %receipt.export_id,
            total = %snapshot.total,
            items = snapshot.item_count(),
            "Order completed"
        );

        Ok(CheckoutReceipt {
            order_id: receipt.export_id,
            export_path: receipt.path,
            total: snapshot.total,
            items_count: snapshot.items.len(),
            stats,
        })
    }

    /// Removes a cart line by id. Returns whether anything was removed.
    pub fn remove_item(&self, item_id: u64) -> bool {
        self.cart.with_cart_mut(|cart| cart.remove_item(item_id))
    }

    /// Current persisted counters.
    pub async fn stats(&self) -> KioskResult<StatsRecord> {
        Ok(self.stats.load().await?)
    }

    /// Zeroes the persisted counters.
    pub async fn reset_stats(&self) -> KioskResult<StatsRecord> {
        Ok(self.stats.reset().await?)
    }

    /// Exports the aggregate session snapshot.
    pub async fn export_session(&self) -> KioskResult<PathBuf> {
        let stats = self.stats.load().await?;
        let receipt = self.exporter.export_session(&stats)?;
        Ok(receipt.path)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KioskError;
    use scanline_core::{BoundingBox, Catalog};
    use scanline_store::{ExportError, Store, StoreConfig};

    async fn session(export_dir: &std::path::Path) -> CheckoutSession {
        let store = Store::connect(StoreConfig::in_memory()).await.unwrap();
        CheckoutSession::new(CartState::new(), store.stats(), Exporter::new(export_dir))
    }

    fn detection(label: &str, confidence: f32) -> Detection {
        let catalog = Catalog::reference();
        let product = catalog.match_label(label).unwrap().clone();
        Detection {
            label: product.classifier_label.clone(),
            product,
            confidence,
            bounding_box: BoundingBox::centered(640, 480),
        }
    }

    #[tokio::test]
    async fn test_detections_land_in_cart_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        let batch = vec![detection("caffee", 0.82), detection("water", 0.91)];
        let added = session.handle_detections(&batch).await.unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(session.cart_snapshot().total.centimes(), 13_000);
        assert_eq!(session.stats().await.unwrap().items_scanned, 2);

        // An empty batch changes nothing.
        session.handle_detections(&[]).await.unwrap();
        assert_eq!(session.stats().await.unwrap().items_scanned, 2);
    }

    #[tokio::test]
    async fn test_checkout_230_da_order() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        // coffee + water + coffee = 100 + 30 + 100 = 230.00 DA
        session
            .handle_detections(&[
                detection("caffee", 0.82),
                detection("water", 0.91),
                detection("caffee", 0.77),
            ])
            .await
            .unwrap();

        let receipt = session.checkout().await.unwrap();

        assert_eq!(receipt.total.centimes(), 23_000);
        assert_eq!(receipt.items_count, 3);
        assert_eq!(receipt.stats.orders_completed, 1);
        assert_eq!(receipt.stats.total_revenue.centimes(), 23_000);
        assert!(receipt.export_path.exists());

        // The cart is cleared by checkout.
        assert!(session.cart_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        let err = session.checkout().await.unwrap_err();
        assert!(matches!(
            err,
            KioskError::Export(ExportError::EmptyCart)
        ));

        // Nothing was recorded and nothing was written.
        let stats = session.stats().await.unwrap();
        assert_eq!(stats.orders_completed, 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_revenue_accumulates_across_orders() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        session
            .handle_detections(&[detection("caffee", 0.9)])
            .await
            .unwrap();
        session.checkout().await.unwrap();

        session
            .handle_detections(&[detection("water", 0.8)])
            .await
            .unwrap();
        let receipt = session.checkout().await.unwrap();

        assert_eq!(receipt.stats.orders_completed, 2);
        // 100.00 + 30.00 DA
        assert_eq!(receipt.stats.total_revenue.centimes(), 13_000);
    }

    #[tokio::test]
    async fn test_remove_item_before_checkout() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        let added = session
            .handle_detections(&[detection("caffee", 0.9), detection("water", 0.8)])
            .await
            .unwrap();

        assert!(session.remove_item(added[0].id));
        assert!(!session.remove_item(added[0].id));

        let receipt = session.checkout().await.unwrap();
        assert_eq!(receipt.total.centimes(), 3_000);
        assert_eq!(receipt.items_count, 1);
    }

    #[tokio::test]
    async fn test_export_session_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path()).await;

        session
            .handle_detections(&[detection("caffee", 0.9)])
            .await
            .unwrap();
        session.checkout().await.unwrap();

        let path = session.export_session().await.unwrap();
        let json = std::fs::read_to_string(path).unwrap();
        assert!(json.contains("\"ordersCompleted\": 1"));
    }
}
