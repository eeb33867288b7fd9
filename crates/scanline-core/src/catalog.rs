//! # Catalog Module
//!
//! The fixed mapping from classifier labels to sellable products.
//!
//! ## Label Matching
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Classifier Label → Product                          │
//! │                                                                         │
//! │  Classifier output        Catalog                                      │
//! │  ─────────────────        ───────                                      │
//! │  "caffee"  0.82  ───────► Café / قهوة   @ 100.00 DA                    │
//! │  "water"   0.91  ───────► Eau  / ماء    @  30.00 DA                    │
//! │  "empty"   0.97  ───────► (excluded, never a product)                  │
//! │  "Caffee " 0.70  ───────► Café (match is trimmed + case-insensitive)   │
//! │  "soda"    0.88  ───────► no match ⇒ no detection                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog is fixed and small, built once at startup, and validated on
//! construction. The classifier also recognizes the non-product label
//! [`crate::EMPTY_LABEL`], which may never name a product.

use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::EMPTY_LABEL;

// =============================================================================
// Display Names
// =============================================================================

/// Bilingual display names for a product.
///
/// The reference deployment shows a Latin-script primary name and an
/// Arabic-script secondary name on the same ticket line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNames {
    /// Primary display name (receipt line, cart rows).
    pub primary: String,

    /// Secondary display name (localized).
    pub secondary: String,
}

impl DisplayNames {
    /// Creates a display-name pair.
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        DisplayNames {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Immutable once the catalog is built. `classifier_label` is the class
/// name the model was trained with, which is the join key between the
/// vision side and the sales side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Small integer identifier, unique within the catalog.
    pub id: u32,

    /// Display names shown in the cart and on exports.
    pub names: DisplayNames,

    /// Unit price.
    pub price: Money,

    /// Classifier class name this product is sold under (stored trimmed,
    /// lowercase).
    pub classifier_label: String,
}

impl Product {
    /// Returns the unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The fixed product-to-label mapping.
///
/// ## Invariants (enforced by [`Catalog::new`])
/// - labels are unique after trimming and lowercasing
/// - no label is blank
/// - no product is registered under the excluded [`EMPTY_LABEL`]
/// - all prices are positive
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a validated catalog from a product list.
    ///
    /// Labels are normalized (trimmed, lowercased) on the way in so that
    /// lookup is a plain equality check.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut normalized: Vec<Product> = Vec::with_capacity(products.len());

        for mut product in products {
            let label = product.classifier_label.trim().to_lowercase();

            if label.is_empty() {
                return Err(ValidationError::Required {
                    field: "classifier_label".to_string(),
                }
                .into());
            }
            if label == EMPTY_LABEL {
                return Err(ValidationError::Reserved {
                    field: "classifier_label".to_string(),
                    value: label,
                }
                .into());
            }
            if normalized.iter().any(|p| p.classifier_label == label) {
                return Err(ValidationError::Duplicate {
                    field: "classifier_label".to_string(),
                    value: label,
                }
                .into());
            }
            if !product.price.is_positive() {
                return Err(ValidationError::MustBePositive {
                    field: "price".to_string(),
                }
                .into());
            }

            product.classifier_label = label;
            normalized.push(product);
        }

        Ok(Catalog {
            products: normalized,
        })
    }

    /// Resolves a classifier label to a product.
    ///
    /// Matching is case-insensitive and trim-insensitive exact match:
    /// `"Caffee "` and `"caffee"` both resolve to the coffee product.
    /// Unmatched labels (including [`EMPTY_LABEL`]) yield `None`.
    pub fn match_label(&self, label: &str) -> Option<&Product> {
        let needle = label.trim().to_lowercase();
        self.products
            .iter()
            .find(|p| p.classifier_label == needle)
    }

    /// Looks a product up by its id.
    pub fn product_by_id(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of sellable products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The reference deployment catalog: coffee and water, priced in DA.
    ///
    /// The classifier behind this catalog recognizes three classes -
    /// `caffee`, `water` and the excluded `empty`.
    pub fn reference() -> Self {
        Catalog::new(vec![
            Product {
                id: 1,
                names: DisplayNames::new("Café", "قهوة"),
                price: Money::from_centimes(10_000), // 100.00 DA
                classifier_label: "caffee".to_string(),
            },
            Product {
                id: 2,
                names: DisplayNames::new("Eau", "ماء"),
                price: Money::from_centimes(3_000), // 30.00 DA
                classifier_label: "water".to_string(),
            },
        ])
        .expect("reference catalog is statically valid")
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_catalog() {
        let catalog = Catalog::reference();
        assert_eq!(catalog.len(), 2);

        let coffee = catalog.match_label("caffee").unwrap();
        assert_eq!(coffee.price.centimes(), 10_000);
        assert_eq!(coffee.names.primary, "Café");

        let water = catalog.match_label("water").unwrap();
        assert_eq!(water.price.centimes(), 3_000);
    }

    #[test]
    fn test_match_is_case_and_trim_insensitive() {
        let catalog = Catalog::reference();

        let a = catalog.match_label("Caffee ").unwrap();
        let b = catalog.match_label("caffee").unwrap();
        assert_eq!(a.id, b.id);

        assert!(catalog.match_label("  WATER").is_some());
    }

    #[test]
    fn test_unmatched_label_yields_none() {
        let catalog = Catalog::reference();
        assert!(catalog.match_label("soda").is_none());
        // The excluded class is not a product either.
        assert!(catalog.match_label("empty").is_none());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let result = Catalog::new(vec![
            Product {
                id: 1,
                names: DisplayNames::new("Café", "قهوة"),
                price: Money::from_centimes(10_000),
                classifier_label: "caffee".to_string(),
            },
            Product {
                id: 2,
                names: DisplayNames::new("Café 2", "قهوة"),
                price: Money::from_centimes(12_000),
                classifier_label: " CAFFEE".to_string(), // normalizes to duplicate
            },
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_label_reserved() {
        let result = Catalog::new(vec![Product {
            id: 1,
            names: DisplayNames::new("Nothing", "لا شيء"),
            price: Money::from_centimes(100),
            classifier_label: "empty".to_string(),
        }]);
        assert!(result.is_err());
    }

    #[test]
    fn test_nonpositive_price_rejected() {
        let result = Catalog::new(vec![Product {
            id: 1,
            names: DisplayNames::new("Free", "مجاني"),
            price: Money::zero(),
            classifier_label: "freebie".to_string(),
        }]);
        assert!(result.is_err());
    }
}
