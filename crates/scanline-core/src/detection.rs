//! # Detection Module
//!
//! Detection events emitted by the vision pipeline, and the cosmetic
//! bounding box drawn around them.
//!
//! A [`Detection`] is created per successful classification, handed to the
//! coordinating session, and discarded - it is never mutated and never
//! persisted. The classifier produces no localization, so the box is a
//! fixed-size square centered on the frame ([`crate::BOX_RATIO`] of the
//! shorter dimension); it exists purely so the display has something to
//! draw.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::BOX_RATIO;

// =============================================================================
// Bounding Box
// =============================================================================

/// An axis-aligned box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// The cosmetic detection box: a square of [`BOX_RATIO`] times the
    /// shorter frame dimension, centered on the frame.
    pub fn centered(frame_width: u32, frame_height: u32) -> Self {
        let side = (frame_width.min(frame_height) as f32) * BOX_RATIO;
        BoundingBox {
            x: (frame_width as f32 - side) / 2.0,
            y: (frame_height as f32 - side) / 2.0,
            width: side,
            height: side,
        }
    }

    /// Center point of the box.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// =============================================================================
// Detection
// =============================================================================

/// One positive detection: a catalog product recognized in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// The matched catalog product (frozen copy).
    pub product: Product,

    /// Raw classifier label that matched (as emitted by the model).
    pub label: String,

    /// Winning-class probability, in [0, 1].
    pub confidence: f32,

    /// Cosmetic box centered on the frame.
    pub bounding_box: BoundingBox,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_box_landscape() {
        // 640x480 frame: shorter side 480, box side 288, centered.
        let bb = BoundingBox::centered(640, 480);
        assert!((bb.width - 288.0).abs() < f32::EPSILON);
        assert!((bb.height - 288.0).abs() < f32::EPSILON);
        assert!((bb.x - 176.0).abs() < f32::EPSILON);
        assert!((bb.y - 96.0).abs() < f32::EPSILON);

        let (cx, cy) = bb.center();
        assert!((cx - 320.0).abs() < f32::EPSILON);
        assert!((cy - 240.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_centered_box_portrait() {
        let bb = BoundingBox::centered(480, 640);
        assert!((bb.width - 288.0).abs() < f32::EPSILON);
        let (cx, cy) = bb.center();
        assert!((cx - 240.0).abs() < f32::EPSILON);
        assert!((cy - 320.0).abs() < f32::EPSILON);
    }
}
