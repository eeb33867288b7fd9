//! # Detection Pipeline
//!
//! Turns one frame into zero or one [`Detection`].
//!
//! ## Decision Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Frame → Detection Decision                             │
//! │                                                                         │
//! │  frame not ready ──────────────────────────────► []                     │
//! │  classifier/camera hiccup ─────────(warn)──────► []                     │
//! │  confidence < 0.5 ─────────────────────────────► []                     │
//! │  label == "empty" (any confidence) ────────────► []                     │
//! │  label not in catalog ─────────────────────────► []                     │
//! │  otherwise ────────────────────────────────────► [Detection]            │
//! │                                                                         │
//! │  The ONLY error that escapes is ModelNotLoaded - calling detect()      │
//! │  before load() is a caller bug, not a transient hiccup.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use crate::classifier::Classify;
use crate::error::VisionError;
use crate::frame::FrameSource;
use scanline_core::{BoundingBox, Catalog, Detection, CONFIDENCE_THRESHOLD, EMPTY_LABEL};

// =============================================================================
// Detection Pipeline
// =============================================================================

/// The frame → classification → detection pipeline.
pub struct DetectionPipeline {
    classifier: Arc<dyn Classify>,
    catalog: Catalog,
}

impl DetectionPipeline {
    /// Creates a pipeline over a classifier and a product catalog.
    pub fn new(classifier: Arc<dyn Classify>, catalog: Catalog) -> Self {
        DetectionPipeline {
            classifier,
            catalog,
        }
    }

    /// True once the underlying classifier is loaded.
    pub fn classifier_ready(&self) -> bool {
        self.classifier.is_ready()
    }

    /// The catalog detections are matched against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Runs one detection cycle against the source's current frame.
    ///
    /// Returns an empty batch for every no-detection condition (frame not
    /// ready, low confidence, excluded or unmatched label) and for
    /// transient camera/inference failures, which are logged and
    /// swallowed so a hiccup never halts polling. The single escaping
    /// error is [`VisionError::ModelNotLoaded`].
    pub fn detect(&self, source: &mut dyn FrameSource) -> Result<Vec<Detection>, VisionError> {
        if !self.classifier.is_ready() {
            return Err(VisionError::ModelNotLoaded);
        }

        let frame = match source.grab() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                warn!(error = %e, "Frame grab failed, skipping cycle");
                return Ok(Vec::new());
            }
        };
        let (frame_width, frame_height) = frame.dimensions();

        let classification = match self.classifier.classify(&frame) {
            Ok(classification) => classification,
            Err(VisionError::ModelNotLoaded) => return Err(VisionError::ModelNotLoaded),
            Err(e) => {
                warn!(error = %e, "Inference failed, skipping cycle");
                return Ok(Vec::new());
            }
        };

        if classification.confidence < CONFIDENCE_THRESHOLD {
            debug!(
                label = %classification.label,
                confidence = classification.confidence,
                "Below confidence threshold"
            );
            return Ok(Vec::new());
        }

        // The empty class is excluded outright, independent of confidence.
        if classification.label.trim().eq_ignore_ascii_case(EMPTY_LABEL) {
            return Ok(Vec::new());
        }

        let product = match self.catalog.match_label(&classification.label) {
            Some(product) => product.clone(),
            None => {
                debug!(label = %classification.label, "Label has no catalog product");
                return Ok(Vec::new());
            }
        };

        debug!(
            label = %classification.label,
            confidence = classification.confidence,
            product = product.id,
            "Detection"
        );

        Ok(vec![Detection {
            product,
            label: classification.label,
            confidence: classification.confidence,
            bounding_box: BoundingBox::centered(frame_width, frame_height),
        }])
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use crate::error::CameraError;
    use image::RgbImage;

    /// Classifier stub emitting a fixed score vector.
    struct StubClassifier {
        labels: Vec<String>,
        scores: Vec<f32>,
        ready: bool,
    }

    impl StubClassifier {
        fn scoring(scores: [f32; 3]) -> Self {
            StubClassifier {
                labels: vec!["caffee".into(), "water".into(), "empty".into()],
                scores: scores.to_vec(),
                ready: true,
            }
        }
    }

    impl Classify for StubClassifier {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn classify(&self, _frame: &RgbImage) -> Result<Classification, VisionError> {
            if !self.ready {
                return Err(VisionError::ModelNotLoaded);
            }
            Classification::from_scores(&self.labels, &self.scores)
                .ok_or_else(|| VisionError::Inference("bad stub".into()))
        }
    }

    /// Classifier stub that always fails at inference time.
    struct FailingClassifier;

    impl Classify for FailingClassifier {
        fn is_ready(&self) -> bool {
            true
        }

        fn classify(&self, _frame: &RgbImage) -> Result<Classification, VisionError> {
            Err(VisionError::Inference("backend exploded".into()))
        }
    }

    /// Source stub serving one fixed 640x480 frame forever.
    struct FixedSource {
        frame: Option<RgbImage>,
        fail: Option<CameraError>,
    }

    impl FixedSource {
        fn frame_640x480() -> Self {
            FixedSource {
                frame: Some(RgbImage::new(640, 480)),
                fail: None,
            }
        }

        fn not_ready() -> Self {
            FixedSource {
                frame: None,
                fail: None,
            }
        }

        fn failing() -> Self {
            FixedSource {
                frame: None,
                fail: Some(CameraError::DeviceBusy),
            }
        }
    }

    impl FrameSource for FixedSource {
        fn start(&mut self) -> Result<(), CameraError> {
            Ok(())
        }

        fn stop(&mut self) {}

        fn dimensions(&self) -> Option<(u32, u32)> {
            self.frame.as_ref().map(|f| f.dimensions())
        }

        fn grab(&mut self) -> Result<Option<RgbImage>, CameraError> {
            if let Some(err) = self.fail.take() {
                return Err(err);
            }
            Ok(self.frame.clone())
        }
    }

    fn pipeline_for(classifier: impl Classify + 'static) -> DetectionPipeline {
        DetectionPipeline::new(Arc::new(classifier), Catalog::reference())
    }

    #[test]
    fn test_confident_coffee_yields_one_detection() {
        let pipeline = pipeline_for(StubClassifier::scoring([0.82, 0.10, 0.08]));
        let mut source = FixedSource::frame_640x480();

        let batch = pipeline.detect(&mut source).unwrap();
        assert_eq!(batch.len(), 1);

        let detection = &batch[0];
        assert_eq!(detection.product.names.primary, "Café");
        assert_eq!(detection.label, "caffee");
        assert!((detection.confidence - 0.82).abs() < f32::EPSILON);

        // Cosmetic box: centered, 60% of the shorter dimension.
        let bb = detection.bounding_box;
        assert!((bb.width - 288.0).abs() < f32::EPSILON);
        assert_eq!(bb.center(), (320.0, 240.0));
    }

    #[test]
    fn test_empty_label_excluded_even_when_arg_max() {
        // empty wins arg-max; exclusion applies regardless of its score.
        let pipeline = pipeline_for(StubClassifier::scoring([0.3, 0.3, 0.4]));
        let mut source = FixedSource::frame_640x480();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());

        // Even a very confident empty is still excluded.
        let pipeline = pipeline_for(StubClassifier::scoring([0.01, 0.02, 0.97]));
        let mut source = FixedSource::frame_640x480();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        // Exactly 0.5 passes...
        let pipeline = pipeline_for(StubClassifier::scoring([0.5, 0.3, 0.2]));
        let mut source = FixedSource::frame_640x480();
        assert_eq!(pipeline.detect(&mut source).unwrap().len(), 1);

        // ...just below does not.
        let pipeline = pipeline_for(StubClassifier::scoring([0.49, 0.3, 0.21]));
        let mut source = FixedSource::frame_640x480();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_label_yields_nothing() {
        let classifier = StubClassifier {
            labels: vec!["soda".into(), "water".into(), "empty".into()],
            scores: vec![0.9, 0.05, 0.05],
            ready: true,
        };
        let pipeline = pipeline_for(classifier);
        let mut source = FixedSource::frame_640x480();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }

    #[test]
    fn test_label_matching_survives_case_and_whitespace() {
        let classifier = StubClassifier {
            labels: vec!["Caffee ".into(), "water".into(), "empty".into()],
            scores: vec![0.7, 0.2, 0.1],
            ready: true,
        };
        let pipeline = pipeline_for(classifier);
        let mut source = FixedSource::frame_640x480();

        let batch = pipeline.detect(&mut source).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].product.id, 1);
    }

    #[test]
    fn test_not_ready_classifier_fails_fast() {
        let classifier = StubClassifier {
            ready: false,
            ..StubClassifier::scoring([0.9, 0.05, 0.05])
        };
        let pipeline = pipeline_for(classifier);
        let mut source = FixedSource::frame_640x480();

        let err = pipeline.detect(&mut source).unwrap_err();
        assert!(matches!(err, VisionError::ModelNotLoaded));
    }

    #[test]
    fn test_frame_not_ready_is_empty_not_error() {
        let pipeline = pipeline_for(StubClassifier::scoring([0.9, 0.05, 0.05]));
        let mut source = FixedSource::not_ready();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }

    #[test]
    fn test_camera_hiccup_is_swallowed() {
        let pipeline = pipeline_for(StubClassifier::scoring([0.9, 0.05, 0.05]));
        let mut source = FixedSource::failing();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }

    #[test]
    fn test_inference_failure_is_swallowed() {
        let pipeline = pipeline_for(FailingClassifier);
        let mut source = FixedSource::frame_640x480();
        assert!(pipeline.detect(&mut source).unwrap().is_empty());
    }
}
