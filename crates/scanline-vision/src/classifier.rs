//! # Classifier Adapter
//!
//! Wraps one pretrained ONNX image classifier behind a load-once guard.
//!
//! ## Load State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Classifier Load States                             │
//! │                                                                         │
//! │              load() ok                                                  │
//! │  Unloaded ─────────────────────────────────► Ready (for process life)  │
//! │     │  ▲                                        │                       │
//! │     │  │ load() err                             │ load()                │
//! │     ▼  │                                        ▼                       │
//! │  Loading ── concurrent load() ──► LoadInProgress (signal, not error)   │
//! │                                                 AlreadyLoaded           │
//! │                                                                         │
//! │  classify() before Ready ──► VisionError::ModelNotLoaded (fail fast)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no unload: once Ready, the adapter stays Ready. A second
//! `load()` during an in-flight load neither blocks nor queues - it
//! returns [`LoadOutcome::LoadInProgress`] immediately.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use image::{imageops::FilterType, RgbImage};
use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::error::VisionError;
use crate::runtime::{create_session_builder, RuntimeConfig};

// =============================================================================
// Model Configuration
// =============================================================================

/// Where the model lives and what it emits.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Path to the ONNX artifact.
    pub model_path: PathBuf,

    /// Class names in model output order. The closed set the model was
    /// trained on; index i of the score vector belongs to `labels[i]`.
    pub labels: Vec<String>,

    /// Side of the square model input, in pixels.
    pub input_size: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            model_path: PathBuf::from("models/scanner.onnx"),
            labels: vec![
                "caffee".to_string(),
                "water".to_string(),
                "empty".to_string(),
            ],
            input_size: 224,
        }
    }
}

// =============================================================================
// Classification Result
// =============================================================================

/// One classification: the arg-max label and its probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Winning class name.
    pub label: String,

    /// Probability mass of the winning class, in [0, 1].
    pub confidence: f32,
}

impl Classification {
    /// Picks the arg-max of a score vector, breaking ties by first
    /// occurrence in label order.
    ///
    /// Returns `None` when the vectors are empty or their lengths differ.
    pub fn from_scores(labels: &[String], scores: &[f32]) -> Option<Classification> {
        if labels.is_empty() || labels.len() != scores.len() {
            return None;
        }

        let mut best_index = 0usize;
        let mut best_score = scores[0];
        for (i, &score) in scores.iter().enumerate().skip(1) {
            // Strictly greater keeps the FIRST occurrence on ties.
            if score > best_score {
                best_index = i;
                best_score = score;
            }
        }

        Some(Classification {
            label: labels[best_index].clone(),
            confidence: best_score,
        })
    }
}

// =============================================================================
// Classify Trait
// =============================================================================

/// The classification seam the pipeline depends on.
///
/// Production uses [`FrameClassifier`]; tests substitute stubs emitting
/// fixed score vectors.
pub trait Classify: Send + Sync {
    /// True once a model is loaded and inference is possible.
    fn is_ready(&self) -> bool;

    /// Classifies one frame. Fails with [`VisionError::ModelNotLoaded`]
    /// before a successful load.
    fn classify(&self, frame: &RgbImage) -> Result<Classification, VisionError>;
}

// =============================================================================
// Load Guard
// =============================================================================

/// Result of a [`FrameClassifier::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// This call performed the load; the adapter is now ready.
    Loaded,

    /// A previous load already succeeded; nothing to do.
    AlreadyLoaded,

    /// Another load is in flight. Not an error - the caller simply does
    /// not get to start a second one.
    LoadInProgress,
}

enum LoadState {
    Unloaded,
    Loading,
    Ready(Arc<Session>),
}

// =============================================================================
// Frame Classifier
// =============================================================================

/// The production classifier adapter over one ONNX session.
pub struct FrameClassifier {
    config: ModelConfig,
    state: Mutex<LoadState>,
}

impl FrameClassifier {
    /// Creates an unloaded adapter for the given model configuration.
    pub fn new(config: ModelConfig) -> Self {
        FrameClassifier {
            config,
            state: Mutex::new(LoadState::Unloaded),
        }
    }

    /// Model configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Loads the model. Idempotent; see [`LoadOutcome`].
    ///
    /// On failure the state returns to Unloaded and the error is surfaced;
    /// a retry happens only when the caller explicitly calls `load()`
    /// again.
    pub fn load(&self) -> Result<LoadOutcome, VisionError> {
        {
            let mut state = self.state.lock().expect("classifier state mutex poisoned");
            match *state {
                LoadState::Ready(_) => return Ok(LoadOutcome::AlreadyLoaded),
                LoadState::Loading => return Ok(LoadOutcome::LoadInProgress),
                LoadState::Unloaded => *state = LoadState::Loading,
            }
        }
        // The lock is NOT held while the session builds; concurrent
        // callers observe Loading and bail out above.

        info!(model = %self.config.model_path.display(), "Loading classifier model");
        let built = create_session_builder(&RuntimeConfig::default())
            .and_then(|builder| builder.commit_from_file(&self.config.model_path))
            .map_err(|e| VisionError::ModelLoad(e.to_string()));

        let mut state = self.state.lock().expect("classifier state mutex poisoned");
        match built {
            Ok(session) => {
                *state = LoadState::Ready(Arc::new(session));
                info!(labels = ?self.config.labels, "Classifier ready");
                Ok(LoadOutcome::Loaded)
            }
            Err(e) => {
                *state = LoadState::Unloaded;
                Err(e)
            }
        }
    }

    fn session(&self) -> Option<Arc<Session>> {
        let state = self.state.lock().expect("classifier state mutex poisoned");
        match &*state {
            LoadState::Ready(session) => Some(Arc::clone(session)),
            _ => None,
        }
    }

    /// Resizes and normalizes a frame into the model's NCHW float input.
    fn preprocess(&self, frame: &RgbImage) -> Array4<f32> {
        let size = self.config.input_size;
        let resized = image::imageops::resize(frame, size, size, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let (x, y) = (x as usize, y as usize);
            input[[0, 0, y, x]] = pixel.0[0] as f32 / 255.0;
            input[[0, 1, y, x]] = pixel.0[1] as f32 / 255.0;
            input[[0, 2, y, x]] = pixel.0[2] as f32 / 255.0;
        }
        input
    }
}

impl Classify for FrameClassifier {
    fn is_ready(&self) -> bool {
        matches!(
            &*self.state.lock().expect("classifier state mutex poisoned"),
            LoadState::Ready(_)
        )
    }

    fn classify(&self, frame: &RgbImage) -> Result<Classification, VisionError> {
        let session = self.session().ok_or(VisionError::ModelNotLoaded)?;

        let input = self.preprocess(frame);
        let input_dyn = input.into_dyn();
        let input_layout = input_dyn.as_standard_layout();

        let mut inputs = HashMap::new();
        inputs.insert(
            "input",
            Tensor::from_array(&input_layout)
                .map_err(|e| VisionError::Inference(format!("input tensor: {e}")))?,
        );

        let outputs = session
            .run(inputs)
            .map_err(|e| VisionError::Inference(format!("session run: {e}")))?;

        let scores: Vec<f32> = {
            let tensor = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| VisionError::Inference(format!("output tensor: {e}")))?;
            tensor.iter().copied().collect()
        };
        // Scores are copied out and the runtime outputs dropped here, so
        // repeated polling never accumulates native buffers.
        drop(outputs);

        debug!(?scores, "Classifier scores");

        Classification::from_scores(&self.config.labels, &scores).ok_or_else(|| {
            VisionError::Inference(format!(
                "model emitted {} scores for {} labels",
                scores.len(),
                self.config.labels.len()
            ))
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
