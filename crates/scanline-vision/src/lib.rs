//! # scanline-vision: Detection for Scanline POS
//!
//! The vision side of the kiosk: a pretrained image classifier behind a
//! load-once adapter, a frame-source seam, the detection pipeline, and the
//! polling loop that drives it all.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Detection Data Flow                              │
//! │                                                                         │
//! │  FrameSource ──grab()──► RgbImage                                      │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  FrameClassifier ──resize/normalize──► ONNX session ──► scores         │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  DetectionPipeline: arg-max ─► threshold ─► "empty" exclusion          │
//! │                     ─► catalog match ─► Detection + cosmetic box       │
//! │                             │                                           │
//! │                             ▼                                           │
//! │  Poller ──every interval──► callback(Vec<Detection>)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`classifier`] - ONNX adapter with the Unloaded/Loading/Ready guard
//! - [`frame`] - frame-source trait + replay implementation
//! - [`pipeline`] - classification → detection rules
//! - [`poller`] - Idle/Running polling state machine
//! - [`runtime`] - ONNX Runtime environment and session builder
//! - [`error`] - vision and camera error types

pub mod classifier;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod poller;
pub mod runtime;

pub use classifier::{Classification, Classify, FrameClassifier, LoadOutcome, ModelConfig};
pub use error::{CameraError, VisionError};
pub use frame::{FrameSource, ReplaySource, StillSource};
pub use pipeline::DetectionPipeline;
pub use poller::{Poller, StartOutcome, DEFAULT_POLL_INTERVAL};
