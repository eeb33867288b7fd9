//! # Vision Error Types
//!
//! Two families:
//!
//! - [`VisionError`] - model lifecycle and inference failures
//! - [`CameraError`] - capture access failures, one variant per sub-kind
//!   so each gets a distinct user-facing message
//!
//! The pipeline downgrades transient inference/camera failures to empty
//! result batches; these types exist for the boundaries where a failure
//! must be surfaced (model load, readiness violations, camera startup).

use thiserror::Error;

// =============================================================================
// Vision Error
// =============================================================================

/// Model lifecycle and inference failures.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The model artifact could not be loaded (runtime failure or artifact
    /// missing). Surfaced to the user; retried only on explicit action.
    #[error("Failed to load classifier model: {0}")]
    ModelLoad(String),

    /// Inference was attempted before a successful load. A caller bug:
    /// readiness must be checked first. Fails fast, never silent-empty.
    #[error("Classifier model is not loaded")]
    ModelNotLoaded,

    /// The runtime failed during preprocessing or prediction. Callers at
    /// the pipeline boundary log this and emit an empty batch.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Camera access failed.
    #[error(transparent)]
    Camera(#[from] CameraError),
}

// =============================================================================
// Camera Error
// =============================================================================

/// Capture access failures. Each sub-kind carries a distinct user-facing
/// message; none are retried automatically.
#[derive(Debug, Error)]
pub enum CameraError {
    /// Camera permission was denied by the platform or the user.
    #[error("Camera access was denied - check capture permissions")]
    PermissionDenied,

    /// The device exists but is held by another process.
    #[error("Camera is busy - another application is using it")]
    DeviceBusy,

    /// No capture device (or replay directory) was found.
    #[error("No capture source found at '{0}'")]
    NotFound(String),

    /// The source cannot satisfy the requested constraints.
    #[error("Capture source unsupported: {0}")]
    Unsupported(String),

    /// Any other I/O failure while reading frames.
    #[error("Capture I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Unit Tests
// =============================================================================
