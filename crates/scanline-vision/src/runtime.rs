//! ONNX Runtime environment and session construction.
//!
//! The runtime environment is process-global and initialized exactly once;
//! sessions are built on top of it per model.

use std::sync::Once;

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::Result as OrtResult;

static INIT: Once = Once::new();

/// Session tuning knobs.
#[derive(Debug)]
pub struct RuntimeConfig {
    /// Inter-op thread count; 0 lets ONNX Runtime decide.
    pub inter_threads: usize,
    /// Intra-op thread count; 0 lets ONNX Runtime decide.
    pub intra_threads: usize,
    /// Graph optimization level.
    pub optimization_level: GraphOptimizationLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inter_threads: 0,
            intra_threads: 0,
            optimization_level: GraphOptimizationLevel::Level3,
        }
    }
}

fn init_onnx_environment() -> OrtResult<()> {
    ort::init().with_name("scanline").commit()?;
    Ok(())
}

/// Initializes the process-global ONNX environment (idempotent).
pub fn ensure_initialized() -> OrtResult<()> {
    INIT.call_once(|| {
        init_onnx_environment().expect("Failed to initialize ONNX Runtime environment");
    });
    Ok(())
}

/// Builds a configured session builder on the shared environment.
pub fn create_session_builder(config: &RuntimeConfig) -> OrtResult<SessionBuilder> {
    ensure_initialized()?;
    let mut builder = Session::builder()?;

    if config.inter_threads > 0 {
        builder = builder.with_inter_threads(config.inter_threads)?;
    }
    if config.intra_threads > 0 {
        builder = builder.with_intra_threads(config.intra_threads)?;
    }

    let opt_level = match config.optimization_level {
        GraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        GraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        GraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        GraphOptimizationLevel::Disable => GraphOptimizationLevel::Disable,
    };
    builder = builder.with_optimization_level(opt_level)?;

    Ok(builder)
}
