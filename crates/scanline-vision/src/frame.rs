//! # Frame Sources
//!
//! The capture seam. The pipeline only needs three things from a camera:
//! the current frame, its natural dimensions, and a start/stop lifecycle -
//! so that is all the trait asks for. A live capture backend is
//! platform-specific and plugs in behind [`FrameSource`]; the crate ships
//! [`ReplaySource`], which cycles through a directory of still images for
//! demos and tests.

use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{debug, warn};

use crate::error::CameraError;

// =============================================================================
// Frame Source Trait
// =============================================================================

/// A source of video frames.
///
/// ## Contract
/// - `grab()` returns `Ok(None)` while the source has no decodable frame
///   yet (not an error - the caller simply skips the cycle)
/// - `dimensions()` is `None` until the natural frame size is known
/// - access failures surface as [`CameraError`], one variant per kind,
///   and are never retried automatically
pub trait FrameSource: Send {
    /// Acquires the underlying device/stream.
    fn start(&mut self) -> Result<(), CameraError>;

    /// Releases the underlying device/stream.
    fn stop(&mut self);

    /// Natural frame dimensions, once known.
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// The current frame, or `None` while no frame is decodable.
    fn grab(&mut self) -> Result<Option<RgbImage>, CameraError>;
}

// =============================================================================
// Replay Source
// =============================================================================

/// Cycles through the still images of a directory, one per grab.
///
/// Capture replay: a recorded session (or a handful of product photos)
/// stands in for the live camera. Frames are served in filename order and
/// wrap around.
#[derive(Debug)]
pub struct ReplaySource {
    frames: Vec<PathBuf>,
    cursor: usize,
    dimensions: Option<(u32, u32)>,
    started: bool,
}

impl ReplaySource {
    /// Lists the frame files under `dir`.
    ///
    /// Fails with [`CameraError::NotFound`] when the directory does not
    /// exist or holds no images; permission problems map to
    /// [`CameraError::PermissionDenied`].
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CameraError> {
        let dir = dir.as_ref();

        let entries = std::fs::read_dir(dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CameraError::NotFound(dir.display().to_string()),
            std::io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            _ => CameraError::Io(e),
        })?;

        let mut frames: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("png") | Some("jpg") | Some("jpeg") | Some("bmp")
                )
            })
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(CameraError::NotFound(format!(
                "{} (no image frames)",
                dir.display()
            )));
        }

        debug!(dir = %dir.display(), frames = frames.len(), "Replay source opened");

        Ok(ReplaySource {
            frames,
            cursor: 0,
            dimensions: None,
            started: false,
        })
    }

    /// Number of frames in the replay loop.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the replay loop holds no frames (cannot happen after a
    /// successful [`ReplaySource::open`]).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ReplaySource {
    fn start(&mut self) -> Result<(), CameraError> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    fn grab(&mut self) -> Result<Option<RgbImage>, CameraError> {
        if !self.started {
            // Not producing frames yet - same as a camera that has not
            // buffered data.
            return Ok(None);
        }

        let path = &self.frames[self.cursor];
        self.cursor = (self.cursor + 1) % self.frames.len();

        match image::open(path) {
            Ok(img) => {
                let frame = img.to_rgb8();
                self.dimensions = Some(frame.dimensions());
                Ok(Some(frame))
            }
            Err(e) => {
                // A single undecodable frame is a transient hiccup, not a
                // device failure: skip the cycle.
                warn!(path = %path.display(), error = %e, "Skipping undecodable frame");
                Ok(None)
            }
        }
    }
}

// =============================================================================
// Still Source
// =============================================================================

/// Serves one still image, every grab, forever. Backs single-shot scans.
#[derive(Debug)]
pub struct StillSource {
    frame: RgbImage,
    started: bool,
}

impl StillSource {
    /// Decodes `path` into a frame source.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io)
                if io.kind() == std::io::ErrorKind::NotFound =>
            {
                CameraError::NotFound(path.display().to_string())
            }
            other => CameraError::Unsupported(other.to_string()),
        })?;
        Ok(StillSource {
            frame: img.to_rgb8(),
            started: false,
        })
    }
}

impl FrameSource for StillSource {
    fn start(&mut self) -> Result<(), CameraError> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.started = false;
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        Some(self.frame.dimensions())
    }

    fn grab(&mut self) -> Result<Option<RgbImage>, CameraError> {
        if !self.started {
            return Ok(None);
        }
        Ok(Some(self.frame.clone()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
