//! # Detection Poller
//!
//! The fixed-interval loop driving the detection pipeline.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Poller States                                    │
//! │                                                                         │
//! │            start() ──► Started                                          │
//! │   Idle ────────────────────────────► Running                            │
//! │    ▲                                   │                                │
//! │    │               stop()              │                                │
//! │    └───────────────────────────────────┘                                │
//! │                                                                         │
//! │   start() while Running ────► AlreadyRunning (no-op)                   │
//! │   start() before load()  ────► ClassifierNotReady (no-op)              │
//! │                                                                         │
//! │   Running task loop (self-rescheduling, cycles never overlap):         │
//! │     cycle: detect ──► deliver batch ──► wait interval ──► repeat       │
//! │                                                                         │
//! │   stop(): clears the callback slot FIRST (under the same lock the     │
//! │   task delivers under), then signals cancellation. A cycle in flight   │
//! │   completes but its batch hits an empty slot and is discarded - after  │
//! │   stop() returns, zero further callback invocations are possible.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::frame::FrameSource;
use crate::pipeline::DetectionPipeline;
use scanline_core::Detection;

/// Default poll interval between detection cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Outcome of a [`Poller::start`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The poller transitioned Idle → Running.
    Started,

    /// Already Running; the call was a no-op.
    AlreadyRunning,

    /// The classifier has not finished loading; the call was a no-op.
    ClassifierNotReady,
}

type DetectionCallback = Box<dyn FnMut(Vec<Detection>) + Send>;

struct RunningPoll {
    cancel_tx: watch::Sender<bool>,
    callback: Arc<Mutex<Option<DetectionCallback>>>,
    // Kept so the task is owned by the poll; the loop exits via the
    // cancel signal, not via abort (an in-flight cycle is allowed to
    // finish - its result just has nowhere to go).
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

// =============================================================================
// Poller
// =============================================================================

/// Fixed-interval detection loop over one pipeline.
pub struct Poller {
    pipeline: Arc<DetectionPipeline>,
    running: Mutex<Option<RunningPoll>>,
}

impl Poller {
    /// Creates an idle poller over the given pipeline.
    pub fn new(pipeline: Arc<DetectionPipeline>) -> Self {
        Poller {
            pipeline,
            running: Mutex::new(None),
        }
    }

    /// True while a polling task is active.
    pub fn is_running(&self) -> bool {
        self.running.lock().expect("poller state mutex poisoned").is_some()
    }

    /// Starts polling `source` every `interval`, delivering each batch
    /// (possibly empty) to `callback`.
    ///
    /// No-op when already running or when the classifier is not ready.
    /// The spawned loop is self-rescheduling: the next cycle is only
    /// scheduled after the previous one fully completes, so detection
    /// cycles never overlap and the classifier is never invoked
    /// concurrently.
    pub fn start<S, F>(&self, mut source: S, callback: F, interval: Duration) -> StartOutcome
    where
        S: FrameSource + 'static,
        F: FnMut(Vec<Detection>) + Send + 'static,
    {
        let mut running = self.running.lock().expect("poller state mutex poisoned");
        if running.is_some() {
            debug!("Poller already running, start ignored");
            return StartOutcome::AlreadyRunning;
        }
        if !self.pipeline.classifier_ready() {
            debug!("Classifier not ready, start ignored");
            return StartOutcome::ClassifierNotReady;
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let callback: Arc<Mutex<Option<DetectionCallback>>> =
            Arc::new(Mutex::new(Some(Box::new(callback))));

        let pipeline = Arc::clone(&self.pipeline);
        let callback_slot = Arc::clone(&callback);

        let handle = tokio::spawn(async move {
            info!(interval_ms = interval.as_millis() as u64, "Detection polling started");
            loop {
                if *cancel_rx.borrow() {
                    break;
                }

                let batch = match pipeline.detect(&mut source) {
                    Ok(batch) => batch,
                    Err(e) => {
                        // Only ModelNotLoaded escapes detect(); it cannot
                        // heal by itself, so the loop ends.
                        error!(error = %e, "Detection cycle failed, stopping poll loop");
                        break;
                    }
                };

                {
                    let mut slot = callback_slot.lock().expect("callback slot mutex poisoned");
                    match slot.as_mut() {
                        Some(deliver) => deliver(batch),
                        // stop() cleared the slot while this cycle was in
                        // flight: discard and exit.
                        None => break,
                    }
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel_rx.changed() => break,
                }
            }
            debug!("Detection polling loop exited");
        });

        *running = Some(RunningPoll {
            cancel_tx,
            callback,
            handle,
        });
        StartOutcome::Started
    }

    /// Stops polling and returns the poller to Idle.
    ///
    /// Synchronous: once this returns, the callback can no longer be
    /// invoked, even by a detection cycle that was in flight at stop time.
    pub fn stop(&self) {
        let mut running = self.running.lock().expect("poller state mutex poisoned");
        if let Some(poll) = running.take() {
            *poll
                .callback
                .lock()
                .expect("callback slot mutex poisoned") = None;
            let _ = poll.cancel_tx.send(true);
            info!("Detection polling stopped");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
