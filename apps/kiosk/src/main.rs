//! # Scanline Kiosk Entry Point
//!
//! CLI for the camera-driven point-of-sale kiosk.
//!
//! ## Commands
//! ```text
//! scanline-kiosk run [--frames DIR] [--cycles N] [--checkout]
//!     Load the classifier, poll a replay frame source, add detections
//!     to the cart, optionally check the cart out at the end.
//!
//! scanline-kiosk scan IMAGE
//!     Classify a single image, add any detection to the cart/stats.
//!
//! scanline-kiosk stats [--reset]
//!     Show (or zero) the persisted counters.
//!
//! scanline-kiosk export-session
//!     Write the aggregate session snapshot to the export directory.
//! ```
//!
//! Configuration comes from defaults overridden by `SCANLINE_*`
//! environment variables (see [`KioskConfig`]).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use scanline_core::Catalog;
use scanline_kiosk_lib::session::CheckoutSession;
use scanline_kiosk_lib::state::{CartState, KioskConfig};
use scanline_kiosk_lib::{init_tracing, render};
use scanline_store::{Exporter, Store, StoreConfig};
use scanline_vision::{
    DetectionPipeline, FrameClassifier, FrameSource, ModelConfig, Poller, ReplaySource,
    StartOutcome, StillSource,
};

#[derive(Parser)]
#[command(name = "scanline-kiosk", version, about = "Camera-driven POS kiosk")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll a frame source and feed detections into the cart
    Run {
        /// Directory of replay frames standing in for the camera
        #[arg(long, default_value = "frames")]
        frames: PathBuf,

        /// Stop after this many detection cycles (default: until Ctrl+C)
        #[arg(long)]
        cycles: Option<u64>,

        /// Check the cart out when the loop ends
        #[arg(long)]
        checkout: bool,
    },

    /// Classify a single image
    Scan {
        /// Image file to classify
        image: PathBuf,
    },

    /// Show or reset the persisted counters
    Stats {
        /// Zero all counters
        #[arg(long)]
        reset: bool,
    },

    /// Export the aggregate session snapshot
    ExportSession,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = KioskConfig::from_env();

    match cli.command {
        Command::Run {
            frames,
            cycles,
            checkout,
        } => cmd_run(&config, &frames, cycles, checkout).await,
        Command::Scan { image } => cmd_scan(&config, &image).await,
        Command::Stats { reset } => cmd_stats(&config, reset).await,
        Command::ExportSession => cmd_export_session(&config).await,
    }
}

/// Opens the store and wires a checkout session.
async fn build_session(config: &KioskConfig) -> Result<CheckoutSession> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
    }

    let store = Store::connect(StoreConfig::new(&config.db_path))
        .await
        .with_context(|| format!("could not open store at {}", config.db_path.display()))?;

    Ok(CheckoutSession::new(
        CartState::new(),
        store.stats(),
        Exporter::new(&config.export_dir),
    ))
}

/// Loads the classifier (visible failure, retried only by running again)
/// and builds the detection pipeline.
fn build_pipeline(config: &KioskConfig) -> Result<Arc<DetectionPipeline>> {
    let classifier = Arc::new(FrameClassifier::new(ModelConfig {
        model_path: config.model_path.clone(),
        ..ModelConfig::default()
    }));

    classifier.load().with_context(|| {
        format!(
            "could not load classifier model at {}",
            config.model_path.display()
        )
    })?;

    Ok(Arc::new(DetectionPipeline::new(
        classifier,
        Catalog::reference(),
    )))
}

async fn cmd_run(
    config: &KioskConfig,
    frames: &PathBuf,
    cycles: Option<u64>,
    checkout: bool,
) -> Result<()> {
    let session = build_session(config).await?;
    let pipeline = build_pipeline(config)?;

    let mut source = ReplaySource::open(frames)
        .with_context(|| format!("could not open frame source at {}", frames.display()))?;
    source.start()?;

    let poller = Poller::new(pipeline);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = poller.start(
        source,
        move |batch| {
            // The receiver side may already be gone on shutdown; the
            // batch is simply dropped then.
            let _ = tx.send(batch);
        },
        config.poll_interval,
    );
    ensure!(
        outcome == StartOutcome::Started,
        "poller did not start: {outcome:?}"
    );

    info!(store = %config.store_name, "Kiosk running - Ctrl+C to stop");

    let mut completed_cycles: u64 = 0;
    loop {
        tokio::select! {
            maybe_batch = rx.recv() => {
                match maybe_batch {
                    Some(batch) => {
                        if !batch.is_empty() {
                            println!("{}", render::render_detections(&batch, config));
                        }
                        session.handle_detections(&batch).await?;

                        completed_cycles += 1;
                        if let Some(max) = cycles {
                            if completed_cycles >= max {
                                break;
                            }
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    poller.stop();

    println!("{}", render::render_cart(&session.cart_snapshot(), config));

    if checkout {
        match session.checkout().await {
            Ok(receipt) => println!("{}", render::render_receipt(&receipt, config)),
            Err(e) => eprintln!("Checkout failed: {e}"),
        }
    }

    Ok(())
}

async fn cmd_scan(config: &KioskConfig, image: &PathBuf) -> Result<()> {
    let session = build_session(config).await?;
    let pipeline = build_pipeline(config)?;

    let mut source = StillSource::open(image)
        .with_context(|| format!("could not open image {}", image.display()))?;
    source.start()?;

    let batch = pipeline.detect(&mut source)?;
    println!("{}", render::render_detections(&batch, config));

    if !batch.is_empty() {
        session.handle_detections(&batch).await?;
        println!("{}", render::render_cart(&session.cart_snapshot(), config));
    }

    Ok(())
}

async fn cmd_stats(config: &KioskConfig, reset: bool) -> Result<()> {
    let session = build_session(config).await?;

    let stats = if reset {
        session.reset_stats().await?
    } else {
        session.stats().await?
    };

    println!("{}", render::render_stats(&stats, config));
    Ok(())
}

async fn cmd_export_session(config: &KioskConfig) -> Result<()> {
    let session = build_session(config).await?;
    let path = session.export_session().await?;
    println!("Session snapshot written to {}", path.display());
    Ok(())
}
