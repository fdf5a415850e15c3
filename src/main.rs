//! Emotion analysis over a sequence of image frames.
//!
//! Each input file is treated as one frame of a single stream; results are
//! printed as JSON lines, followed by a health summary.

use anyhow::{Context, Result};
use clap::Parser;
use emotion_frame_analysis::{
    backends::{OnnxEmotionClassifier, OnnxLandmarkDetector},
    config::Config,
    frame::Frame,
    pipeline::{AnalyzeOptions, FramePipeline},
};
use log::{error, info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image files to analyze, in stream order
    frames: Vec<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Face-mesh landmark model (overrides the configuration)
    #[arg(long)]
    landmark_model: Option<PathBuf>,

    /// Emotion classifier model (overrides the configuration)
    #[arg(long)]
    emotion_model: Option<PathBuf>,

    /// Session id the frames belong to
    #[arg(short, long, default_value = "default")]
    session: String,

    /// Omit landmarks from the output
    #[arg(long)]
    no_landmarks: bool,

    /// Omit per-frame metrics from the output
    #[arg(long)]
    no_metrics: bool,

    /// Write an example configuration file to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, emotion_frame_analysis::config::EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    if args.frames.is_empty() {
        anyhow::bail!("No input frames given");
    }

    info!("Emotion Frame Analysis ({})", env!("BUILD_TARGET"));

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(path) = args.landmark_model {
        config.models.landmark_detector = path;
    }
    if let Some(path) = args.emotion_model {
        config.models.emotion_classifier = path;
    }
    config.check_model_paths()?;

    let detector = OnnxLandmarkDetector::new(&config.models.landmark_detector, &config.landmarks)
        .context("Failed to initialize landmark detector")?;
    let classifier = OnnxEmotionClassifier::new(&config.models.emotion_classifier, &config.classifier)
        .context("Failed to initialize emotion classifier")?;
    let pipeline = FramePipeline::new(detector, classifier, config)?;

    let options = AnalyzeOptions::default()
        .with_session(args.session.clone())
        .with_landmarks(!args.no_landmarks)
        .with_metrics(!args.no_metrics);

    let mut failures = 0usize;
    for path in &args.frames {
        let outcome = Frame::open(path).and_then(|frame| pipeline.analyze(&frame, &options));
        match outcome {
            Ok(result) => println!("{}", serde_json::to_string(&result)?),
            Err(e) if e.is_client_error() => {
                warn!("Skipping {}: {}", path.display(), e);
                failures += 1;
            }
            Err(e) => {
                error!("Failed to analyze {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    let health = pipeline.health_snapshot(&args.session);
    println!("{}", serde_json::to_string(&health)?);
    info!(
        "Processed {} frames ({} failed), {:.1} fps, {:.1} ms mean inference",
        args.frames.len(),
        failures,
        health.throughput,
        health.mean_inference_millis
    );

    Ok(())
}
