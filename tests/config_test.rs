//! Configuration file loading tests


use emotion_frame_analysis::{
    config::{Config, EXAMPLE_CONFIG},
    emotion::Emotion,
    pipeline::{AnalyzeOptions, FramePipeline},
    Error,
};
use std::io::Write;
use tempfile::NamedTempFile;
use test_helpers::{gray_frame, one_hot, FixedLandmarkDetector, SequenceClassifier};

#[test]
fn test_config_file_round_trip() {
    let mut config = Config::default();
    config.smoothing.window_size = 8;
    config.smoothing.reset_on_no_face = true;
    config.quality.max_yaw = 40.0;
    config.session.max_idle_secs = 5;

    let file = NamedTempFile::new().unwrap();
    config.to_file(file.path()).unwrap();
    let loaded = Config::from_file(file.path()).unwrap();

    assert_eq!(loaded.smoothing.window_size, 8);
    assert!(loaded.smoothing.reset_on_no_face);
    assert_eq!(loaded.quality.max_yaw, 40.0);
    assert_eq!(loaded.session.max_idle().as_secs(), 5);
}

#[test]
fn test_example_config_file_loads() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert!(config.classifier.grayscale);
}

#[test]
fn test_sparse_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "metrics:\n  window_size: 4\nquality:\n  min_brightness: 10.0").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.metrics.window_size, 4);
    assert_eq!(config.quality.min_brightness, 10.0);
    assert_eq!(config.quality.max_brightness, Config::default().quality.max_brightness);
    assert_eq!(config.smoothing.window_size, Config::default().smoothing.window_size);
}

#[test]
fn test_missing_config_file() {
    let err = Config::from_file("/nonexistent/emotion.yaml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_invalid_config_file_rejected_by_pipeline() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "smoothing:\n  window_size: 0").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let result = FramePipeline::new(
        FixedLandmarkDetector::frontal(),
        SequenceClassifier::constant(one_hot(Emotion::Happy)),
        config,
    );
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_loaded_thresholds_drive_warnings() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "quality:\n  min_brightness: 150.0\n  max_brightness: 250.0").unwrap();

    let pipeline = FramePipeline::new(
        FixedLandmarkDetector::frontal(),
        SequenceClassifier::constant(one_hot(Emotion::Happy)),
        Config::from_file(file.path()).unwrap(),
    )
    .unwrap();

    let result = pipeline.analyze(&gray_frame(100, 100), &AnalyzeOptions::default()).unwrap();
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].message(), "Low lighting detected - may affect accuracy");
}
