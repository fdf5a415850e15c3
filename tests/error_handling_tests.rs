//! Error handling tests for all modules


use emotion_frame_analysis::{
    config::Config,
    constants::DEFAULT_SESSION_ID,
    emotion::{Emotion, ProbabilityVector},
    error::{Error, ErrorKind},
    frame::Frame,
    geometry::{face_bounding_box, BoundingBox},
    landmarks::LandmarkSet,
    pipeline::{AnalyzeOptions, FramePipeline},
    utils::safe_cast::{f64_to_i64_trunc, i64_to_u32_clamp},
};
use test_helpers::{
    frontal_pipeline, gray_frame, one_hot, FailingClassifier, FailingLandmarkDetector, FixedLandmarkDetector,
    SequenceClassifier,
};

#[test]
fn test_invalid_frames_rejected() {
    let result = Frame::from_raw(0, 10, Vec::new());
    assert!(matches!(result, Err(Error::InvalidFrame(_))));

    // Buffer too short for the dimensions
    let result = Frame::from_raw(4, 4, vec![0; 10]);
    assert!(result.is_err());

    let result = Frame::decode(b"definitely not an image");
    let err = result.unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.kind(), ErrorKind::InvalidFrame);
}

#[test]
fn test_classifier_failure_leaves_state_untouched() {
    let pipeline = FramePipeline::new(FixedLandmarkDetector::frontal(), FailingClassifier, Config::default()).unwrap();

    let err = pipeline.analyze(&gray_frame(100, 100), &AnalyzeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Classification(_)));
    assert_eq!(err.kind(), ErrorKind::ProcessingFailure);
    assert!(!err.is_client_error());

    // No session was created and no metrics were recorded
    assert!(matches!(
        pipeline.session_stats(DEFAULT_SESSION_ID),
        Err(Error::UnknownSession(_))
    ));
    assert_eq!(pipeline.health_snapshot(DEFAULT_SESSION_ID).throughput, 0.0);
}

#[test]
fn test_failure_after_success_keeps_history() {
    let pipeline = frontal_pipeline(vec![one_hot(Emotion::Happy), ProbabilityVector::zeros()]);
    let frame = gray_frame(100, 100);
    let options = AnalyzeOptions::default();

    pipeline.analyze(&frame, &options).unwrap();
    let before = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();

    let err = pipeline.analyze(&frame, &options).unwrap_err();
    assert!(matches!(err, Error::InvalidProbabilities(_)));

    let after = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();
    assert_eq!(before.smoothing_samples, after.smoothing_samples);
    assert_eq!(before.frame_samples, after.frame_samples);
    assert_eq!(before.inference_samples, after.inference_samples);
}

#[test]
fn test_detector_failure_propagates() {
    let pipeline = FramePipeline::new(
        FailingLandmarkDetector,
        SequenceClassifier::constant(one_hot(Emotion::Neutral)),
        Config::default(),
    )
    .unwrap();

    let err = pipeline.analyze(&gray_frame(32, 32), &AnalyzeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::LandmarkDetection(_)));
    assert!(pipeline.session_ids().is_empty());
}

#[test]
fn test_landmarks_outside_frame_fail_cleanly() {
    let landmarks = LandmarkSet::from_coordinates(&[(1.5, 1.5, 0.0), (2.0, 2.0, 0.0)]);
    let pipeline = FramePipeline::new(
        FixedLandmarkDetector::new(landmarks.clone()),
        SequenceClassifier::constant(one_hot(Emotion::Neutral)),
        Config::default(),
    )
    .unwrap();

    let err = pipeline.analyze(&gray_frame(50, 50), &AnalyzeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyFaceRegion(_)));
    assert!(face_bounding_box(50, 50, &landmarks, 0).is_err());
}

#[test]
fn test_non_finite_landmarks_rejected() {
    let landmarks = LandmarkSet::from_coordinates(&[(f64::NAN, 0.5, 0.0)]);
    assert!(face_bounding_box(100, 100, &landmarks, 20).is_err());

    let landmarks = LandmarkSet::from_coordinates(&[(f64::INFINITY, 0.5, 0.0)]);
    assert!(face_bounding_box(100, 100, &landmarks, 20).is_err());
}

#[test]
fn test_far_out_landmarks_clamp_without_overflow() {
    let far = 2f64.powi(50);

    let landmarks = LandmarkSet::from_coordinates(&[(0.5, 0.5, 0.0), (far, far, 0.0)]);
    let bbox = face_bounding_box(128, 128, &landmarks, 20).unwrap();
    assert_eq!(bbox, BoundingBox::new(44, 44, 128, 128));

    let landmarks = LandmarkSet::from_coordinates(&[(0.5, 0.5, 0.0), (-far, -far, 0.0)]);
    let bbox = face_bounding_box(128, 128, &landmarks, 20).unwrap();
    assert_eq!(bbox, BoundingBox::new(0, 0, 84, 84));

    // Largest pixel coordinate below 2^63, so padding has to saturate
    let edge = (2f64.powi(63) - 1024.0) / 128.0;
    let landmarks = LandmarkSet::from_coordinates(&[(edge, 0.5, 0.0), (-edge, 0.5, 0.0)]);
    let bbox = face_bounding_box(128, 128, &landmarks, u32::MAX).unwrap();
    assert_eq!((bbox.x_min, bbox.x_max), (0, 128));

    let landmarks = LandmarkSet::from_coordinates(&[(far, far, 0.0)]);
    assert!(matches!(
        face_bounding_box(128, 128, &landmarks, 20),
        Err(Error::EmptyFaceRegion(_))
    ));
}

#[test]
fn test_far_out_landmark_reaches_classifier() {
    let far = 2f64.powi(50);
    let landmarks = LandmarkSet::from_coordinates(&[(0.5, 0.5, 0.0), (far, far, 0.0)]);
    let pipeline = FramePipeline::new(
        FixedLandmarkDetector::new(landmarks),
        SequenceClassifier::constant(one_hot(Emotion::Neutral)),
        Config::default(),
    )
    .unwrap();

    let result = pipeline.analyze(&gray_frame(128, 128), &AnalyzeOptions::default()).unwrap();
    assert!(result.face_detected());

    let landmarks = LandmarkSet::from_coordinates(&[(far, far, 0.0), (2.0 * far, far, 0.0)]);
    let pipeline = FramePipeline::new(
        FixedLandmarkDetector::new(landmarks),
        SequenceClassifier::constant(one_hot(Emotion::Neutral)),
        Config::default(),
    )
    .unwrap();
    let err = pipeline.analyze(&gray_frame(128, 128), &AnalyzeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProcessingFailure);
    assert!(pipeline.session_ids().is_empty());
}

#[test]
fn test_invalid_probability_vectors() {
    assert!(ProbabilityVector::new([0.5, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0]).is_err());
    assert!(ProbabilityVector::new([-0.5, 1.5, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    assert!(ProbabilityVector::new([f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    assert!(ProbabilityVector::from_slice(&[1.0]).is_err());
    assert!(ProbabilityVector::from_logits(&[]).is_err());
}

#[test]
fn test_empty_crop_rejected() {
    let frame = gray_frame(10, 10);
    assert!(frame.crop(&BoundingBox::new(5, 5, 5, 8)).is_err());
    assert!(frame.crop(&BoundingBox::new(0, 0, 11, 10)).is_err());
    assert_eq!(frame.crop(&BoundingBox::new(2, 3, 7, 9)).unwrap().width(), 5);
}

#[test]
fn test_safe_cast_edge_cases() {
    assert!(f64_to_i64_trunc(f64::NAN).is_err());
    assert!(f64_to_i64_trunc(1e300).is_err());
    assert_eq!(f64_to_i64_trunc(-2.9).unwrap(), -2);
    assert_eq!(i64_to_u32_clamp(-10, 0, 100), 0);
    assert_eq!(i64_to_u32_clamp(1_000, 0, 100), 100);
}

#[test]
fn test_unknown_session_operations_are_noops() {
    let pipeline = frontal_pipeline(vec![one_hot(Emotion::Happy)]);
    pipeline.reset_session("ghost");
    pipeline.reset_smoothing("ghost");
    pipeline.reset_metrics("ghost");
    assert!(!pipeline.end_session("ghost"));
    assert!(pipeline.session_ids().is_empty());

    let err = pipeline.session_stats("ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
