//! Frame analysis pipeline: landmarks → face crop → classification →
//! smoothing → quality checks → metrics.

use crate::{
    backends::{EmotionClassifier, LandmarkDetector},
    config::Config,
    constants::{DEFAULT_SESSION_ID, PROBABILITY_SUM_TOLERANCE},
    emotion::{ProbabilityVector, ResultLabel},
    frame::Frame,
    geometry::extract_face_region,
    landmarks::LandmarkSet,
    metrics::{FrameMetrics, MetricsSnapshot},
    quality::{assess_quality, QualityWarning},
    session::{lock_session, SessionRegistry, SessionStats},
    Error, Result,
};
use log::{debug, info};
use serde::Serialize;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Per-call options for [`FramePipeline::analyze`]
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Attach the landmark set to the result
    pub include_landmarks: bool,
    /// Attach a per-frame metrics snapshot to the result
    pub include_metrics: bool,
    /// Session whose smoothing and metrics state is used
    pub session: String,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            include_landmarks: true,
            include_metrics: true,
            session: DEFAULT_SESSION_ID.to_string(),
        }
    }
}

impl AnalyzeOptions {
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    #[must_use]
    pub fn with_landmarks(mut self, include: bool) -> Self {
        self.include_landmarks = include;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }
}

/// Outcome of analyzing one frame
#[derive(Debug, Clone, Serialize)]
pub struct EmotionResult {
    /// Most probable emotion after smoothing, or "No Face Detected"
    #[serde(rename = "emotion")]
    pub label: ResultLabel,
    /// Smoothed probability of `label`
    pub confidence: f64,
    pub probabilities: ProbabilityVector,
    pub warnings: Vec<QualityWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<LandmarkSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FrameMetrics>,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl EmotionResult {
    /// Result for a frame in which no face was found
    #[must_use]
    pub fn no_face() -> Self {
        Self {
            label: ResultLabel::NoFaceDetected,
            confidence: 0.0,
            probabilities: ProbabilityVector::zeros(),
            warnings: vec![QualityWarning::NoFaceInFrame],
            landmarks: None,
            metrics: None,
            timestamp: unix_timestamp(),
        }
    }

    #[must_use]
    pub fn face_detected(&self) -> bool {
        self.label != ResultLabel::NoFaceDetected
    }
}

/// Service health for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthSnapshot {
    /// Approximate frames per second
    pub throughput: f64,
    /// Mean classifier latency in milliseconds
    pub mean_inference_millis: f64,
    /// Number of live sessions
    pub active_sessions: usize,
}

/// Orchestrates landmark detection, classification and temporal smoothing
///
/// The pipeline itself is shared across callers; all mutable state lives in
/// per-session state behind a lock, so `analyze` takes `&self`.
pub struct FramePipeline<D, C> {
    detector: D,
    classifier: C,
    config: Config,
    sessions: SessionRegistry,
}

impl<D: LandmarkDetector, C: EmotionClassifier> FramePipeline<D, C> {
    /// Create a pipeline from its two capabilities
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(detector: D, classifier: C, config: Config) -> Result<Self> {
        config.validate()?;
        info!(
            "Initializing FramePipeline with {} and {} (smoothing window {}, metrics window {})",
            detector.name(),
            classifier.name(),
            config.smoothing.window_size,
            config.metrics.window_size
        );

        let sessions = SessionRegistry::new(config.smoothing.window_size, config.metrics.window_size);
        Ok(Self {
            detector,
            classifier,
            config,
            sessions,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze one frame of a session's stream
    ///
    /// A frame without a face is a normal result, not an error, and leaves
    /// the session's metrics untouched. Every fallible step runs before the
    /// session state is locked, so a failed call never changes it.
    ///
    /// # Errors
    ///
    /// Returns an error if landmark detection, cropping or classification
    /// fails, or if the classifier returns an invalid distribution.
    pub fn analyze(&self, frame: &Frame, options: &AnalyzeOptions) -> Result<EmotionResult> {
        let start = Instant::now();

        let landmarks = self.detector.detect(frame)?;
        if landmarks.is_empty() {
            debug!("No face in {}x{} frame", frame.width(), frame.height());
            if self.config.smoothing.reset_on_no_face {
                if let Some(session) = self.sessions.get(&options.session) {
                    lock_session(&session).smoother.reset();
                }
            }
            return Ok(EmotionResult::no_face());
        }

        let (face_box, face) = extract_face_region(frame, &landmarks, self.config.geometry.crop_padding)?;

        let inference_start = Instant::now();
        let raw = self.classifier.classify(&face)?;
        let inference_time = inference_start.elapsed().as_secs_f64();
        if (raw.sum() - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(Error::InvalidProbabilities(format!(
                "{} returned probabilities summing to {}",
                self.classifier.name(),
                raw.sum()
            )));
        }

        let warnings = assess_quality(
            frame,
            &landmarks,
            &self.config.quality,
            &self.config.geometry.pose_landmarks,
        );

        let (smoothed, fps, frame_time) = self.sessions.update(&options.session, |state| {
            let smoothed = state.smoother.smooth(raw);
            let frame_time = start.elapsed().as_secs_f64();
            state.metrics.record_frame_time(frame_time);
            state.metrics.record_inference_time(inference_time);
            state.touch();
            (smoothed, state.metrics.throughput(), frame_time)
        });

        let (emotion, confidence) = smoothed.argmax();
        debug!(
            "Session '{}': {} ({:.3}) in face {}, {} warnings, {:.1} ms",
            options.session,
            emotion,
            confidence,
            face_box,
            warnings.len(),
            frame_time * 1000.0
        );

        let metrics = options.include_metrics.then(|| FrameMetrics {
            fps,
            latency_ms: frame_time * 1000.0,
            inference_ms: inference_time * 1000.0,
            face_detected: true,
            landmarks_count: landmarks.len(),
        });

        Ok(EmotionResult {
            label: ResultLabel::Emotion(emotion),
            confidence,
            probabilities: smoothed,
            warnings,
            landmarks: options.include_landmarks.then_some(landmarks),
            metrics,
            timestamp: unix_timestamp(),
        })
    }

    /// Clear a session's smoothing history and metrics together
    pub fn reset_session(&self, session_id: &str) {
        if let Some(session) = self.sessions.get(session_id) {
            lock_session(&session).reset();
            info!("Reset session '{session_id}'");
        }
    }

    /// Clear only a session's smoothing history
    pub fn reset_smoothing(&self, session_id: &str) {
        if let Some(session) = self.sessions.get(session_id) {
            lock_session(&session).smoother.reset();
        }
    }

    /// Clear only a session's metrics windows
    pub fn reset_metrics(&self, session_id: &str) {
        if let Some(session) = self.sessions.get(session_id) {
            lock_session(&session).metrics.reset();
        }
    }

    /// Throughput and inference latency of a session, without side effects
    ///
    /// An unknown session reports zeros.
    #[must_use]
    pub fn health_snapshot(&self, session_id: &str) -> HealthSnapshot {
        let metrics = self
            .sessions
            .get(session_id)
            .map_or_else(MetricsSnapshot::default, |session| lock_session(&session).metrics.snapshot());
        HealthSnapshot {
            throughput: metrics.throughput,
            mean_inference_millis: metrics.mean_inference_millis,
            active_sessions: self.sessions.len(),
        }
    }

    /// Buffer sizes and idle time of a session
    ///
    /// # Errors
    ///
    /// Returns `UnknownSession` if the session does not exist.
    pub fn session_stats(&self, session_id: &str) -> Result<SessionStats> {
        self.sessions
            .get(session_id)
            .map(|session| lock_session(&session).stats())
            .ok_or_else(|| Error::UnknownSession(session_id.to_string()))
    }

    /// Drop a session and its state; returns whether it existed
    pub fn end_session(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id)
    }

    /// Drop sessions idle for longer than the configured limit
    pub fn evict_idle_sessions(&self) -> usize {
        self.sessions.evict_idle(self.config.session.max_idle())
    }

    /// Ids of all live sessions
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.ids()
    }
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Emotion;
    use crate::landmarks::LandmarkPoint;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedDetector(LandmarkSet);

    impl LandmarkDetector for FixedDetector {
        fn detect(&self, _frame: &Frame) -> Result<LandmarkSet> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "FixedDetector"
        }
    }

    /// Cycles through a list of distributions, one per call
    struct SequenceClassifier {
        outputs: Vec<ProbabilityVector>,
        calls: AtomicUsize,
    }

    impl SequenceClassifier {
        fn new(outputs: Vec<ProbabilityVector>) -> Self {
            Self {
                outputs,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl EmotionClassifier for SequenceClassifier {
        fn classify(&self, _face: &Frame) -> Result<ProbabilityVector> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outputs[call % self.outputs.len()])
        }

        fn name(&self) -> &str {
            "SequenceClassifier"
        }
    }

    fn one_hot(emotion: Emotion) -> ProbabilityVector {
        let mut values = [0.0; 7];
        values[emotion.index()] = 1.0;
        ProbabilityVector::new(values).unwrap()
    }

    fn frontal_face() -> LandmarkSet {
        let mut points: Vec<LandmarkPoint> = (0..300).map(|i| LandmarkPoint::new(i, 0.5, 0.5, 0.0)).collect();
        points[1] = LandmarkPoint::new(1, 0.5, 0.55, 0.0);
        points[33] = LandmarkPoint::new(33, 0.4, 0.45, 0.0);
        points[263] = LandmarkPoint::new(263, 0.6, 0.45, 0.0);
        LandmarkSet::new(points)
    }

    fn pipeline(outputs: Vec<ProbabilityVector>) -> FramePipeline<FixedDetector, SequenceClassifier> {
        FramePipeline::new(
            FixedDetector(frontal_face()),
            SequenceClassifier::new(outputs),
            Config::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_analyze_smooths_across_frames() {
        let pipeline = pipeline(vec![one_hot(Emotion::Happy), one_hot(Emotion::Sad), one_hot(Emotion::Sad)]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        let options = AnalyzeOptions::default();

        let first = pipeline.analyze(&frame, &options).unwrap();
        assert_eq!(first.label, ResultLabel::Emotion(Emotion::Happy));
        assert_eq!(first.confidence, 1.0);

        // Happy and Sad tie at 0.5; Happy has the lower index
        let second = pipeline.analyze(&frame, &options).unwrap();
        assert_eq!(second.label, ResultLabel::Emotion(Emotion::Happy));
        assert_eq!(second.confidence, 0.5);

        let third = pipeline.analyze(&frame, &options).unwrap();
        assert_eq!(third.label, ResultLabel::Emotion(Emotion::Sad));
        assert!((third.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert!(third.warnings.is_empty());
    }

    #[test]
    fn test_optional_fields() {
        let pipeline = pipeline(vec![one_hot(Emotion::Neutral)]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();

        let full = pipeline.analyze(&frame, &AnalyzeOptions::default()).unwrap();
        assert_eq!(full.landmarks.as_ref().map(LandmarkSet::len), Some(300));
        let metrics = full.metrics.unwrap();
        assert!(metrics.face_detected);
        assert_eq!(metrics.landmarks_count, 300);
        assert!(metrics.fps > 0.0);

        let bare = pipeline
            .analyze(&frame, &AnalyzeOptions::default().with_landmarks(false).with_metrics(false))
            .unwrap();
        assert!(bare.landmarks.is_none());
        assert!(bare.metrics.is_none());
        assert!(bare.warnings.is_empty());
    }

    #[test]
    fn test_no_face_leaves_state_untouched() {
        let pipeline = FramePipeline::new(
            FixedDetector(LandmarkSet::empty()),
            SequenceClassifier::new(vec![one_hot(Emotion::Fear)]),
            Config::default(),
        )
        .unwrap();
        let frame = Frame::filled(64, 64, [128, 128, 128]).unwrap();

        let result = pipeline.analyze(&frame, &AnalyzeOptions::default()).unwrap();
        assert_eq!(result.label, ResultLabel::NoFaceDetected);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.probabilities, ProbabilityVector::zeros());
        assert_eq!(result.warnings, vec![QualityWarning::NoFaceInFrame]);
        assert!(result.landmarks.is_none() && result.metrics.is_none());
        assert!(!result.face_detected());

        // The session was never created
        assert!(pipeline.session_stats(DEFAULT_SESSION_ID).is_err());
    }

    #[test]
    fn test_reset_session() {
        let pipeline = pipeline(vec![one_hot(Emotion::Angry), one_hot(Emotion::Surprise)]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        let options = AnalyzeOptions::default();

        pipeline.analyze(&frame, &options).unwrap();
        pipeline.reset_session(DEFAULT_SESSION_ID);

        let stats = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();
        assert_eq!((stats.smoothing_samples, stats.frame_samples, stats.inference_samples), (0, 0, 0));

        let result = pipeline.analyze(&frame, &options).unwrap();
        assert_eq!(result.probabilities, one_hot(Emotion::Surprise));
        assert_eq!(pipeline.health_snapshot(DEFAULT_SESSION_ID).active_sessions, 1);
    }

    #[test]
    fn test_partial_resets() {
        let pipeline = pipeline(vec![one_hot(Emotion::Angry)]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        pipeline.analyze(&frame, &AnalyzeOptions::default()).unwrap();

        pipeline.reset_metrics(DEFAULT_SESSION_ID);
        let stats = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();
        assert_eq!((stats.smoothing_samples, stats.frame_samples), (1, 0));

        pipeline.analyze(&frame, &AnalyzeOptions::default()).unwrap();
        pipeline.reset_smoothing(DEFAULT_SESSION_ID);
        let stats = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();
        assert_eq!((stats.smoothing_samples, stats.frame_samples), (0, 1));
    }

    #[test]
    fn test_reset_on_no_face_option() {
        let mut config = Config::default();
        config.smoothing.reset_on_no_face = true;

        struct Toggle(AtomicUsize);
        impl LandmarkDetector for Toggle {
            fn detect(&self, _frame: &Frame) -> Result<LandmarkSet> {
                // Face on even calls, none on odd calls
                if self.0.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                    Ok(frontal_face())
                } else {
                    Ok(LandmarkSet::empty())
                }
            }

            fn name(&self) -> &str {
                "Toggle"
            }
        }

        let pipeline = FramePipeline::new(
            Toggle(AtomicUsize::new(0)),
            SequenceClassifier::new(vec![one_hot(Emotion::Happy), one_hot(Emotion::Disgust)]),
            config,
        )
        .unwrap();
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        let options = AnalyzeOptions::default();

        pipeline.analyze(&frame, &options).unwrap();
        pipeline.analyze(&frame, &options).unwrap();
        let third = pipeline.analyze(&frame, &options).unwrap();

        // History was cleared by the faceless frame
        assert_eq!(third.probabilities, one_hot(Emotion::Disgust));
        let stats = pipeline.session_stats(DEFAULT_SESSION_ID).unwrap();
        assert_eq!(stats.frame_samples, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.metrics.window_size = 0;
        let result = FramePipeline::new(
            FixedDetector(frontal_face()),
            SequenceClassifier::new(vec![one_hot(Emotion::Happy)]),
            config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_vector_from_classifier_rejected() {
        let pipeline = pipeline(vec![ProbabilityVector::zeros()]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        let err = pipeline.analyze(&frame, &AnalyzeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidProbabilities(_)));
        assert!(pipeline.session_stats(DEFAULT_SESSION_ID).is_err());
    }

    #[test]
    fn test_result_json_shape() {
        let pipeline = pipeline(vec![one_hot(Emotion::Happy)]);
        let frame = Frame::filled(100, 100, [128, 128, 128]).unwrap();
        let result = pipeline
            .analyze(&frame, &AnalyzeOptions::default().with_landmarks(false))
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["emotion"], "Happy");
        assert_eq!(json["probabilities"]["Happy"], 1.0);
        assert!(json.get("landmarks").is_none());
        assert_eq!(json["metrics"]["face_detected"], true);
        assert!(json["timestamp"].as_f64().unwrap() > 0.0);
    }
}
