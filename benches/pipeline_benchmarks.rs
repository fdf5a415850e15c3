//! Benchmarks for the frame analysis pipeline with in-process backends

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emotion_frame_analysis::{
    backends::{EmotionClassifier, LandmarkDetector},
    config::Config,
    emotion::ProbabilityVector,
    frame::Frame,
    geometry::PoseLandmarks,
    landmarks::LandmarkSet,
    pipeline::{AnalyzeOptions, FramePipeline},
    quality::{assess_quality, QualityConfig},
    utils::image_conversion::{luma_to_nchw, rgb_to_nchw},
    Result,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

/// Landmarks scattered around the frame center
struct StaticDetector(LandmarkSet);

impl LandmarkDetector for StaticDetector {
    fn detect(&self, _frame: &Frame) -> Result<LandmarkSet> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "StaticDetector"
    }
}

/// Uniform distribution regardless of input
struct UniformClassifier;

impl EmotionClassifier for UniformClassifier {
    fn classify(&self, face: &Frame) -> Result<ProbabilityVector> {
        black_box(face.mean_luma());
        ProbabilityVector::from_logits(&[0.0; 7])
    }

    fn name(&self) -> &str {
        "UniformClassifier"
    }
}

fn face_landmarks() -> LandmarkSet {
    let mut rng = StdRng::seed_from_u64(3);
    let coords: Vec<(f64, f64, f64)> = (0..468)
        .map(|_| (rng.gen_range(0.35..0.65), rng.gen_range(0.3..0.7), rng.gen_range(-0.05..0.05)))
        .collect();
    LandmarkSet::from_coordinates(&coords)
}

/// Benchmark a full analyze call across frame sizes
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    group.measurement_time(Duration::from_secs(10));

    let pipeline = FramePipeline::new(StaticDetector(face_landmarks()), UniformClassifier, Config::default()).unwrap();

    for (width, height) in [(320, 240), (640, 480), (1280, 720)] {
        let frame = Frame::filled(width, height, [120, 110, 100]).unwrap();
        group.bench_with_input(
            BenchmarkId::new("frame", format!("{width}x{height}")),
            &frame,
            |b, frame| {
                let options = AnalyzeOptions::default().with_landmarks(false);
                b.iter(|| black_box(pipeline.analyze(frame, &options).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark model input preparation
fn bench_tensor_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_conversion");
    let frame = Frame::filled(640, 480, [90, 140, 200]).unwrap();

    group.bench_function("rgb_to_nchw_192", |b| {
        b.iter(|| black_box(rgb_to_nchw(frame.image(), 192)));
    });
    group.bench_function("luma_to_nchw_48", |b| {
        b.iter(|| black_box(luma_to_nchw(frame.image(), 48)));
    });

    group.finish();
}

/// Benchmark quality assessment
fn bench_quality(c: &mut Criterion) {
    let frame = Frame::filled(640, 480, [128, 128, 128]).unwrap();
    let landmarks = face_landmarks();
    let config = QualityConfig::default();
    let pose = PoseLandmarks::default();

    c.bench_function("assess_quality_640x480", |b| {
        b.iter(|| black_box(assess_quality(&frame, &landmarks, &config, &pose)));
    });
}

criterion_group!(benches, bench_analyze, bench_tensor_conversion, bench_quality);
criterion_main!(benches);
