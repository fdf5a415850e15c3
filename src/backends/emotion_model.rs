use super::EmotionClassifier;
use crate::{
    config::ClassifierConfig,
    emotion::ProbabilityVector,
    frame::Frame,
    utils::image_conversion::{luma_to_nchw, rgb_to_nchw},
    Error, Result,
};
use ndarray::CowArray;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Emotion classifier using `ONNX` Runtime
///
/// Expects a FER-style model: a square face crop in, seven scores out in
/// the fixed label order.
pub struct OnnxEmotionClassifier {
    session: Session,
    input_size: u32,
    grayscale: bool,
    apply_softmax: bool,
}

impl OnnxEmotionClassifier {
    /// Create a new classifier from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or outputs
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P, config: &ClassifierConfig) -> Result<Self> {
        log::info!(
            "Initializing OnnxEmotionClassifier with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("emotion_classifier")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size: config.input_size,
            grayscale: config.grayscale,
            apply_softmax: config.apply_softmax,
        })
    }

    /// Run forward pass through the model
    fn forward(&self, face: &Frame) -> Result<Vec<f32>> {
        let inputs = if self.grayscale {
            luma_to_nchw(face.image(), self.input_size)
        } else {
            rgb_to_nchw(face.image(), self.input_size)
        };
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let scores_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;
        let scores_tensor = scores_output.try_extract::<f32>()?;
        let scores_view = scores_tensor.view();
        let scores = scores_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(scores.to_vec())
    }

    /// Turn raw model scores into a probability vector
    fn postprocess(scores: &[f32], apply_softmax: bool) -> Result<ProbabilityVector> {
        let probabilities = if apply_softmax {
            ProbabilityVector::from_logits(scores)
        } else {
            ProbabilityVector::from_slice(scores)
        };
        probabilities.map_err(|e| Error::Classification(format!("Unusable model output: {e}")))
    }
}

impl EmotionClassifier for OnnxEmotionClassifier {
    fn classify(&self, face: &Frame) -> Result<ProbabilityVector> {
        let scores = self.forward(face)?;
        Self::postprocess(&scores, self.apply_softmax)
    }

    fn name(&self) -> &str {
        "OnnxEmotionClassifier"
    }
}
