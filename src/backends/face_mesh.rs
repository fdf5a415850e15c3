use super::{sigmoid, LandmarkDetector};
use crate::{
    config::LandmarkModelConfig,
    frame::Frame,
    landmarks::{LandmarkPoint, LandmarkSet},
    utils::image_conversion::rgb_to_nchw,
    Error, Result,
};
use ndarray::CowArray;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Values per landmark in the model output (x, y, z)
const COORDS_PER_LANDMARK: usize = 3;

/// Face-mesh landmark detector using `ONNX` Runtime
///
/// The whole frame is stretched to the square model input, so coordinates
/// divided by the input size are already normalized to the frame.
pub struct OnnxLandmarkDetector {
    session: Session,
    input_size: u32,
    presence_threshold: f32,
}

impl OnnxLandmarkDetector {
    /// Create a new landmark detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The model has no inputs or outputs
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P, config: &LandmarkModelConfig) -> Result<Self> {
        log::info!(
            "Initializing OnnxLandmarkDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("landmark_detector")
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
            presence_threshold: config.presence_threshold,
        })
    }

    /// Run the model and return raw coordinates plus the optional presence logit
    fn forward(&self, frame: &Frame) -> Result<(Vec<f32>, Option<f32>)> {
        let inputs = rgb_to_nchw(frame.image(), self.input_size);
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        let mut outputs = outputs.into_iter();

        let coords_output = outputs
            .next()
            .ok_or_else(|| Error::ModelOutputError("No output from model".to_string()))?;
        let coords_tensor = coords_output.try_extract::<f32>()?;
        let coords_view = coords_tensor.view();
        let coords = coords_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutputError("Failed to get landmark data".to_string()))?
            .to_vec();

        let presence = match outputs.next() {
            Some(output) => {
                let tensor = output.try_extract::<f32>()?;
                let view = tensor.view();
                let logit = view.iter().next().copied();
                logit
            }
            None => None,
        };

        Ok((coords, presence))
    }

    /// Convert model output into normalized landmarks
    #[allow(clippy::cast_precision_loss)] // Input sizes are small
    fn postprocess(
        coords: &[f32],
        presence_logit: Option<f32>,
        input_size: u32,
        presence_threshold: f32,
    ) -> Result<LandmarkSet> {
        if let Some(logit) = presence_logit {
            if sigmoid(logit) < presence_threshold {
                return Ok(LandmarkSet::empty());
            }
        }

        if coords.is_empty() || coords.len() % COORDS_PER_LANDMARK != 0 {
            return Err(Error::ModelDataFormatError(format!(
                "Landmark output has {} values, expected a non-empty multiple of {COORDS_PER_LANDMARK}",
                coords.len()
            )));
        }

        let scale = f64::from(input_size);
        let points = coords
            .chunks_exact(COORDS_PER_LANDMARK)
            .enumerate()
            .map(|(index, c)| {
                LandmarkPoint::new(
                    index,
                    f64::from(c[0]) / scale,
                    f64::from(c[1]) / scale,
                    f64::from(c[2]) / scale,
                )
            })
            .collect();

        Ok(LandmarkSet::new(points))
    }
}

impl LandmarkDetector for OnnxLandmarkDetector {
    fn detect(&self, frame: &Frame) -> Result<LandmarkSet> {
        let (coords, presence) = self.forward(frame)?;
        let landmarks = Self::postprocess(&coords, presence, self.input_size, self.presence_threshold)?;
        log::debug!("Detected {} landmarks", landmarks.len());
        Ok(landmarks)
    }

    fn name(&self) -> &str {
        "OnnxLandmarkDetector"
    }
}
