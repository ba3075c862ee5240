/// SFace embedding extractor using ONNX Runtime.
///
/// Produces 128-dimensional signatures meant to be compared with cosine
/// similarity. Outputs are L2-normalized.
use std::path::Path;

use crate::preprocessing::CanonicalImage;
use crate::recognition::domain::embedding_extractor::{EmbeddingExtractor, ExtractionError};
use crate::recognition::domain::similarity::l2_normalize;

const INPUT_SIZE: usize = 112;
/// SFace consumes raw 8-bit intensities.
const INPUT_SCALE: f32 = 255.0;

pub struct OnnxSfaceExtractor {
    session: ort::session::Session,
}

impl OnnxSfaceExtractor {
    pub fn new(model_path: &Path) -> Result<Self, ExtractionError> {
        let context = format!("cannot load {}", model_path.display());
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()
            .map_err(|e| describe(&context, e))?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| describe(&context, e))?
            .with_intra_threads(intra_threads)
            .map_err(|e| describe(&context, e))?
            .with_execution_providers(preferred_execution_providers())
            .map_err(|e| describe(&context, e))?
            .commit_from_file(model_path)
            .map_err(|e| describe(&context, e))?;
        log::info!("Loaded embedding model {}", model_path.display());
        Ok(Self { session })
    }
}

impl EmbeddingExtractor for OnnxSfaceExtractor {
    fn extract(&mut self, image: &CanonicalImage) -> Result<Vec<f32>, ExtractionError> {
        if image.size() == 0 {
            return Err(ExtractionError::new("canonical image is empty"));
        }
        let tensor = to_input_tensor(image);
        let input_value =
            ort::value::Tensor::from_array(tensor).map_err(|e| describe("bad input tensor", e))?;
        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|e| describe("inference failed", e))?;
        let embedding_array = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| describe("unexpected model output", e))?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or_else(|| ExtractionError::new("embedding output is not contiguous"))?;
        if embedding_slice.is_empty() {
            return Err(ExtractionError::new("model returned an empty embedding"));
        }

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(embedding)
    }
}

fn describe(context: &str, error: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::new(format!("{context}: {error}"))
}

/// Resample the canonical image to the model input, NCHW, RGB order.
fn to_input_tensor(image: &CanonicalImage) -> ndarray::Array4<f32> {
    let pixels = image.as_ndarray();
    let src = image.size() as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));
    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src as f64 / INPUT_SIZE as f64) as usize).min(src - 1);
        for x in 0..INPUT_SIZE {
            let src_x = (((x as f64 + 0.5) * src as f64 / INPUT_SIZE as f64) as usize).min(src - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = pixels[[src_y, src_x, c]] * INPUT_SCALE;
            }
        }
    }
    tensor
}

/// Platform-preferred execution providers; ONNX Runtime falls back to CPU.
fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}
