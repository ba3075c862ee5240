use thiserror::Error;

use crate::preprocessing::CanonicalImage;

#[derive(Error, Debug)]
#[error("embedding extraction failed: {message}")]
pub struct ExtractionError {
    message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Domain interface for turning a canonical face into a signature.
///
/// Every call for one extractor instance must return vectors of the same
/// length. Implementations may hold inference state, hence `&mut self`.
/// Extraction is synchronous and never retried by the engine.
pub trait EmbeddingExtractor: Send {
    fn extract(&mut self, image: &CanonicalImage) -> Result<Vec<f32>, ExtractionError>;
}
