use thiserror::Error;

use crate::preprocessing::PreprocessError;
use crate::recognition::domain::embedding_extractor::ExtractionError;
use crate::recognition::domain::signature_store::StoreError;
use crate::recognition::infrastructure::signature_codec::PersistenceError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl EngineError {
    /// True when the caller handed in something malformed (an empty image,
    /// a bad signature) rather than an environment or model failure.
    pub fn is_input_error(&self) -> bool {
        matches!(self, EngineError::Preprocess(_) | EngineError::Store(_))
    }
}
