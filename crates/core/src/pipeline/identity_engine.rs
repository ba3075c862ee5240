use std::path::Path;

use crate::pipeline::engine_error::EngineError;
use crate::preprocessing::normalize;
use crate::recognition::domain::embedding_extractor::EmbeddingExtractor;
use crate::recognition::domain::identity_record::RecordId;
use crate::recognition::domain::match_verdict::MatchVerdict;
use crate::recognition::domain::matcher;
use crate::recognition::domain::signature_store::SignatureStore;
use crate::recognition::infrastructure::signature_codec;
use crate::shared::face_image::FaceImage;
use crate::shared::recognition_config::RecognitionConfig;

/// Enrollment and recognition over one signature store.
///
/// Images always take the same path, normalize → extract, for both
/// enrollment and recognition so their signatures stay comparable.
/// Single-writer: wrap in a `Mutex` to share across threads.
pub struct IdentityEngine {
    extractor: Box<dyn EmbeddingExtractor>,
    store: SignatureStore,
    config: RecognitionConfig,
}

impl IdentityEngine {
    pub fn new(extractor: Box<dyn EmbeddingExtractor>, config: RecognitionConfig) -> Self {
        Self {
            extractor,
            store: SignatureStore::new(),
            config,
        }
    }

    /// Enrolls one sample of `name`. Repeated calls add more samples.
    pub fn enroll_image(&mut self, name: &str, image: &FaceImage) -> Result<RecordId, EngineError> {
        let signature = self.signature_of(image)?;
        self.enroll(name, signature)
    }

    /// Recognizes the face in `image`.
    ///
    /// Extraction is skipped while the store is empty; a malformed image
    /// is still reported as an error.
    pub fn recognize_image(&mut self, image: &FaceImage) -> Result<MatchVerdict, EngineError> {
        let canonical = normalize(image, self.config.canonical_size())?;
        if self.store.is_empty() {
            return Ok(MatchVerdict::Empty);
        }
        let query = self.extractor.extract(&canonical)?;
        Ok(self.recognize(&query))
    }

    pub fn enroll(&mut self, name: &str, signature: Vec<f32>) -> Result<RecordId, EngineError> {
        let id = self.store.enroll(name, signature)?;
        log::info!("Enrolled '{name}' ({} records)", self.store.len());
        Ok(id)
    }

    pub fn recognize(&self, query: &[f32]) -> MatchVerdict {
        matcher::recognize(&self.store, query, self.config.threshold())
    }

    pub fn save(&self, base: &Path) -> Result<(), EngineError> {
        signature_codec::save(&self.store, base)?;
        Ok(())
    }

    /// Replaces the store with the database at `base`, returning the new
    /// record count. On any failure the current records are kept.
    pub fn load(&mut self, base: &Path) -> Result<usize, EngineError> {
        let loaded = signature_codec::load(base)?;
        self.store.replace_with(loaded);
        Ok(self.store.len())
    }

    pub fn reset(&mut self) {
        self.store.clear();
        log::info!("Signature store cleared");
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn store(&self) -> &SignatureStore {
        &self.store
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    fn signature_of(&mut self, image: &FaceImage) -> Result<Vec<f32>, EngineError> {
        let canonical = normalize(image, self.config.canonical_size())?;
        Ok(self.extractor.extract(&canonical)?)
    }
}
