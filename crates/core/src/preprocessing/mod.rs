//! Conditions face crops into the canonical form the embedding extractor
//! expects. Enrollment and recognition both go through [`normalize`].

pub mod canonical_image;
mod luminance;
pub mod normalizer;
pub mod preprocess_error;

pub use canonical_image::CanonicalImage;
pub use normalizer::normalize;
pub use preprocess_error::PreprocessError;
