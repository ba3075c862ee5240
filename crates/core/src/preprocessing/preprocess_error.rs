use thiserror::Error;

use crate::shared::face_image::ImageLayoutError;

#[derive(Error, Debug, PartialEq)]
pub enum PreprocessError {
    #[error("face image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("canonical size must be positive")]
    InvalidSize,
    #[error("invalid face image: {0}")]
    InvalidLayout(#[from] ImageLayoutError),
}
