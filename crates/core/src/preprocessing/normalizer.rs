use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

use crate::preprocessing::canonical_image::CanonicalImage;
use crate::preprocessing::luminance::equalize_luma;
use crate::preprocessing::preprocess_error::PreprocessError;
use crate::shared::face_image::{FaceImage, ImageLayoutError};

/// Converts a face crop into a `size`×`size` canonical image.
///
/// Steps, in order:
/// 1. bilinear resize to `size`×`size`
/// 2. grayscale → RGB by channel replication
/// 3. histogram-equalize luma only (chroma preserved)
/// 4. scale 8-bit intensities to `[0, 1]`
///
/// Pure and deterministic: identical input yields bit-identical output.
pub fn normalize(image: &FaceImage, size: u32) -> Result<CanonicalImage, PreprocessError> {
    if image.is_empty() {
        return Err(PreprocessError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    if size == 0 {
        return Err(PreprocessError::InvalidSize);
    }

    let mut rgb = match image.channels() {
        1 => {
            let gray = GrayImage::from_raw(image.width(), image.height(), image.data().to_vec())
                .ok_or_else(|| layout_error(image))?;
            let resized = imageops::resize(&gray, size, size, FilterType::Triangle);
            replicate_gray(resized.as_raw())
        }
        3 => {
            let color = RgbImage::from_raw(image.width(), image.height(), image.data().to_vec())
                .ok_or_else(|| layout_error(image))?;
            imageops::resize(&color, size, size, FilterType::Triangle).into_raw()
        }
        other => return Err(ImageLayoutError::UnsupportedChannels(other).into()),
    };

    equalize_luma(&mut rgb);
    Ok(CanonicalImage::from_rgb_bytes(&rgb, size))
}

fn replicate_gray(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&v| [v, v, v]).collect()
}

fn layout_error(image: &FaceImage) -> PreprocessError {
    let channels = image.channels();
    PreprocessError::InvalidLayout(ImageLayoutError::LengthMismatch {
        width: image.width(),
        height: image.height(),
        channels,
        expected: (image.width() as usize) * (image.height() as usize) * (channels as usize),
        actual: image.data().len(),
    })
}
