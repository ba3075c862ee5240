use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageLayoutError {
    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(u8),
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    LengthMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

/// A cropped face region: contiguous 8-bit pixels in row-major order.
///
/// Either single-channel (grayscale) or three-channel RGB. A zero-area
/// image is representable so that preprocessing can reject it explicitly.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl FaceImage {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self, ImageLayoutError> {
        if channels != 1 && channels != 3 {
            return Err(ImageLayoutError::UnsupportedChannels(channels));
        }
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(ImageLayoutError::LengthMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    pub fn from_rgb(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            channels: 3,
        }
    }

    pub fn from_luma(img: image::GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
            channels: 1,
        }
    }

    /// Decodes an image file. Grayscale sources stay single-channel;
    /// everything else is converted to RGB (alpha is dropped).
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        let decoded = image::open(path)?;
        let is_gray = matches!(
            decoded.color(),
            image::ColorType::L8
                | image::ColorType::La8
                | image::ColorType::L16
                | image::ColorType::La16
        );
        if is_gray {
            Ok(Self::from_luma(decoded.to_luma8()))
        } else {
            Ok(Self::from_rgb(decoded.to_rgb8()))
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
