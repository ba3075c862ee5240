use ndarray::{Array3, ArrayView3};

/// A normalized face: square, three-channel RGB, intensities in `[0, 1]`.
///
/// Layout is `(height, width, channel)`. Only [`normalize`] builds these,
/// so every instance has passed through the same conditioning steps.
///
/// [`normalize`]: crate::preprocessing::normalize
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalImage {
    pixels: Array3<f32>,
}

impl CanonicalImage {
    pub(crate) fn from_rgb_bytes(rgb: &[u8], size: u32) -> Self {
        let side = size as usize;
        let pixels = Array3::from_shape_fn((side, side, 3), |(y, x, c)| {
            rgb[(y * side + x) * 3 + c] as f32 / 255.0
        });
        Self { pixels }
    }

    /// Side length in pixels.
    pub fn size(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, f32> {
        self.pixels.view()
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let (x, y) = (x as usize, y as usize);
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
        ]
    }

    /// Bit-level equality, distinguishing e.g. `0.0` from `-0.0`.
    pub fn bit_identical(&self, other: &CanonicalImage) -> bool {
        self.pixels.shape() == other.pixels.shape()
            && self
                .pixels
                .iter()
                .zip(other.pixels.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_rgb_bytes_scales_to_unit_range() {
        let mut rgb = vec![0u8; 2 * 2 * 3];
        rgb[3] = 255; // (x=1, y=0) red
        rgb[11] = 51; // (x=1, y=1) blue
        let img = CanonicalImage::from_rgb_bytes(&rgb, 2);

        assert_eq!(img.size(), 2);
        assert_eq!(img.as_ndarray().shape(), &[2, 2, 3]);
        assert_eq!(img.pixel(1, 0), [1.0, 0.0, 0.0]);
        assert_relative_eq!(img.pixel(1, 1)[2], 0.2);
    }

    #[test]
    fn test_bit_identical() {
        let a = CanonicalImage::from_rgb_bytes(&[10, 20, 30], 1);
        let b = CanonicalImage::from_rgb_bytes(&[10, 20, 30], 1);
        let c = CanonicalImage::from_rgb_bytes(&[10, 20, 31], 1);
        assert!(a.bit_identical(&b));
        assert!(!a.bit_identical(&c));
    }
}
