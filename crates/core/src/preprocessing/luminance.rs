//! Luma/chroma conversion and histogram equalization on 8-bit RGB buffers.
//!
//! Uses the analog YUV weights (BT.601 luma, chroma offset 128) with
//! rounding and saturation at every 8-bit step, so results are exact
//! integers and fully deterministic.

const KR: f32 = 0.299;
const KG: f32 = 0.587;
const KB: f32 = 0.114;
const U_SCALE: f32 = 0.492;
const V_SCALE: f32 = 0.877;
const CHROMA_OFFSET: f32 = 128.0;

fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

pub(crate) fn rgb_to_yuv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = KR * r + KG * g + KB * b;
    let u = (b - y) * U_SCALE + CHROMA_OFFSET;
    let v = (r - y) * V_SCALE + CHROMA_OFFSET;
    (saturate(y), saturate(u), saturate(v))
}

pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let du = (u as f32 - CHROMA_OFFSET) / U_SCALE;
    let dv = (v as f32 - CHROMA_OFFSET) / V_SCALE;
    let r = y + dv;
    let b = y + du;
    let g = (y - KR * r - KB * b) / KG;
    (saturate(r), saturate(g), saturate(b))
}

/// Lookup table that spreads the cumulative histogram over `0..=255`.
///
/// A channel holding a single value maps onto itself.
pub(crate) fn equalization_lut(channel: &[u8]) -> [u8; 256] {
    let mut hist = [0usize; 256];
    for &v in channel {
        hist[v as usize] += 1;
    }

    let mut lut = [0u8; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = i as u8;
    }

    let total = channel.len();
    let Some(first) = hist.iter().position(|&count| count > 0) else {
        return lut;
    };
    let cdf_min = hist[first];
    if cdf_min == total {
        return lut;
    }

    let scale = 255.0 / (total - cdf_min) as f64;
    let mut cdf = 0usize;
    for (i, &count) in hist.iter().enumerate() {
        cdf += count;
        lut[i] = if i < first {
            0
        } else {
            ((cdf - cdf_min) as f64 * scale).round().clamp(0.0, 255.0) as u8
        };
    }
    lut
}

/// Equalizes luma only, in place, leaving chroma untouched.
pub(crate) fn equalize_luma(rgb: &mut [u8]) {
    let mut y_plane = Vec::with_capacity(rgb.len() / 3);
    let mut chroma = Vec::with_capacity(rgb.len() / 3);
    for px in rgb.chunks_exact(3) {
        let (y, u, v) = rgb_to_yuv(px[0], px[1], px[2]);
        y_plane.push(y);
        chroma.push((u, v));
    }

    let lut = equalization_lut(&y_plane);

    for ((px, &y), &(u, v)) in rgb.chunks_exact_mut(3).zip(&y_plane).zip(&chroma) {
        let (r, g, b) = yuv_to_rgb(lut[y as usize], u, v);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
}
