//! Color-space helpers shared by the contrast modes: normalized RGB/HSV
//! conversion, BT.601 luminance, and RGB <-> grayscale array bridging.

use image::RgbImage;
use ndarray::Array2;

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// BT.601 luminance of a normalized RGB triple.
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// RGB (each in [0,1]) to HSV (h in [0,360), s and v in [0,1]).
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// HSV back to RGB, all components in [0,1].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (r1 + m, g1 + m, b1 + m)
}

/// Collapse an RGB bitmap to a BT.601 grayscale array in [0,1],
/// shape = (height, width).
pub fn to_gray_array(image: &RgbImage) -> Array2<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut gray = Array2::<f32>::zeros((h, w));
    for (x, y, px) in image.enumerate_pixels() {
        let [r, g, b] = px.0;
        gray[[y as usize, x as usize]] = luminance(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        );
    }
    gray
}

/// Expand a grayscale array back to an RGB bitmap with equal channels.
pub fn gray_array_to_rgb(gray: &Array2<f32>) -> RgbImage {
    let (h, w) = gray.dim();
    RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let v = (gray[[y as usize, x as usize]].clamp(0.0, 1.0) * 255.0).round() as u8;
        image::Rgb([v, v, v])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_round_trip_primaries() {
        for &(r, g, b) in &[
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (0.5, 0.25, 0.75),
            (0.3, 0.3, 0.3),
        ] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-5, "r: {r} vs {r2}");
            assert!((g - g2).abs() < 1e-5, "g: {g} vs {g2}");
            assert!((b - b2).abs() < 1e-5, "b: {b} vs {b2}");
        }
    }

    #[test]
    fn luminance_weights_sum_to_one() {
        assert!((luminance(1.0, 1.0, 1.0) - 1.0).abs() < 1e-6);
    }
}
