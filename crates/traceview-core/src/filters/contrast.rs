//! The closed set of contrast remapping modes and their per-pixel math.

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{
    BINARY_THRESHOLD, ENHANCED_CONTRAST_GAIN, ENHANCED_SATURATION_GAIN, GRAY_CONTRAST_GAIN,
    HIGH_CONTRAST_CHROMA_GAIN, HIGH_CONTRAST_GAIN, PARALLEL_PIXEL_THRESHOLD,
};
use crate::filters::color::{hsv_to_rgb, luminance, rgb_to_hsv};

/// Contrast remapping modes, in the operator's cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContrastMode {
    Normal,
    EnhancedColor,
    HighContrastColor,
    SmartInvert,
    InvertedGray,
    HighContrastGray,
    InvertedHighContrastGray,
    Binary,
}

impl ContrastMode {
    pub const ALL: [ContrastMode; 8] = [
        ContrastMode::Normal,
        ContrastMode::EnhancedColor,
        ContrastMode::HighContrastColor,
        ContrastMode::SmartInvert,
        ContrastMode::InvertedGray,
        ContrastMode::HighContrastGray,
        ContrastMode::InvertedHighContrastGray,
        ContrastMode::Binary,
    ];

    /// Next mode in cycle order, wrapping back to Normal.
    pub fn next(self) -> ContrastMode {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Short status-line label.
    pub fn label(self) -> &'static str {
        match self {
            ContrastMode::Normal => "Normal",
            ContrastMode::EnhancedColor => "Enhanced Color",
            ContrastMode::HighContrastColor => "High-Con Color",
            ContrastMode::SmartInvert => "Smart Invert",
            ContrastMode::InvertedGray => "Inverted Gray",
            ContrastMode::HighContrastGray => "HC Gray",
            ContrastMode::InvertedHighContrastGray => "Inv HC Gray",
            ContrastMode::Binary => "Binary",
        }
    }
}

impl Default for ContrastMode {
    fn default() -> Self {
        ContrastMode::Normal
    }
}

/// Apply a contrast mode to every pixel. Dimensions are preserved and the
/// output depends only on the input bytes and the mode.
pub fn apply_contrast(image: &RgbImage, mode: ContrastMode) -> RgbImage {
    match mode {
        ContrastMode::Normal => image.clone(),
        ContrastMode::EnhancedColor => map_pixels(image, enhanced_color),
        ContrastMode::HighContrastColor => map_pixels(image, high_contrast_color),
        ContrastMode::SmartInvert => map_pixels(image, smart_invert),
        ContrastMode::InvertedGray => map_pixels(image, inverted_gray),
        ContrastMode::HighContrastGray => map_pixels(image, high_contrast_gray),
        ContrastMode::InvertedHighContrastGray => map_pixels(image, inverted_high_contrast_gray),
        ContrastMode::Binary => map_pixels(image, binary),
    }
}

/// Midpoint contrast gain: stretches values away from 0.5.
fn contrast_gain(c: f32, gain: f32) -> f32 {
    ((c - 0.5) * gain + 0.5).clamp(0.0, 1.0)
}

fn enhanced_color(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    let (r, g, b) = hsv_to_rgb(h, (s * ENHANCED_SATURATION_GAIN).min(1.0), v);
    (
        contrast_gain(r, ENHANCED_CONTRAST_GAIN),
        contrast_gain(g, ENHANCED_CONTRAST_GAIN),
        contrast_gain(b, ENHANCED_CONTRAST_GAIN),
    )
}

fn high_contrast_color(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let r = contrast_gain(r, HIGH_CONTRAST_GAIN);
    let g = contrast_gain(g, HIGH_CONTRAST_GAIN);
    let b = contrast_gain(b, HIGH_CONTRAST_GAIN);
    let (h, s, v) = rgb_to_hsv(r, g, b);
    hsv_to_rgb(h, (s * HIGH_CONTRAST_CHROMA_GAIN).min(1.0), v)
}

/// Inverts brightness while preserving hue, so colored traces keep their
/// color identity instead of flipping to the complement.
fn smart_invert(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    hsv_to_rgb(h, s, 1.0 - v)
}

fn inverted_gray(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = 1.0 - luminance(r, g, b);
    (l, l, l)
}

fn high_contrast_gray(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = contrast_gain(luminance(r, g, b), GRAY_CONTRAST_GAIN);
    (l, l, l)
}

fn inverted_high_contrast_gray(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = 1.0 - contrast_gain(luminance(r, g, b), GRAY_CONTRAST_GAIN);
    (l, l, l)
}

fn binary(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let l = if luminance(r, g, b) * 255.0 > BINARY_THRESHOLD as f32 {
        1.0
    } else {
        0.0
    };
    (l, l, l)
}

fn map_pixels<F>(image: &RgbImage, f: F) -> RgbImage
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32) + Sync,
{
    let (w, h) = (image.width(), image.height());
    let mut buf = image.as_raw().clone();

    let remap = |px: &mut [u8]| {
        let (r, g, b) = f(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
        );
        px[0] = (r.clamp(0.0, 1.0) * 255.0).round() as u8;
        px[1] = (g.clamp(0.0, 1.0) * 255.0).round() as u8;
        px[2] = (b.clamp(0.0, 1.0) * 255.0).round() as u8;
    };

    if (w as usize) * (h as usize) >= PARALLEL_PIXEL_THRESHOLD {
        buf.par_chunks_exact_mut(3).for_each(remap);
    } else {
        buf.chunks_exact_mut(3).for_each(remap);
    }

    RgbImage::from_raw(w, h, buf).expect("remapped buffer keeps its dimensions")
}
