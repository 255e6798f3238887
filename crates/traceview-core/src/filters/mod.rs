//! Bitmap filter pipeline: source bitmap + contrast mode + trace
//! enhancement -> displayable bitmap. Every stage is a pure function of
//! its inputs, so identical inputs always produce identical bytes.

pub mod color;
pub mod contrast;
pub mod trace;

use image::RgbImage;

pub use contrast::{apply_contrast, ContrastMode};
pub use trace::enhance_traces;

use crate::consts::{BACKGROUND_GRAY, PLACEHOLDER_SIZE};
use crate::frame::SourceFrame;

/// Run the full filter pipeline on a source frame.
///
/// Trace enhancement runs after the contrast mode. An absent frame yields
/// the designated "no content" placeholder instead of an error.
pub fn apply(frame: Option<&SourceFrame>, mode: ContrastMode, trace_enhancement: bool) -> RgbImage {
    let Some(frame) = frame else {
        return placeholder();
    };
    let mut out = apply_contrast(&frame.image, mode);
    if trace_enhancement {
        out = enhance_traces(&out);
    }
    out
}

/// Fixed placeholder bitmap shown when no document or capture is loaded.
pub fn placeholder() -> RgbImage {
    let (w, h) = PLACEHOLDER_SIZE;
    RgbImage::from_pixel(w, h, image::Rgb([BACKGROUND_GRAY; 3]))
}
