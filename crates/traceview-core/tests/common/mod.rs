#![allow(dead_code)]

use image::{Rgb, RgbImage};
use traceview_core::frame::SourceFrame;
use traceview_core::view::ViewState;

/// Diagonal gradient bitmap; every pixel differs from its neighbors so
/// resampling and filter regressions show up as byte changes.
pub fn gradient_frame(width: u32, height: u32, seq: u64) -> SourceFrame {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    SourceFrame::new(image, seq)
}

pub fn solid_frame(width: u32, height: u32, rgb: [u8; 3], seq: u64) -> SourceFrame {
    SourceFrame::new(RgbImage::from_pixel(width, height, Rgb(rgb)), seq)
}

/// View over `image`-sized content in a `viewport`-sized window.
pub fn view_state(image: (u32, u32), viewport: (u32, u32)) -> ViewState {
    let mut view = ViewState::new(viewport);
    view.set_image_size(image);
    view
}
