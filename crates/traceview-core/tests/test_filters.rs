mod common;

use common::{gradient_frame, solid_frame};
use traceview_core::consts::{BINARY_THRESHOLD, PLACEHOLDER_SIZE};
use traceview_core::filters::{self, apply_contrast, ContrastMode};

// ---------------------------------------------------------------------------
// Determinism and purity
// ---------------------------------------------------------------------------

#[test]
fn every_mode_is_deterministic_and_size_preserving() {
    let frame = gradient_frame(321, 123, 0);
    for mode in ContrastMode::ALL {
        let first = apply_contrast(&frame.image, mode);
        let second = apply_contrast(&frame.image, mode);
        assert_eq!(
            first.as_raw(),
            second.as_raw(),
            "mode {:?} is not deterministic",
            mode
        );
        assert_eq!((first.width(), first.height()), (321, 123));
    }
}

#[test]
fn pipeline_does_not_mutate_the_source() {
    let frame = gradient_frame(64, 64, 0);
    let before = frame.image.as_raw().clone();
    let _ = filters::apply(Some(&frame), ContrastMode::Binary, true);
    assert_eq!(frame.image.as_raw(), &before);
}

#[test]
fn parallel_and_serial_paths_agree() {
    // 512x512 crosses the parallelism threshold; a 64x64 crop of the same
    // gradient stays serial. Identical pixels must map identically.
    let large = gradient_frame(512, 512, 0);
    let small = gradient_frame(64, 64, 0);
    let large_out = apply_contrast(&large.image, ContrastMode::HighContrastColor);
    let small_out = apply_contrast(&small.image, ContrastMode::HighContrastColor);
    for y in 0..64 {
        for x in 0..64 {
            assert_eq!(large_out.get_pixel(x, y), small_out.get_pixel(x, y));
        }
    }
}

// ---------------------------------------------------------------------------
// Mode semantics
// ---------------------------------------------------------------------------

#[test]
fn cycle_visits_all_modes_in_order() {
    let mut mode = ContrastMode::Normal;
    let mut seen = vec![mode];
    loop {
        mode = mode.next();
        if mode == ContrastMode::Normal {
            break;
        }
        seen.push(mode);
    }
    assert_eq!(seen, ContrastMode::ALL.to_vec());
}

#[test]
fn binary_splits_around_threshold() {
    let below = solid_frame(4, 4, [BINARY_THRESHOLD - 10; 3], 0);
    let above = solid_frame(4, 4, [BINARY_THRESHOLD + 10; 3], 0);
    let below_out = apply_contrast(&below.image, ContrastMode::Binary);
    let above_out = apply_contrast(&above.image, ContrastMode::Binary);
    assert_eq!(below_out.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(above_out.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn grayscale_modes_have_equal_channels() {
    let frame = gradient_frame(40, 40, 0);
    for mode in [
        ContrastMode::InvertedGray,
        ContrastMode::HighContrastGray,
        ContrastMode::InvertedHighContrastGray,
    ] {
        let out = apply_contrast(&frame.image, mode);
        for px in out.pixels() {
            assert_eq!(px.0[0], px.0[1], "mode {mode:?}");
            assert_eq!(px.0[1], px.0[2], "mode {mode:?}");
        }
    }
}

#[test]
fn inverted_gray_flips_brightness() {
    let dark = solid_frame(4, 4, [20, 20, 20], 0);
    let out = apply_contrast(&dark.image, ContrastMode::InvertedGray);
    assert_eq!(out.get_pixel(0, 0).0, [235, 235, 235]);
}

// ---------------------------------------------------------------------------
// Placeholder and trace enhancement
// ---------------------------------------------------------------------------

#[test]
fn missing_frame_yields_placeholder_not_error() {
    let out = filters::apply(None, ContrastMode::Binary, true);
    assert_eq!((out.width(), out.height()), PLACEHOLDER_SIZE);
    let again = filters::apply(None, ContrastMode::Binary, true);
    assert_eq!(out.as_raw(), again.as_raw());
}

#[test]
fn trace_enhancement_thickens_a_thin_line() {
    // One bright column on black; after dilation its neighbors light up.
    let mut image = image::RgbImage::new(32, 32);
    for y in 0..32 {
        image.put_pixel(16, y, image::Rgb([255, 255, 255]));
    }
    let frame = traceview_core::frame::SourceFrame::new(image, 0);
    let out = filters::apply(Some(&frame), ContrastMode::Normal, true);
    assert_eq!(out.get_pixel(15, 10).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(17, 10).0, [255, 255, 255]);
    assert_eq!(out.get_pixel(10, 10).0, [0, 0, 0]);
}
