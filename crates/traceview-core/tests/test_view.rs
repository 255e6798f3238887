mod common;

use approx::assert_abs_diff_eq;
use common::view_state;
use traceview_core::consts::{ENHANCED_MODE_ZOOM, MAX_ZOOM, MIN_ZOOM};
use traceview_core::filters::ContrastMode;
use traceview_core::geometry::{ImagePoint, ViewPoint};

// ---------------------------------------------------------------------------
// Transform round trip
// ---------------------------------------------------------------------------

#[test]
fn transform_round_trips_within_tolerance() {
    let mut view = view_state((1553, 977), (800, 600));
    view.set_zoom(3.7, ViewPoint::new(400.0, 300.0));
    view.set_pan((-213.4, -87.9));

    for &(x, y) in &[
        (0.0, 0.0),
        (1552.0, 976.0),
        (776.5, 488.5),
        (13.25, 913.75),
    ] {
        let p = ImagePoint::new(x, y);
        let back = view.to_image(view.to_view(p));
        assert_abs_diff_eq!(back.x, p.x, epsilon = 1e-6);
        assert_abs_diff_eq!(back.y, p.y, epsilon = 1e-6);
    }
}

// ---------------------------------------------------------------------------
// Zoom anchoring and saturation
// ---------------------------------------------------------------------------

#[test]
fn zoom_keeps_anchor_point_fixed() {
    let mut view = view_state((4000, 4000), (800, 600));
    view.set_zoom(2.0, ViewPoint::new(400.0, 300.0));
    view.set_pan((-1000.0, -1000.0));

    let anchor = ViewPoint::new(250.0, 420.0);
    let pinned = view.to_image(anchor);
    // Interior anchor, interior zoom change: no clamp interference.
    view.set_zoom(2.5, anchor);
    let after = view.to_view(pinned);
    assert_abs_diff_eq!(after.x, anchor.x, epsilon = 1e-6);
    assert_abs_diff_eq!(after.y, anchor.y, epsilon = 1e-6);
}

#[test]
fn zoom_requests_saturate_silently() {
    let mut view = view_state((1000, 1000), (800, 600));
    view.set_zoom(10.0, ViewPoint::new(400.0, 300.0));
    assert_eq!(view.zoom_factor(), MAX_ZOOM);
    view.set_zoom(0.01, ViewPoint::new(400.0, 300.0));
    assert_eq!(view.zoom_factor(), MIN_ZOOM);
    view.set_zoom(f64::NAN, ViewPoint::new(400.0, 300.0));
    assert_eq!(view.zoom_factor(), MIN_ZOOM);
}

// ---------------------------------------------------------------------------
// Pan clamping
// ---------------------------------------------------------------------------

#[test]
fn pan_clamps_at_half_zoom_scenario() {
    // 2000x2000 bitmap at 50% in an 800x600 viewport: scaled 1000x1000,
    // pan must stay within [-200, 0] x [-400, 0].
    let mut view = view_state((2000, 2000), (800, 600));
    view.set_zoom(0.5, ViewPoint::new(400.0, 300.0));

    view.set_pan((100.0, 100.0));
    assert_eq!(view.pan_offset(), (0.0, 0.0));
    view.set_pan((-9999.0, -9999.0));
    assert_eq!(view.pan_offset(), (-200.0, -400.0));
    view.set_pan((-50.0, -123.0));
    assert_eq!(view.pan_offset(), (-50.0, -123.0));
}

#[test]
fn scroll_extent_is_scaled_size_floored_at_viewport() {
    let mut view = view_state((2000, 2000), (800, 600));
    view.set_zoom(0.5, ViewPoint::new(400.0, 300.0));
    assert_eq!(view.scroll_extent(), (1000.0, 1000.0));

    // Smaller than the viewport on both axes: the extent is the viewport.
    view.set_zoom(0.2, ViewPoint::new(400.0, 300.0));
    assert_eq!(view.scroll_extent(), (800.0, 600.0));
}

#[test]
fn shrinking_viewport_reclamps_pan() {
    let mut view = view_state((1000, 1000), (1000, 1000));
    view.set_pan((0.0, 0.0));
    view.set_viewport_size((400, 400));
    let (px, py) = view.pan_offset();
    assert!(px >= 400.0 - 1000.0 && px <= 0.0);
    assert!(py >= 400.0 - 1000.0 && py <= 0.0);
}

// ---------------------------------------------------------------------------
// Overlay projection invariance across zoom cycles
// ---------------------------------------------------------------------------

#[test]
fn image_point_projection_is_stable_across_zoom_cycles() {
    let mut view = view_state((3000, 3000), (800, 600));
    view.set_zoom(1.0, ViewPoint::new(400.0, 300.0));
    view.set_pan((-500.0, -500.0));
    let anchor = ImagePoint::new(712.0, 644.0);
    let original = view.to_view(anchor);

    for _ in 0..4 {
        view.zoom_in();
    }
    for _ in 0..4 {
        view.zoom_out();
    }

    let after = view.to_view(anchor);
    assert!(
        (after.x - original.x).abs() < 1e-6 && (after.y - original.y).abs() < 1e-6,
        "projection drifted from ({}, {}) to ({}, {})",
        original.x,
        original.y,
        after.x,
        after.y
    );
}

// ---------------------------------------------------------------------------
// Enhanced Mode
// ---------------------------------------------------------------------------

#[test]
fn enhanced_mode_switches_zoom_and_contrast_together() {
    let mut view = view_state((2000, 2000), (800, 600));
    view.set_enhanced_mode(true);
    assert!(view.enhanced_mode);
    assert_eq!(view.zoom_factor(), ENHANCED_MODE_ZOOM);
    assert_eq!(view.contrast_mode, ContrastMode::HighContrastColor);

    view.set_enhanced_mode(false);
    assert!(!view.enhanced_mode);
    assert_eq!(view.zoom_factor(), 1.0);
    assert_eq!(view.contrast_mode, ContrastMode::Normal);
}
