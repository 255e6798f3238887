//! View-space transform: maps between image coordinates and the
//! zoomed/panned display surface, and owns the zoom/pan invariants.

use serde::{Deserialize, Serialize};

use crate::consts::{ENHANCED_MODE_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::filters::ContrastMode;
use crate::geometry::{ImagePoint, ViewPoint};

/// Display state for one loaded document or live source.
///
/// `view = image * zoom + pan`: `pan` is the view-space translation of the
/// scaled bitmap origin. On an axis where the scaled bitmap is smaller than
/// the viewport the pan is pinned to the centering offset; otherwise it is
/// clamped so the visible rectangle never exits the bitmap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ViewState {
    zoom_factor: f64,
    pan_offset: (f64, f64),
    viewport_size: (u32, u32),
    image_size: (u32, u32),
    pub contrast_mode: ContrastMode,
    pub trace_enhancement: bool,
    pub enhanced_mode: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            pan_offset: (0.0, 0.0),
            viewport_size: (0, 0),
            image_size: (0, 0),
            contrast_mode: ContrastMode::Normal,
            trace_enhancement: false,
            enhanced_mode: false,
        }
    }
}

impl ViewState {
    pub fn new(viewport_size: (u32, u32)) -> Self {
        let mut state = Self {
            viewport_size,
            ..Self::default()
        };
        state.clamp_pan();
        state
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    pub fn pan_offset(&self) -> (f64, f64) {
        self.pan_offset
    }

    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    pub fn image_size(&self) -> (u32, u32) {
        self.image_size
    }

    /// Project an image-space point onto the display surface.
    pub fn to_view(&self, p: ImagePoint) -> ViewPoint {
        ViewPoint::new(
            p.x * self.zoom_factor + self.pan_offset.0,
            p.y * self.zoom_factor + self.pan_offset.1,
        )
    }

    /// Map a display-surface point back to image space. Exact inverse of
    /// [`to_view`](Self::to_view) up to floating-point error.
    pub fn to_image(&self, p: ViewPoint) -> ImagePoint {
        ImagePoint::new(
            (p.x - self.pan_offset.0) / self.zoom_factor,
            (p.y - self.pan_offset.1) / self.zoom_factor,
        )
    }

    /// True if the view point lands inside the source bitmap.
    pub fn hits_image(&self, p: ViewPoint) -> bool {
        let img = self.to_image(p);
        img.x >= 0.0
            && img.y >= 0.0
            && img.x < self.image_size.0 as f64
            && img.y < self.image_size.1 as f64
    }

    /// Change zoom while keeping the image point under `anchor` fixed on
    /// screen. Out-of-range requests saturate to `[MIN_ZOOM, MAX_ZOOM]`.
    /// The resulting pan is re-clamped, so at the bitmap boundary the
    /// anchor may shift by the clamp amount.
    pub fn set_zoom(&mut self, new_zoom: f64, anchor: ViewPoint) {
        let zoom = if new_zoom.is_finite() {
            new_zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            self.zoom_factor
        };
        let pinned = self.to_image(anchor);
        self.zoom_factor = zoom;
        self.pan_offset = (anchor.x - pinned.x * zoom, anchor.y - pinned.y * zoom);
        self.clamp_pan();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom_factor + ZOOM_STEP, self.viewport_center());
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom_factor - ZOOM_STEP, self.viewport_center());
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0, self.viewport_center());
    }

    /// Request an absolute pan offset; silently re-clamped to bounds.
    pub fn set_pan(&mut self, pan: (f64, f64)) {
        if pan.0.is_finite() && pan.1.is_finite() {
            self.pan_offset = pan;
        }
        self.clamp_pan();
    }

    pub fn pan_by(&mut self, delta: (f64, f64)) {
        self.set_pan((self.pan_offset.0 + delta.0, self.pan_offset.1 + delta.1));
    }

    pub fn set_viewport_size(&mut self, size: (u32, u32)) {
        self.viewport_size = size;
        self.clamp_pan();
    }

    pub fn set_image_size(&mut self, size: (u32, u32)) {
        self.image_size = size;
        self.clamp_pan();
    }

    /// Total scrollable extent of the scaled bitmap, per axis, in view
    /// pixels. Never smaller than the viewport.
    pub fn scroll_extent(&self) -> (f64, f64) {
        let (sw, sh) = self.scaled_size();
        (
            sw.max(self.viewport_size.0 as f64),
            sh.max(self.viewport_size.1 as f64),
        )
    }

    /// Toggle Enhanced Mode: on sets 250% zoom and HighContrastColor in one
    /// step, off restores 100% and Normal.
    pub fn set_enhanced_mode(&mut self, on: bool) {
        self.enhanced_mode = on;
        let center = self.viewport_center();
        if on {
            self.set_zoom(ENHANCED_MODE_ZOOM, center);
            self.contrast_mode = ContrastMode::HighContrastColor;
        } else {
            self.set_zoom(1.0, center);
            self.contrast_mode = ContrastMode::Normal;
        }
    }

    /// Restore invariants after deserialization from an external store.
    pub fn reclamp(&mut self) {
        if !self.zoom_factor.is_finite() {
            self.zoom_factor = 1.0;
        }
        self.zoom_factor = self.zoom_factor.clamp(MIN_ZOOM, MAX_ZOOM);
        if !self.pan_offset.0.is_finite() || !self.pan_offset.1.is_finite() {
            self.pan_offset = (0.0, 0.0);
        }
        self.clamp_pan();
    }

    fn viewport_center(&self) -> ViewPoint {
        ViewPoint::new(
            self.viewport_size.0 as f64 / 2.0,
            self.viewport_size.1 as f64 / 2.0,
        )
    }

    fn scaled_size(&self) -> (f64, f64) {
        (
            self.image_size.0 as f64 * self.zoom_factor,
            self.image_size.1 as f64 * self.zoom_factor,
        )
    }

    fn clamp_pan(&mut self) {
        let (sw, sh) = self.scaled_size();
        self.pan_offset.0 = clamp_axis(self.pan_offset.0, sw, self.viewport_size.0 as f64);
        self.pan_offset.1 = clamp_axis(self.pan_offset.1, sh, self.viewport_size.1 as f64);
    }
}

fn clamp_axis(pan: f64, scaled: f64, viewport: f64) -> f64 {
    if scaled <= viewport {
        // Center the bitmap on an axis where it fits entirely.
        (viewport - scaled) / 2.0
    } else {
        pan.clamp(viewport - scaled, 0.0)
    }
}
