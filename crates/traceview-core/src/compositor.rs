//! Render compositor: filtered source bitmap, resampled to the viewport
//! through the view transform, with overlay geometry painted on top.
//!
//! Text is not rasterized here. Each composite returns the pixel surface
//! plus a list of [`Label`] records (position, text, color) for the
//! embedding shell to draw with its own font stack.

use image::{Rgb, RgbImage};
use rayon::prelude::*;
use tracing::warn;

use crate::calibration::CalibrationState;
use crate::consts::{
    BACKGROUND_GRAY, OVERLAY_MARKER_RADIUS, OVERLAY_STROKE_WIDTH, PARALLEL_PIXEL_THRESHOLD,
    ROI_FILL_OPACITY, RULER_DASH,
};
use crate::error::{Result, ViewerError};
use crate::filters;
use crate::frame::SourceFrame;
use crate::geometry::{Color, ImagePoint, ViewPoint};
use crate::overlay::{Overlay, OverlayKind, OverlayStore};
use crate::view::ViewState;

/// Offset from a note anchor marker to its text, in view pixels.
const NOTE_TEXT_OFFSET: (f64, f64) = (8.0, 8.0);

/// A deferred text draw, positioned in view space.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub position: ViewPoint,
    pub text: String,
    pub color: Color,
}

/// One fully composited viewport: pixels plus deferred labels.
#[derive(Clone, Debug)]
pub struct Surface {
    pub image: RgbImage,
    pub labels: Vec<Label>,
}

/// Stateful compositor. Remembers the last successfully composited
/// surface so a degenerate request (zero-sized viewport) degrades to a
/// stale picture instead of a blank flash.
#[derive(Debug, Default)]
pub struct Compositor {
    last_good: Option<Surface>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Composite one frame. `frame: None` renders the placeholder bitmap
    /// through the same path so filters and overlays behave identically.
    /// Degenerate input degrades to the last good surface (or the
    /// placeholder) instead of propagating.
    pub fn composite(
        &mut self,
        frame: Option<&SourceFrame>,
        view: &ViewState,
        overlays: &OverlayStore,
        calibration: Option<&CalibrationState>,
    ) -> Surface {
        match self.try_composite(frame, view, overlays, calibration) {
            Ok(surface) => surface,
            Err(err) => {
                warn!(error = %err, "reusing last composited surface");
                self.last_good.clone().unwrap_or_else(|| Surface {
                    image: filters::placeholder(),
                    labels: Vec::new(),
                })
            }
        }
    }

    /// Fallible composite: a zero-sized viewport or non-finite transform
    /// is reported as [`ViewerError::DegenerateViewport`] and leaves the
    /// last good surface untouched.
    pub fn try_composite(
        &mut self,
        frame: Option<&SourceFrame>,
        view: &ViewState,
        overlays: &OverlayStore,
        calibration: Option<&CalibrationState>,
    ) -> Result<Surface> {
        let (vw, vh) = view.viewport_size();
        if vw == 0 || vh == 0 || !view.zoom_factor().is_finite() || view.zoom_factor() <= 0.0 {
            return Err(ViewerError::DegenerateViewport {
                width: vw,
                height: vh,
            });
        }

        let filtered = filters::apply(frame, view.contrast_mode, view.trace_enhancement);
        let mut canvas = resample(&filtered, view);

        let mut labels = Vec::new();
        for overlay in overlays.iter() {
            paint_overlay(&mut canvas, &mut labels, overlay, view, calibration);
        }

        let surface = Surface {
            image: canvas,
            labels,
        };
        self.last_good = Some(surface.clone());
        Ok(surface)
    }
}

/// Resample the filtered bitmap onto a viewport-sized canvas.
///
/// Nearest-neighbor below 100% zoom (crisp minified traces), bilinear at
/// and above (smooth magnification). Area outside the bitmap is flat
/// background gray.
fn resample(source: &RgbImage, view: &ViewState) -> RgbImage {
    let (vw, vh) = view.viewport_size();
    let (sw, sh) = (source.width(), source.height());
    let bilinear = view.zoom_factor() >= 1.0;

    let render_row = |y: u32| -> Vec<[u8; 3]> {
        (0..vw)
            .map(|x| {
                let p = view.to_image(ViewPoint::new(x as f64 + 0.5, y as f64 + 0.5));
                if p.x < 0.0 || p.y < 0.0 || p.x >= sw as f64 || p.y >= sh as f64 {
                    [BACKGROUND_GRAY; 3]
                } else if bilinear {
                    sample_bilinear(source, p)
                } else {
                    source
                        .get_pixel(
                            (p.x as u32).min(sw - 1),
                            (p.y as u32).min(sh - 1),
                        )
                        .0
                }
            })
            .collect()
    };

    let rows: Vec<Vec<[u8; 3]>> = if (vw as usize) * (vh as usize) >= PARALLEL_PIXEL_THRESHOLD {
        (0..vh).into_par_iter().map(render_row).collect()
    } else {
        (0..vh).map(render_row).collect()
    };

    let mut canvas = RgbImage::new(vw, vh);
    for (y, row) in rows.into_iter().enumerate() {
        for (x, px) in row.into_iter().enumerate() {
            canvas.put_pixel(x as u32, y as u32, Rgb(px));
        }
    }
    canvas
}

fn sample_bilinear(source: &RgbImage, p: ImagePoint) -> [u8; 3] {
    let (sw, sh) = (source.width(), source.height());
    let fx = (p.x - 0.5).max(0.0);
    let fy = (p.y - 0.5).max(0.0);
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(sw - 1);
    let y1 = (y0 + 1).min(sh - 1);
    let tx = (fx - x0 as f64) as f32;
    let ty = (fy - y0 as f64) as f32;

    let p00 = source.get_pixel(x0, y0).0;
    let p10 = source.get_pixel(x1, y0).0;
    let p01 = source.get_pixel(x0, y1).0;
    let p11 = source.get_pixel(x1, y1).0;

    let mut out = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f32 * (1.0 - tx) + p10[c] as f32 * tx;
        let bottom = p01[c] as f32 * (1.0 - tx) + p11[c] as f32 * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
    }
    out
}

// ---------------------------------------------------------------------------
// Overlay painting
// ---------------------------------------------------------------------------

fn paint_overlay(
    canvas: &mut RgbImage,
    labels: &mut Vec<Label>,
    overlay: &Overlay,
    view: &ViewState,
    calibration: Option<&CalibrationState>,
) {
    let color = overlay.color;
    match &overlay.kind {
        OverlayKind::Note { anchor, text } => {
            let at = view.to_view(*anchor);
            stamp_disk(canvas, at, OVERLAY_MARKER_RADIUS as f64, color);
            labels.push(Label {
                position: ViewPoint::new(at.x + NOTE_TEXT_OFFSET.0, at.y + NOTE_TEXT_OFFSET.1),
                text: text.clone(),
                color,
            });
        }
        OverlayKind::Ruler { start, end } => {
            let a = view.to_view(*start);
            let b = view.to_view(*end);
            draw_line(canvas, a, b, color, OVERLAY_STROKE_WIDTH as f64, Some(RULER_DASH));
            stamp_disk(canvas, a, OVERLAY_MARKER_RADIUS as f64, color);
            stamp_disk(canvas, b, OVERLAY_MARKER_RADIUS as f64, color);
            labels.push(Label {
                position: ViewPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
                text: ruler_label(start, end, overlay.note.as_deref(), calibration),
                color,
            });
        }
        OverlayKind::Roi {
            top_left,
            bottom_right,
        } => {
            let a = view.to_view(*top_left);
            let b = view.to_view(*bottom_right);
            let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
            let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
            fill_rect(canvas, x0, y0, x1, y1, color, ROI_FILL_OPACITY);
            let corners = [
                ViewPoint::new(x0, y0),
                ViewPoint::new(x1, y0),
                ViewPoint::new(x1, y1),
                ViewPoint::new(x0, y1),
            ];
            for i in 0..4 {
                draw_line(
                    canvas,
                    corners[i],
                    corners[(i + 1) % 4],
                    color,
                    OVERLAY_STROKE_WIDTH as f64,
                    None,
                );
            }
            for corner in corners {
                stamp_disk(canvas, corner, OVERLAY_MARKER_RADIUS as f64, color);
            }
            labels.push(Label {
                position: ViewPoint::new((x0 + x1) / 2.0, (y0 + y1) / 2.0),
                text: roi_label(top_left, bottom_right, overlay.note.as_deref(), calibration),
                color,
            });
        }
    }
}

fn ruler_label(
    start: &ImagePoint,
    end: &ImagePoint,
    note: Option<&str>,
    calibration: Option<&CalibrationState>,
) -> String {
    let mut text = format!("{:.1}px", start.distance_to(end));
    if let Some(cal) = calibration {
        let value = cal.calibrated_length(end.x - start.x, end.y - start.y);
        text.push_str(&format!(" / {:.2} {}", value, cal.unit_label));
    }
    if let Some(note) = note {
        if !note.is_empty() {
            text.push_str(&format!(" ({note})"));
        }
    }
    text
}

fn roi_label(
    top_left: &ImagePoint,
    bottom_right: &ImagePoint,
    note: Option<&str>,
    calibration: Option<&CalibrationState>,
) -> String {
    let dx = (bottom_right.x - top_left.x).abs();
    let dy = (bottom_right.y - top_left.y).abs();
    let mut text = format!("{:.0}x{:.0}px", dx, dy);
    if let Some(cal) = calibration {
        let area = cal.calibrated_area(dx, dy);
        text.push_str(&format!(" / {:.2} sq {}", area, cal.unit_label));
    }
    if let Some(note) = note {
        if !note.is_empty() {
            text.push_str(&format!(" ({note})"));
        }
    }
    text
}

// ---------------------------------------------------------------------------
// Raster primitives
// ---------------------------------------------------------------------------

fn stamp_disk(canvas: &mut RgbImage, center: ViewPoint, radius: f64, color: Color) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let x_min = (center.x - radius).floor() as i64;
    let x_max = (center.x + radius).ceil() as i64;
    let y_min = (center.y - radius).floor() as i64;
    let y_max = (center.y + radius).ceil() as i64;
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            if x < 0 || y < 0 || x >= w || y >= h {
                continue;
            }
            let dx = x as f64 + 0.5 - center.x;
            let dy = y as f64 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius * radius {
                canvas.put_pixel(x as u32, y as u32, Rgb(color.0));
            }
        }
    }
}

/// Stroke a straight line by stamping disks every half pixel. `dash` is
/// the (on, off) pattern in view pixels; None draws solid.
fn draw_line(
    canvas: &mut RgbImage,
    a: ViewPoint,
    b: ViewPoint,
    color: Color,
    width: f64,
    dash: Option<(f32, f32)>,
) {
    let length = a.distance_to(&b);
    if length == 0.0 {
        stamp_disk(canvas, a, width / 2.0, color);
        return;
    }
    let steps = (length / 0.5).ceil() as u64;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let dist = t * length;
        if let Some((on, off)) = dash {
            let period = (on + off) as f64;
            if dist % period >= on as f64 {
                continue;
            }
        }
        let p = ViewPoint::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        stamp_disk(canvas, p, width / 2.0, color);
    }
}

fn fill_rect(canvas: &mut RgbImage, x0: f64, y0: f64, x1: f64, y1: f64, color: Color, alpha: f32) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    let xs = (x0.floor() as i64).max(0);
    let xe = (x1.ceil() as i64).min(w);
    let ys = (y0.floor() as i64).max(0);
    let ye = (y1.ceil() as i64).min(h);
    for y in ys..ye {
        for x in xs..xe {
            let px = canvas.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                px.0[c] = (px.0[c] as f32 * (1.0 - alpha) + color.0[c] as f32 * alpha)
                    .round() as u8;
            }
        }
    }
}
