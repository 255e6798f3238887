//! Side-effect-free exports: the composited view as a bitmap, and the
//! overlay set as a versioned, schema-tagged record for downstream
//! analysis tools.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationState;
use crate::compositor::Compositor;
use crate::consts::SCHEMA_VERSION;
use crate::frame::SourceFrame;
use crate::geometry::{Color, ImagePoint};
use crate::overlay::{OverlayId, OverlayKind, OverlayStore};
use crate::view::ViewState;

/// A measurement converted to calibrated units at export time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibratedValue {
    pub value: f64,
    pub unit: String,
}

/// Exported geometry plus derived measurements, all in image space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryRecord {
    Note {
        anchor: ImagePoint,
        text: String,
    },
    Ruler {
        start: ImagePoint,
        end: ImagePoint,
        length_px: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        calibrated_length: Option<CalibratedValue>,
    },
    Roi {
        top_left: ImagePoint,
        bottom_right: ImagePoint,
        width_px: f64,
        height_px: f64,
        area_px: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        calibrated_area: Option<CalibratedValue>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayRecord {
    pub id: OverlayId,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub geometry: GeometryRecord,
}

/// Top-level overlay export document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OverlayExport {
    pub schema_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationState>,
    pub overlays: Vec<OverlayRecord>,
}

/// Composite the current state into a standalone bitmap. Uses a private
/// compositor so the interactive last-good surface is untouched.
pub fn export_current_view(
    frame: Option<&SourceFrame>,
    view: &ViewState,
    overlays: &OverlayStore,
    calibration: Option<&CalibrationState>,
) -> RgbImage {
    Compositor::new()
        .composite(frame, view, overlays, calibration)
        .image
}

/// Snapshot the overlay store as records, in insertion order. Raw pixel
/// measurements are always present; calibrated values only when a
/// calibration is set.
pub fn export_overlays(
    overlays: &OverlayStore,
    calibration: Option<&CalibrationState>,
) -> OverlayExport {
    let records = overlays
        .iter()
        .map(|overlay| OverlayRecord {
            id: overlay.id,
            color: overlay.color,
            note: overlay.note.clone(),
            geometry: geometry_record(&overlay.kind, calibration),
        })
        .collect();
    OverlayExport {
        schema_version: SCHEMA_VERSION,
        calibration: calibration.cloned(),
        overlays: records,
    }
}

fn geometry_record(kind: &OverlayKind, calibration: Option<&CalibrationState>) -> GeometryRecord {
    match kind {
        OverlayKind::Note { anchor, text } => GeometryRecord::Note {
            anchor: *anchor,
            text: text.clone(),
        },
        OverlayKind::Ruler { start, end } => GeometryRecord::Ruler {
            start: *start,
            end: *end,
            length_px: start.distance_to(end),
            calibrated_length: calibration.map(|cal| CalibratedValue {
                value: cal.calibrated_length(end.x - start.x, end.y - start.y),
                unit: cal.unit_label.clone(),
            }),
        },
        OverlayKind::Roi {
            top_left,
            bottom_right,
        } => {
            let width_px = (bottom_right.x - top_left.x).abs();
            let height_px = (bottom_right.y - top_left.y).abs();
            GeometryRecord::Roi {
                top_left: *top_left,
                bottom_right: *bottom_right,
                width_px,
                height_px,
                area_px: width_px * height_px,
                calibrated_area: calibration.map(|cal| CalibratedValue {
                    value: cal.calibrated_area(width_px, height_px),
                    unit: cal.unit_label.clone(),
                }),
            }
        }
    }
}
