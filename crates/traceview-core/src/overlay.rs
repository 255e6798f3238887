//! Spatially-anchored annotation overlays and their store.
//!
//! All geometry is kept in image space so annotations stay put across
//! zoom, pan and resize; projection to view space happens only at paint
//! and hit-test time.

use serde::{Deserialize, Serialize};

use crate::consts::HIT_TEST_RADIUS;
use crate::error::{Result, ViewerError};
use crate::geometry::{point_segment_distance, Color, ImagePoint, ViewPoint};
use crate::view::ViewState;

/// Stable overlay identifier: unique within a session, never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

impl std::fmt::Display for OverlayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Overlay geometry, one variant per annotation tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayKind {
    Note {
        anchor: ImagePoint,
        text: String,
    },
    Ruler {
        start: ImagePoint,
        end: ImagePoint,
    },
    Roi {
        top_left: ImagePoint,
        bottom_right: ImagePoint,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub id: OverlayId,
    pub color: Color,
    pub note: Option<String>,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl Overlay {
    /// Ruler length in raw image pixels; None for other kinds.
    pub fn length_px(&self) -> Option<f64> {
        match &self.kind {
            OverlayKind::Ruler { start, end } => Some(start.distance_to(end)),
            _ => None,
        }
    }

    /// ROI area in raw image square pixels; None for other kinds.
    pub fn area_px(&self) -> Option<f64> {
        match &self.kind {
            OverlayKind::Roi {
                top_left,
                bottom_right,
            } => Some(((bottom_right.x - top_left.x) * (bottom_right.y - top_left.y)).abs()),
            _ => None,
        }
    }
}

/// Partial update applied by [`OverlayStore::update`]. Unset fields keep
/// their current value; `note: Some(None)` clears the note.
#[derive(Clone, Debug, Default)]
pub struct OverlayPatch {
    pub color: Option<Color>,
    pub note: Option<Option<String>>,
    /// Note text; rejected for Ruler/ROI overlays.
    pub text: Option<String>,
    /// Wholesale geometry replacement, re-validated on apply.
    pub kind: Option<OverlayKind>,
}

/// Insertion-ordered overlay set with a monotonic id counter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OverlayStore {
    next_id: u64,
    overlays: Vec<Overlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert an overlay, assigning a fresh id.
    pub fn add(&mut self, kind: OverlayKind, color: Color, note: Option<String>) -> Result<OverlayId> {
        validate_kind(&kind)?;
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.overlays.push(Overlay {
            id,
            color,
            note,
            kind,
        });
        Ok(id)
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id == id)
    }

    /// Apply a partial update; the store is unchanged on any failure.
    pub fn update(&mut self, id: OverlayId, patch: OverlayPatch) -> Result<()> {
        let overlay = self
            .overlays
            .iter()
            .find(|o| o.id == id)
            .ok_or(ViewerError::OverlayNotFound(id))?;

        let mut updated = overlay.clone();
        if let Some(kind) = patch.kind {
            validate_kind(&kind)?;
            updated.kind = kind;
        }
        if let Some(text) = patch.text {
            match &mut updated.kind {
                OverlayKind::Note { text: t, .. } => *t = text,
                _ => {
                    return Err(ViewerError::InvalidInput {
                        field: "text",
                        reason: "only Note overlays carry text".into(),
                    })
                }
            }
        }
        if let Some(color) = patch.color {
            updated.color = color;
        }
        if let Some(note) = patch.note {
            updated.note = note;
        }

        let slot = self
            .overlays
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(ViewerError::OverlayNotFound(id))?;
        *slot = updated;
        Ok(())
    }

    pub fn remove(&mut self, id: OverlayId) -> Result<()> {
        let before = self.overlays.len();
        self.overlays.retain(|o| o.id != id);
        if self.overlays.len() == before {
            return Err(ViewerError::OverlayNotFound(id));
        }
        Ok(())
    }

    /// Drop every overlay. The id counter keeps advancing so removed ids
    /// are never reissued within the session.
    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Overlays in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }

    /// Topmost overlay whose projected geometry lies within the fixed
    /// view-pixel tolerance of `at`. Most recently added wins.
    pub fn hit_test(&self, at: ViewPoint, view: &ViewState) -> Option<OverlayId> {
        self.overlays
            .iter()
            .rev()
            .find(|o| hit_distance(o, at, view) <= HIT_TEST_RADIUS)
            .map(|o| o.id)
    }
}

fn hit_distance(overlay: &Overlay, at: ViewPoint, view: &ViewState) -> f64 {
    match &overlay.kind {
        OverlayKind::Note { anchor, .. } => view.to_view(*anchor).distance_to(&at),
        OverlayKind::Ruler { start, end } => {
            point_segment_distance(&at, &view.to_view(*start), &view.to_view(*end))
        }
        OverlayKind::Roi {
            top_left,
            bottom_right,
        } => {
            let a = view.to_view(*top_left);
            let b = view.to_view(*bottom_right);
            let (x0, x1) = (a.x.min(b.x), a.x.max(b.x));
            let (y0, y1) = (a.y.min(b.y), a.y.max(b.y));
            if at.x >= x0 && at.x <= x1 && at.y >= y0 && at.y <= y1 {
                0.0
            } else {
                let dx = (x0 - at.x).max(at.x - x1).max(0.0);
                let dy = (y0 - at.y).max(at.y - y1).max(0.0);
                dx.hypot(dy)
            }
        }
    }
}

fn validate_kind(kind: &OverlayKind) -> Result<()> {
    let check_point = |field: &'static str, p: &ImagePoint| -> Result<()> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(ViewerError::InvalidInput {
                field,
                reason: format!("coordinates must be finite, got ({}, {})", p.x, p.y),
            });
        }
        Ok(())
    };

    match kind {
        OverlayKind::Note { anchor, .. } => check_point("anchor", anchor),
        OverlayKind::Ruler { start, end } => {
            check_point("start", start)?;
            check_point("end", end)?;
            if start == end {
                return Err(ViewerError::InvalidInput {
                    field: "end",
                    reason: "ruler endpoints must be distinct".into(),
                });
            }
            Ok(())
        }
        OverlayKind::Roi {
            top_left,
            bottom_right,
        } => {
            check_point("top_left", top_left)?;
            check_point("bottom_right", bottom_right)?;
            if top_left == bottom_right {
                return Err(ViewerError::InvalidInput {
                    field: "bottom_right",
                    reason: "ROI corners must be distinct".into(),
                });
            }
            Ok(())
        }
    }
}
