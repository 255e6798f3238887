//! Per-document session state: view transform, overlays, calibration and
//! named saved positions, plus persistence through a [`SessionStore`]
//! collaborator. Switching documents swaps the whole context at once, so
//! overlays can never leak across documents.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calibration::CalibrationState;
use crate::consts::SCHEMA_VERSION;
use crate::error::{Result, ViewerError};
use crate::geometry::ViewPoint;
use crate::overlay::OverlayStore;
use crate::view::ViewState;

/// A named zoom/pan bookmark. Saving to an existing name replaces it;
/// positions are never removed implicitly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub zoom_factor: f64,
    pub pan_offset: (f64, f64),
    pub created_at: SystemTime,
}

/// The serializable aggregate a [`SessionStore`] persists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub schema_version: u32,
    pub view: ViewState,
    pub overlays: OverlayStore,
    pub calibration: Option<CalibrationState>,
    pub saved_positions: BTreeMap<String, SavedPosition>,
}

/// Persistence collaborator. The engine never touches the backing
/// format; the CLI ships a JSON file implementation.
pub trait SessionStore {
    fn save(&mut self, state: &SessionState) -> Result<()>;
    fn load(&mut self) -> Result<SessionState>;
}

/// Live state for exactly one document or capture source.
#[derive(Debug, Default)]
pub struct SessionContext {
    pub view: ViewState,
    pub overlays: OverlayStore,
    pub calibration: Option<CalibrationState>,
    saved_positions: BTreeMap<String, SavedPosition>,
}

impl SessionContext {
    pub fn new(viewport_size: (u32, u32)) -> Self {
        Self {
            view: ViewState::new(viewport_size),
            ..Self::default()
        }
    }

    /// Bookmark the current zoom and pan under `name`, replacing any
    /// previous position with the same name.
    pub fn save_position(&mut self, name: impl Into<String>) {
        let name = name.into();
        info!(name = %name, zoom = self.view.zoom_factor(), "position saved");
        self.saved_positions.insert(
            name,
            SavedPosition {
                zoom_factor: self.view.zoom_factor(),
                pan_offset: self.view.pan_offset(),
                created_at: SystemTime::now(),
            },
        );
    }

    /// Restore a bookmarked zoom and pan. The restored pan is re-clamped
    /// against the current viewport and image.
    pub fn recall_position(&mut self, name: &str) -> Result<()> {
        let pos = self
            .saved_positions
            .get(name)
            .ok_or_else(|| ViewerError::PositionNotFound(name.to_string()))?
            .clone();
        let (vw, vh) = self.view.viewport_size();
        self.view
            .set_zoom(pos.zoom_factor, ViewPoint::new(vw as f64 / 2.0, vh as f64 / 2.0));
        self.view.set_pan(pos.pan_offset);
        Ok(())
    }

    pub fn remove_position(&mut self, name: &str) -> Result<()> {
        self.saved_positions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ViewerError::PositionNotFound(name.to_string()))
    }

    /// Saved positions in name order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, &SavedPosition)> {
        self.saved_positions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Snapshot for persistence.
    pub fn to_state(&self) -> SessionState {
        SessionState {
            schema_version: SCHEMA_VERSION,
            view: self.view.clone(),
            overlays: self.overlays.clone(),
            calibration: self.calibration.clone(),
            saved_positions: self.saved_positions.clone(),
        }
    }

    /// Rebuild a context from a persisted snapshot. The view transform is
    /// re-clamped and the calibration re-validated, so a hand-edited or
    /// stale file cannot smuggle in out-of-range state.
    pub fn from_state(state: SessionState) -> Result<Self> {
        if state.schema_version != SCHEMA_VERSION {
            return Err(ViewerError::Persistence(format!(
                "unsupported session schema version {} (expected {})",
                state.schema_version, SCHEMA_VERSION
            )));
        }
        let mut view = state.view;
        view.reclamp();
        if let Some(cal) = &state.calibration {
            cal.validate()?;
        }
        Ok(Self {
            view,
            overlays: state.overlays,
            calibration: state.calibration,
            saved_positions: state.saved_positions,
        })
    }

    pub fn save_to(&self, store: &mut dyn SessionStore) -> Result<()> {
        store.save(&self.to_state())
    }

    pub fn load_from(store: &mut dyn SessionStore) -> Result<Self> {
        Self::from_state(store.load()?)
    }

    /// Replace this context with another, returning the previous one.
    /// This is the document-switch primitive: the caller persists the
    /// returned context and installs the new one in a single step.
    pub fn swap(&mut self, mut other: SessionContext) -> SessionContext {
        std::mem::swap(self, &mut other);
        other
    }
}
