//! Floating measurement grid. Screen-anchored on purpose: it measures
//! what is on screen at the current magnification, like a loupe reticle,
//! so it does not follow zoom or pan.

use serde::{Deserialize, Serialize};

use crate::consts::GRID_RESIZE_MARGIN;
use crate::error::{Result, ViewerError};

/// Per-axis tick calibration for the grid readout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCalibration {
    /// Screen pixels between adjacent ticks.
    pub pixels_per_tick: f64,
    /// Measured value spanned by one tick.
    pub value_per_tick: f64,
    pub unit: String,
}

impl GridCalibration {
    pub fn new(pixels_per_tick: f64, value_per_tick: f64, unit: impl Into<String>) -> Result<Self> {
        if !pixels_per_tick.is_finite() || pixels_per_tick <= 0.0 {
            return Err(ViewerError::InvalidInput {
                field: "pixels_per_tick",
                reason: format!("must be finite and positive, got {pixels_per_tick}"),
            });
        }
        if !value_per_tick.is_finite() || value_per_tick <= 0.0 {
            return Err(ViewerError::InvalidInput {
                field: "value_per_tick",
                reason: format!("must be finite and positive, got {value_per_tick}"),
            });
        }
        Ok(Self {
            pixels_per_tick,
            value_per_tick,
            unit: unit.into(),
        })
    }
}

/// Grid line positions, in screen pixels, ready to paint.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLines {
    /// X positions of vertical lines.
    pub vertical: Vec<f64>,
    /// Y positions of horizontal lines.
    pub horizontal: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum GridDrag {
    /// Grab offset from the pointer to the grid origin.
    Moving { dx: f64, dy: f64 },
    Resizing,
}

/// Movable, resizable measurement grid in screen space.
#[derive(Clone, Debug)]
pub struct MeasurementGrid {
    origin: (f64, f64),
    size: (f64, f64),
    x_cal: GridCalibration,
    y_cal: GridCalibration,
    drag: Option<GridDrag>,
}

impl Default for MeasurementGrid {
    fn default() -> Self {
        Self {
            origin: (150.0, 150.0),
            size: (300.0, 200.0),
            // Stock EEG paper scale: 50 px per 100 ms horizontally,
            // 50 px per 50 uV vertically.
            x_cal: GridCalibration {
                pixels_per_tick: 50.0,
                value_per_tick: 100.0,
                unit: "ms".to_string(),
            },
            y_cal: GridCalibration {
                pixels_per_tick: 50.0,
                value_per_tick: 50.0,
                unit: "uV".to_string(),
            },
            drag: None,
        }
    }
}

impl MeasurementGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    pub fn x_calibration(&self) -> &GridCalibration {
        &self.x_cal
    }

    pub fn y_calibration(&self) -> &GridCalibration {
        &self.y_cal
    }

    /// Replace both axis calibrations; the size is re-clamped so the grid
    /// always spans at least two ticks per axis.
    pub fn set_calibration(&mut self, x: GridCalibration, y: GridCalibration) {
        self.x_cal = x;
        self.y_cal = y;
        self.clamp_size();
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.origin.0
            && y >= self.origin.1
            && x <= self.origin.0 + self.size.0
            && y <= self.origin.1 + self.size.1
    }

    /// Start a drag at a screen point. Within the bottom/right margin the
    /// gesture resizes, elsewhere inside the grid it moves; outside the
    /// grid nothing starts.
    pub fn begin_drag(&mut self, x: f64, y: f64) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let near_right = x >= self.origin.0 + self.size.0 - GRID_RESIZE_MARGIN;
        let near_bottom = y >= self.origin.1 + self.size.1 - GRID_RESIZE_MARGIN;
        self.drag = Some(if near_right || near_bottom {
            GridDrag::Resizing
        } else {
            GridDrag::Moving {
                dx: x - self.origin.0,
                dy: y - self.origin.1,
            }
        });
        true
    }

    /// Continue the drag at a new pointer position.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        match self.drag {
            Some(GridDrag::Moving { dx, dy }) => {
                self.origin = (x - dx, y - dy);
            }
            Some(GridDrag::Resizing) => {
                self.size = (x - self.origin.0, y - self.origin.1);
                self.clamp_size();
            }
            None => {}
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Tick line positions across the current rectangle.
    pub fn grid_lines(&self) -> GridLines {
        let ticks = |start: f64, extent: f64, step: f64| -> Vec<f64> {
            let count = (extent / step).floor() as usize;
            (0..=count).map(|i| start + i as f64 * step).collect()
        };
        GridLines {
            vertical: ticks(self.origin.0, self.size.0, self.x_cal.pixels_per_tick),
            horizontal: ticks(self.origin.1, self.size.1, self.y_cal.pixels_per_tick),
        }
    }

    /// One-line caption of what each tick spans.
    pub fn readout(&self) -> String {
        format!(
            "{} {}/tick x {} {}/tick",
            self.x_cal.value_per_tick,
            self.x_cal.unit,
            self.y_cal.value_per_tick,
            self.y_cal.unit
        )
    }

    fn clamp_size(&mut self) {
        self.size.0 = self.size.0.max(2.0 * self.x_cal.pixels_per_tick);
        self.size.1 = self.size.1.max(2.0 * self.y_cal.pixels_per_tick);
    }
}
