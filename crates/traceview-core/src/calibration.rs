use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

/// Pixel-to-physical-unit scaling for measurement display.
///
/// Applied only when formatting ruler lengths and ROI areas; stored overlay
/// geometry always stays in raw image pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    pub pixels_per_unit_x: f64,
    pub pixels_per_unit_y: f64,
    pub unit_label: String,
}

impl CalibrationState {
    pub fn new(
        pixels_per_unit_x: f64,
        pixels_per_unit_y: f64,
        unit_label: impl Into<String>,
    ) -> Result<Self> {
        let cal = Self {
            pixels_per_unit_x,
            pixels_per_unit_y,
            unit_label: unit_label.into(),
        };
        cal.validate()?;
        Ok(cal)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pixels_per_unit_x.is_finite() || self.pixels_per_unit_x <= 0.0 {
            return Err(ViewerError::InvalidInput {
                field: "pixels_per_unit_x",
                reason: format!("must be finite and positive, got {}", self.pixels_per_unit_x),
            });
        }
        if !self.pixels_per_unit_y.is_finite() || self.pixels_per_unit_y <= 0.0 {
            return Err(ViewerError::InvalidInput {
                field: "pixels_per_unit_y",
                reason: format!("must be finite and positive, got {}", self.pixels_per_unit_y),
            });
        }
        Ok(())
    }

    /// Length of an image-space displacement in calibrated units.
    pub fn calibrated_length(&self, dx: f64, dy: f64) -> f64 {
        (dx / self.pixels_per_unit_x).hypot(dy / self.pixels_per_unit_y)
    }

    /// Area of an image-space rectangle in calibrated square units.
    pub fn calibrated_area(&self, dx: f64, dy: f64) -> f64 {
        (dx / self.pixels_per_unit_x).abs() * (dy / self.pixels_per_unit_y).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_factors() {
        assert!(CalibrationState::new(0.0, 1.0, "ms").is_err());
        assert!(CalibrationState::new(1.0, -2.0, "ms").is_err());
        assert!(CalibrationState::new(f64::NAN, 1.0, "ms").is_err());
    }

    #[test]
    fn calibrated_length_scales_per_axis() {
        let cal = CalibrationState::new(10.0, 5.0, "mm").unwrap();
        // 30px horizontal at 10 px/mm = 3mm; 20px vertical at 5 px/mm = 4mm.
        assert!((cal.calibrated_length(30.0, 20.0) - 5.0).abs() < 1e-9);
        assert!((cal.calibrated_area(30.0, 20.0) - 12.0).abs() < 1e-9);
    }
}
