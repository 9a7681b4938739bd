//! Remote canvas to panel coordinate mapping.
//!
//! The remote controller declares a virtual canvas (`d height width`) and
//! sends positions in canvas units. Each axis value is converted with
//!
//! ```text
//! value * (max - min + 1) * factor / resolution + min
//! ```
//!
//! where `factor = resolution / canvas_dimension`. Pressure is passed through
//! with a resolution and factor of 1.

use thiserror::Error;

use crate::calibration::{Axis, TouchCalibration};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapperError {
    #[error("canvas dimensions must be non-zero, got {height}x{width}")]
    EmptyCanvas { height: u32, width: u32 },
}

/// Ratio between the panel resolution and the client canvas, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionFactor {
    pub x: f64,
    pub y: f64,
}

/// Converts client canvas coordinates to panel-native units.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    calibration: TouchCalibration,
    canvas_height: u32,
    canvas_width: u32,
    factor: ResolutionFactor,
}

impl CoordinateMapper {
    /// Create a mapper whose canvas matches the panel's native resolution.
    #[must_use]
    pub fn new(calibration: TouchCalibration) -> Self {
        let width = u32::try_from(calibration.x.resolution).unwrap_or(0);
        let height = u32::try_from(calibration.y.resolution).unwrap_or(0);
        let mut mapper = Self {
            calibration,
            canvas_height: height,
            canvas_width: width,
            factor: ResolutionFactor { x: 1.0, y: 1.0 },
        };
        mapper.recompute();
        mapper
    }

    /// Update the client canvas and recompute the resolution factors.
    pub fn set_canvas(&mut self, height: u32, width: u32) -> Result<(), MapperError> {
        if height == 0 || width == 0 {
            return Err(MapperError::EmptyCanvas { height, width });
        }
        self.canvas_height = height;
        self.canvas_width = width;
        self.recompute();
        Ok(())
    }

    /// Current canvas as (height, width).
    pub fn canvas(&self) -> (u32, u32) {
        (self.canvas_height, self.canvas_width)
    }

    pub fn factor(&self) -> ResolutionFactor {
        self.factor
    }

    pub fn calibration(&self) -> &TouchCalibration {
        &self.calibration
    }

    /// Convert a canvas value on `axis` to a raw panel value.
    ///
    /// Values are not clamped to the axis range.
    #[allow(clippy::cast_possible_truncation)]
    pub fn map(&self, value: f64, axis: Axis) -> i32 {
        let info = self.calibration.axis(axis);
        let (resolution, factor) = match axis {
            Axis::X => (f64::from(info.resolution), self.factor.x),
            Axis::Y => (f64::from(info.resolution), self.factor.y),
            Axis::Pressure => (1.0, 1.0),
        };
        #[allow(clippy::cast_precision_loss)]
        let span = info.span() as f64;
        let scaled = value * span * factor / resolution + f64::from(info.minimum);
        scaled as i32
    }

    fn recompute(&mut self) {
        self.factor = ResolutionFactor {
            x: ratio(self.calibration.x.resolution, self.canvas_width),
            y: ratio(self.calibration.y.resolution, self.canvas_height),
        };
    }
}

fn ratio(resolution: i32, canvas: u32) -> f64 {
    if canvas == 0 {
        1.0
    } else {
        f64::from(resolution) / f64::from(canvas)
    }
}
