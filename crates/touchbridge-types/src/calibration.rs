//! Touch panel axis calibration.

use serde::{Deserialize, Serialize};

/// A logical touch axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Pressure,
}

/// Device-reported calibration of one absolute axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisCalibration {
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

impl AxisCalibration {
    /// Number of distinct raw values the axis reports.
    #[must_use]
    pub fn span(&self) -> i64 {
        i64::from(self.maximum) - i64::from(self.minimum) + 1
    }
}

/// Resolution substituted when the panel reports zero for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackResolution {
    #[serde(default = "default_resolution_x")]
    pub x: i32,
    #[serde(default = "default_resolution_y")]
    pub y: i32,
}

impl Default for FallbackResolution {
    fn default() -> Self {
        Self {
            x: default_resolution_x(),
            y: default_resolution_y(),
        }
    }
}

fn default_resolution_x() -> i32 {
    800
}

fn default_resolution_y() -> i32 {
    480
}

/// Calibration of the three axes the touch panel is driven through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchCalibration {
    pub x: AxisCalibration,
    pub y: AxisCalibration,
    pub pressure: AxisCalibration,
}

impl TouchCalibration {
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisCalibration {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Pressure => &self.pressure,
        }
    }

    /// Replace zero X/Y resolutions with the fallback values.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackResolution) -> Self {
        if self.x.resolution == 0 {
            self.x.resolution = fallback.x;
        }
        if self.y.resolution == 0 {
            self.y.resolution = fallback.y;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_only_replaces_zero() {
        let calibration = TouchCalibration {
            x: AxisCalibration {
                maximum: 4095,
                resolution: 0,
                ..AxisCalibration::default()
            },
            y: AxisCalibration {
                maximum: 4095,
                resolution: 12,
                ..AxisCalibration::default()
            },
            pressure: AxisCalibration::default(),
        }
        .with_fallback(FallbackResolution::default());

        assert_eq!(calibration.x.resolution, 800);
        assert_eq!(calibration.y.resolution, 12);
        assert_eq!(calibration.pressure.resolution, 0);
    }

    #[test]
    fn span_is_inclusive() {
        let axis = AxisCalibration {
            minimum: 0,
            maximum: 4095,
            ..AxisCalibration::default()
        };
        assert_eq!(axis.span(), 4096);
    }
}
