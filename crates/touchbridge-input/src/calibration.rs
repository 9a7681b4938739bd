//! Touch panel calibration discovery.

use evdev::AbsoluteAxisCode;
use touchbridge_types::{AxisCalibration, FallbackResolution, TouchCalibration};
use tracing::debug;

use crate::error::InputError;

/// Build a calibration from `(axis code, calibration)` pairs.
///
/// Only X, Y and pressure may appear. X and Y are required; a panel without
/// a pressure axis keeps an all-zero pressure calibration.
pub fn calibration_from_axes<I>(
    axes: I,
    fallback: FallbackResolution,
) -> Result<TouchCalibration, InputError>
where
    I: IntoIterator<Item = (u16, AxisCalibration)>,
{
    let mut x = None;
    let mut y = None;
    let mut pressure = AxisCalibration::default();

    for (code, axis) in axes {
        match AbsoluteAxisCode(code) {
            AbsoluteAxisCode::ABS_X => x = Some(axis),
            AbsoluteAxisCode::ABS_Y => y = Some(axis),
            AbsoluteAxisCode::ABS_PRESSURE => pressure = axis,
            _ => return Err(InputError::UnexpectedAxis(code)),
        }
    }

    let calibration = TouchCalibration {
        x: x.ok_or(InputError::MissingAxis("X"))?,
        y: y.ok_or(InputError::MissingAxis("Y"))?,
        pressure,
    };
    Ok(calibration.with_fallback(fallback))
}

/// Query the absolute axes of an open touch device.
pub fn read_calibration(
    device: &evdev::Device,
    fallback: FallbackResolution,
) -> Result<TouchCalibration, InputError> {
    let axes = device
        .get_absinfo()
        .map_err(|e| InputError::Calibration(e.to_string()))?
        .map(|(code, info)| {
            (
                code.0,
                AxisCalibration {
                    minimum: info.minimum(),
                    maximum: info.maximum(),
                    fuzz: info.fuzz(),
                    flat: info.flat(),
                    resolution: info.resolution(),
                },
            )
        });

    let calibration = calibration_from_axes(axes, fallback)?;
    debug!(?calibration, "read touch calibration");
    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(maximum: i32, resolution: i32) -> AxisCalibration {
        AxisCalibration {
            maximum,
            resolution,
            ..AxisCalibration::default()
        }
    }

    #[test]
    fn collects_three_axes() {
        let calibration = calibration_from_axes(
            [(0x00, axis(4095, 4096)), (0x01, axis(4095, 4096)), (0x18, axis(255, 0))],
            FallbackResolution::default(),
        )
        .unwrap();
        assert_eq!(calibration.x.maximum, 4095);
        assert_eq!(calibration.y.resolution, 4096);
        assert_eq!(calibration.pressure.maximum, 255);
    }

    #[test]
    fn zero_resolution_uses_fallback() {
        let calibration = calibration_from_axes(
            [(0x00, axis(4095, 0)), (0x01, axis(4095, 0))],
            FallbackResolution { x: 1024, y: 600 },
        )
        .unwrap();
        assert_eq!(calibration.x.resolution, 1024);
        assert_eq!(calibration.y.resolution, 600);
    }

    #[test]
    fn missing_pressure_is_zeroed() {
        let calibration = calibration_from_axes(
            [(0x00, axis(100, 1)), (0x01, axis(100, 1))],
            FallbackResolution::default(),
        )
        .unwrap();
        assert_eq!(calibration.pressure, AxisCalibration::default());
    }

    #[test]
    fn unknown_axis_is_rejected() {
        let err = calibration_from_axes(
            [(0x00, axis(100, 1)), (0x35, axis(100, 1))],
            FallbackResolution::default(),
        )
        .unwrap_err();
        assert!(matches!(err, InputError::UnexpectedAxis(0x35)));
    }

    #[test]
    fn missing_y_is_rejected() {
        let err = calibration_from_axes([(0x00, axis(100, 1))], FallbackResolution::default())
            .unwrap_err();
        assert!(matches!(err, InputError::MissingAxis("Y")));
    }
}
