//! Shared types for touchbridge.
//!
//! This crate contains the plain types shared across the touchbridge
//! workspace: device roles and identity, raw input events, touch axis
//! calibration, and the remote-canvas coordinate mapper.

pub mod calibration;
pub mod device;
pub mod event;
pub mod mapper;

pub use calibration::{Axis, AxisCalibration, FallbackResolution, TouchCalibration};
pub use device::{DeviceIdentity, DeviceMarkers, DeviceRole, SpecialNode};
pub use event::{KeyRecord, MouseRecord, RawEvent};
pub use mapper::{CoordinateMapper, MapperError, ResolutionFactor};
