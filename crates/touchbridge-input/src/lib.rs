//! Input device discovery and event injection for touchbridge.
//!
//! [`DeviceRegistry`] enumerates the input directory, classifies devices by
//! name into roles, reads the touch panel calibration and tracks hot-plug
//! changes. The daemon writes to devices only through the [`InputInjector`]
//! trait, which the registry implements and [`mock::MockInjector`] fakes.

use touchbridge_types::{DeviceRole, KeyRecord, MouseRecord, RawEvent, TouchCalibration};

pub mod burst;
pub mod calibration;
pub mod encode;
pub mod error;
pub mod hotplug;
pub mod keymap;
pub mod node;
pub mod registry;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::InputError;
pub use evdev::KeyCode as EvdevKey;
pub use hotplug::{HotplugEvent, HotplugWatch};
pub use registry::{DeviceRegistry, InputDevice, RegistryConfig};

/// One unit of output for a device role, written with a single write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// A synchronized burst for the touch panel.
    Touch(Vec<RawEvent>),
    /// A synchronized burst for the auxiliary key device.
    AuxKey(Vec<RawEvent>),
    /// One record for the virtual mouse node.
    Mouse(MouseRecord),
    /// Records for the virtual keyboard node.
    Keyboard(Vec<KeyRecord>),
}

impl Injection {
    /// The device role this injection is written to.
    pub fn role(&self) -> DeviceRole {
        match self {
            Self::Touch(_) => DeviceRole::Touch,
            Self::AuxKey(_) => DeviceRole::AuxKey,
            Self::Mouse(_) => DeviceRole::Mouse,
            Self::Keyboard(_) => DeviceRole::Keyboard,
        }
    }
}

/// Writes input to the devices discovered on this host.
pub trait InputInjector: Send + 'static {
    /// Calibration of the touch panel, if one is present.
    fn touch_calibration(&self) -> Option<TouchCalibration>;

    /// Write one injection to the device holding its role.
    fn inject(&mut self, injection: &Injection) -> Result<(), InputError>;

    /// Apply pending hot-plug changes, returning how many devices were
    /// added or removed.
    fn poll_hotplug(&mut self) -> Result<usize, InputError> {
        Ok(0)
    }
}
