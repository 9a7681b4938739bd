//! Discovery and bookkeeping of the host's input devices.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use touchbridge_types::{
    DeviceIdentity, DeviceMarkers, DeviceRole, FallbackResolution, SpecialNode, TouchCalibration,
};
use tracing::{debug, info, warn};

use crate::calibration::read_calibration;
use crate::error::InputError;
use crate::hotplug::{HotplugEvent, HotplugWatch};
use crate::node::ensure_node;
use crate::{InputInjector, Injection};

/// Where to look for devices and how to recognise them.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub dir: PathBuf,
    pub markers: DeviceMarkers,
    pub mouse_node: SpecialNode,
    pub keyboard_node: SpecialNode,
    pub fallback: FallbackResolution,
}

/// An open input device.
///
/// Dropping it closes the evdev handle and the write target.
pub struct InputDevice {
    pub path: PathBuf,
    pub identity: DeviceIdentity,
    pub role: DeviceRole,
    device: evdev::Device,
    sink: Option<File>,
}

impl InputDevice {
    /// Whether injections for this device have somewhere to go.
    pub fn is_writable(&self) -> bool {
        self.sink.is_some()
    }
}

impl std::fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDevice")
            .field("path", &self.path)
            .field("name", &self.identity.name)
            .field("role", &self.role)
            .field("writable", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

/// The live set of input devices.
pub struct DeviceRegistry {
    config: RegistryConfig,
    devices: Vec<InputDevice>,
    calibration: Option<TouchCalibration>,
    watch: Option<HotplugWatch>,
}

impl DeviceRegistry {
    /// Open and classify every entry of the input directory.
    ///
    /// Entries that fail to open are skipped. A touch device is required.
    pub fn scan(config: RegistryConfig) -> Result<Self, InputError> {
        let mut paths = std::fs::read_dir(&config.dir)
            .map_err(|e| InputError::Scan(config.dir.clone(), e))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect::<Vec<_>>();
        paths.sort();

        let mut registry = Self {
            config,
            devices: Vec::new(),
            calibration: None,
            watch: None,
        };

        for path in paths {
            let device = match registry.open(&path) {
                Ok(device) => device,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping input device");
                    continue;
                }
            };
            if device.role == DeviceRole::Touch && registry.calibration.is_none() {
                registry.calibration =
                    Some(read_calibration(&device.device, registry.config.fallback)?);
            }
            registry.devices.push(device);
        }

        if registry.calibration.is_none() {
            return Err(InputError::NoTouchDevice(registry.config.dir.clone()));
        }
        for role in [DeviceRole::Mouse, DeviceRole::Keyboard, DeviceRole::AuxKey] {
            if registry.role_path(role).is_none() {
                warn!(%role, "no device found for role");
            }
        }
        info!(count = registry.devices.len(), "input devices ready");
        Ok(registry)
    }

    /// Start watching the input directory for hot-plug changes.
    pub fn watch(&self) -> Result<HotplugWatch, InputError> {
        HotplugWatch::new(&self.config.dir)
    }

    /// Keep a watch inside the registry so [`InputInjector::poll_hotplug`]
    /// can service it.
    pub fn enable_hotplug(&mut self) -> Result<(), InputError> {
        self.watch = Some(self.watch()?);
        Ok(())
    }

    /// Apply every pending hot-plug notification. Returns the number of
    /// devices added or removed.
    pub fn service_hotplug(&mut self, watch: &HotplugWatch) -> Result<usize, InputError> {
        let mut changes = 0;
        for event in watch.poll()? {
            let changed = match event {
                HotplugEvent::Created(path) => self.on_create(&path),
                HotplugEvent::Removed(path) => self.on_remove(&path),
            };
            if changed {
                changes += 1;
            }
        }
        Ok(changes)
    }

    /// Open and register a newly created node.
    pub fn on_create(&mut self, path: &Path) -> bool {
        if self.devices.iter().any(|d| d.path == path) {
            return false;
        }
        match self.open(path) {
            Ok(device) => {
                info!(path = %path.display(), name = %device.identity.name, role = %device.role, "device added");
                self.devices.push(device);
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open new device");
                false
            }
        }
    }

    /// Forget a removed node, closing its descriptors.
    pub fn on_remove(&mut self, path: &Path) -> bool {
        let before = self.devices.len();
        self.devices.retain(|d| d.path != path);
        let removed = self.devices.len() != before;
        if removed {
            info!(path = %path.display(), "device removed");
        }
        removed
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Path of the first live device holding `role`.
    pub fn role_path(&self, role: DeviceRole) -> Option<&Path> {
        self.devices
            .iter()
            .find(|d| d.role == role)
            .map(|d| d.path.as_path())
    }

    fn open(&self, path: &Path) -> Result<InputDevice, InputError> {
        let device = evdev::Device::open(path).map_err(|e| InputError::DeviceOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let id = device.input_id();
        let identity = DeviceIdentity {
            name: device.name().unwrap_or_default().to_string(),
            location: device.physical_path().unwrap_or_default().to_string(),
            unique_id: device.unique_name().unwrap_or_default().to_string(),
            driver_version: device.driver_version(),
            bus: id.bus_type().0,
            vendor: id.vendor(),
            product: id.product(),
        };
        let role = self.config.markers.classify(&identity.name);
        debug!(path = %path.display(), name = %identity.name, %role, "classified device");

        let sink = match self.open_sink(path, role) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(path = %path.display(), %role, error = %e, "device is not writable");
                None
            }
        };

        Ok(InputDevice {
            path: path.to_path_buf(),
            identity,
            role,
            device,
            sink,
        })
    }

    fn open_sink(&self, path: &Path, role: DeviceRole) -> Result<Option<File>, InputError> {
        let file = match role {
            DeviceRole::Touch | DeviceRole::AuxKey => {
                OpenOptions::new()
                    .write(true)
                    .open(path)
                    .map_err(|e| InputError::DeviceOpen {
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    })?
            }
            DeviceRole::Mouse => ensure_node(&self.config.mouse_node)?,
            DeviceRole::Keyboard => ensure_node(&self.config.keyboard_node)?,
            DeviceRole::Unclassified => return Ok(None),
        };
        Ok(Some(file))
    }
}

impl InputInjector for DeviceRegistry {
    fn touch_calibration(&self) -> Option<TouchCalibration> {
        self.calibration
    }

    fn inject(&mut self, injection: &Injection) -> Result<(), InputError> {
        let role = injection.role();
        let sink = self
            .devices
            .iter_mut()
            .filter(|d| d.role == role)
            .find_map(|d| d.sink.as_mut())
            .ok_or(InputError::DeviceMissing(role))?;

        sink.write_all(&injection.encode())
            .map_err(|source| InputError::Write { role, source })
    }

    fn poll_hotplug(&mut self) -> Result<usize, InputError> {
        let Some(watch) = self.watch.take() else {
            return Ok(0);
        };
        let result = self.service_hotplug(&watch);
        self.watch = Some(watch);
        result
    }
}
