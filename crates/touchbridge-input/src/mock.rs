//! Mock injector for testing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use touchbridge_types::{DeviceRole, TouchCalibration};

use crate::error::InputError;
use crate::{InputInjector, Injection};

/// Shared state for observing what `MockInjector` received.
#[derive(Debug, Default)]
struct MockInjectorState {
    injected: Vec<Injection>,
    missing: HashSet<DeviceRole>,
    hotplug_polls: usize,
}

/// Records injections instead of writing them to devices.
pub struct MockInjector {
    calibration: Option<TouchCalibration>,
    state: Arc<Mutex<MockInjectorState>>,
}

impl MockInjector {
    /// Create a mock backed by a touch panel with `calibration`.
    pub fn new(calibration: TouchCalibration) -> Self {
        Self {
            calibration: Some(calibration),
            state: Arc::new(Mutex::new(MockInjectorState::default())),
        }
    }

    /// Get a clonable handle for observing the injector from tests.
    pub fn handle(&self) -> MockInjectorHandle {
        MockInjectorHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable observer handle for `MockInjector`.
#[derive(Clone)]
pub struct MockInjectorHandle {
    state: Arc<Mutex<MockInjectorState>>,
}

impl MockInjectorHandle {
    /// Snapshot of every successful injection, in order.
    pub fn injected(&self) -> Vec<Injection> {
        self.state.lock().unwrap().injected.clone()
    }

    /// Number of times hot-plug was serviced.
    pub fn hotplug_polls(&self) -> usize {
        self.state.lock().unwrap().hotplug_polls
    }

    /// Make injections for `role` fail as if no such device were present.
    pub fn remove_role(&self, role: DeviceRole) {
        self.state.lock().unwrap().missing.insert(role);
    }
}

impl InputInjector for MockInjector {
    fn touch_calibration(&self) -> Option<TouchCalibration> {
        self.calibration
    }

    fn inject(&mut self, injection: &Injection) -> Result<(), InputError> {
        let mut state = self.state.lock().unwrap();
        let role = injection.role();
        if state.missing.contains(&role) {
            return Err(InputError::DeviceMissing(role));
        }
        state.injected.push(injection.clone());
        Ok(())
    }

    fn poll_hotplug(&mut self) -> Result<usize, InputError> {
        self.state.lock().unwrap().hotplug_polls += 1;
        Ok(0)
    }
}
