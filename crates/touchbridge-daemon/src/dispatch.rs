//! Command dispatch.
//!
//! Turns parsed commands into device injections or system calls and builds
//! the reply line for the query commands.

use touchbridge_input::burst::{
    key_press, key_pulse, key_release, keyboard_pulse, text_injections, touch_down, touch_move,
    touch_up,
};
use touchbridge_input::{EvdevKey, InputError, InputInjector, Injection};
use touchbridge_protocol::{Command, TouchPhase};
use touchbridge_types::{Axis, CoordinateMapper, DeviceRole, MouseRecord};
use tracing::{debug, warn};

use crate::error::DaemonError;
use crate::system::SystemBridge;

/// Executes commands against the input devices and the host.
pub struct Dispatcher {
    injector: Box<dyn InputInjector>,
    system: Box<dyn SystemBridge>,
    mapper: CoordinateMapper,
    default_keyevent: u32,
}

impl Dispatcher {
    /// Create a dispatcher. The coordinate mapper is seeded from the
    /// injector's touch calibration, which must be present.
    pub fn new(
        injector: Box<dyn InputInjector>,
        system: Box<dyn SystemBridge>,
        default_keyevent: u32,
    ) -> Result<Self, DaemonError> {
        let calibration = injector
            .touch_calibration()
            .ok_or(InputError::DeviceMissing(DeviceRole::Touch))?;
        Ok(Self {
            injector,
            system,
            mapper: CoordinateMapper::new(calibration),
            default_keyevent,
        })
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Apply pending device hot-plug changes.
    pub fn service_hotplug(&mut self) -> Result<usize, DaemonError> {
        Ok(self.injector.poll_hotplug()?)
    }

    /// Parse and execute one line.
    pub async fn handle_line(&mut self, line: &str) -> Result<Option<String>, DaemonError> {
        let command = Command::parse(line)?;
        self.dispatch(command).await
    }

    /// Execute one command, returning the reply line if it has one.
    pub async fn dispatch(&mut self, command: Command) -> Result<Option<String>, DaemonError> {
        match command {
            Command::Canvas { height, width } => {
                self.mapper.set_canvas(height, width)?;
                debug!(height, width, factor = ?self.mapper.factor(), "canvas updated");
            }
            Command::Touch {
                phase,
                x,
                y,
                pressure,
            } => {
                let px = self.mapper.map(x, Axis::X);
                let py = self.mapper.map(y, Axis::Y);
                let pp = self.mapper.map(pressure, Axis::Pressure);
                debug!(?phase, x = px, y = py, pressure = pp, "touch");
                let burst = match phase {
                    TouchPhase::Down => touch_down(px, py, pp),
                    TouchPhase::Move => touch_move(px, py, pp),
                    TouchPhase::Up => touch_up(pp),
                };
                self.inject(&Injection::Touch(burst))?;
            }
            Command::Back => self.inject(&Injection::AuxKey(key_pulse(EvdevKey::KEY_BACK)))?,
            Command::PowerPress => {
                self.inject(&Injection::AuxKey(key_press(EvdevKey::KEY_POWER)))?;
            }
            Command::PowerRelease => {
                self.inject(&Injection::AuxKey(key_release(EvdevKey::KEY_POWER)))?;
            }
            Command::Home => {
                let records = keyboard_pulse(u32::from(EvdevKey::KEY_HOMEPAGE.0))?;
                self.inject(&Injection::Keyboard(records))?;
            }
            Command::SystemKey { code } => {
                let code = code.unwrap_or(self.default_keyevent);
                self.system.key_event(code).await?;
            }
            Command::Text(text) => {
                for injection in text_injections(&text) {
                    self.inject(&injection)?;
                }
            }
            Command::Key { code } => {
                self.inject(&Injection::Keyboard(keyboard_pulse(code)?))?;
            }
            Command::Mouse { kind, x, y } => {
                self.inject(&Injection::Mouse(MouseRecord { kind, x, y }))?;
            }
            Command::Location(location) => self.system.mock_location(&location).await?,
            Command::SetBrightness(level) => {
                let applied = match self.system.set_brightness(level).await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(level, error = %e, "failed to set brightness");
                        false
                    }
                };
                let current = match self.system.brightness().await {
                    Ok(value) => i64::from(value),
                    Err(e) => {
                        warn!(error = %e, "failed to read brightness");
                        -1
                    }
                };
                return Ok(Some(format!("P {} {current}", u8::from(applied))));
            }
            Command::GetBrightness => {
                let reply = match self.system.brightness().await {
                    Ok(value) => format!("G {value}"),
                    Err(e) => {
                        warn!(error = %e, "failed to read brightness");
                        "G -1".to_string()
                    }
                };
                return Ok(Some(reply));
            }
            Command::Battery => {
                let reply = match self.system.battery().await {
                    Ok(status) => format!("S {} {}", status.level, u8::from(status.charging)),
                    Err(e) => {
                        warn!(error = %e, "failed to read battery");
                        "S -1 0".to_string()
                    }
                };
                return Ok(Some(reply));
            }
            Command::Launch(request) => self.system.launch(&request).await?,
        }
        Ok(None)
    }

    fn inject(&mut self, injection: &Injection) -> Result<(), DaemonError> {
        self.injector.inject(injection)?;
        Ok(())
    }
}
