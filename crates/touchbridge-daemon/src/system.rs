//! Host integration behind the system commands.
//!
//! Launch requests, key events and mock locations are handed to the host's
//! command-line tools. Brightness and battery state live in sysfs files.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use touchbridge_protocol::{LaunchRequest, MockLocation};
use tracing::debug;

use crate::config::SystemConfig;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Status { program: String, status: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected value {value:?} in {path}")]
    Parse { path: PathBuf, value: String },
}

/// Battery charge level and charger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Percent, 0-100.
    pub level: u8,
    pub charging: bool,
}

/// Side effects and queries outside the input devices.
#[async_trait]
pub trait SystemBridge: Send {
    async fn launch(&mut self, request: &LaunchRequest) -> Result<(), SystemError>;

    /// Inject a key through the host's own input service.
    async fn key_event(&mut self, code: u32) -> Result<(), SystemError>;

    async fn mock_location(&mut self, location: &MockLocation) -> Result<(), SystemError>;

    /// Write the backlight level and persist it as the system setting.
    async fn set_brightness(&mut self, level: u8) -> Result<(), SystemError>;

    /// Current backlight level in the panel's own range, which may exceed 255.
    async fn brightness(&mut self) -> Result<u32, SystemError>;

    async fn battery(&mut self) -> Result<BatteryStatus, SystemError>;
}

/// [`SystemBridge`] backed by shell tools and sysfs.
pub struct ShellSystem {
    config: SystemConfig,
}

impl ShellSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self { config }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<(), SystemError> {
        debug!(program, ?args, "running");
        let status = tokio::process::Command::new(program)
            .args(args)
            .status()
            .await
            .map_err(|source| SystemError::Spawn {
                program: program.to_string(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SystemError::Status {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}

/// Arguments for an activity-manager launch.
fn launch_args(request: &LaunchRequest) -> Vec<String> {
    let mut args = vec![request.kind.subcommand().to_string()];
    if !request.action.is_empty() {
        args.push("-a".to_string());
        args.push(request.action.clone());
    }
    if !request.package.is_empty() {
        args.push("-n".to_string());
        if request.activity.is_empty() {
            args.push(request.package.clone());
        } else {
            args.push(format!("{}/{}", request.package, request.activity));
        }
    }
    args.extend(request.extras.split_whitespace().map(str::to_string));
    args
}

/// Arguments for the mock-location broadcast.
fn location_args(action: &str, location: &MockLocation) -> Vec<String> {
    let extra = |flag: &str, key: &str, value: String| [flag.to_string(), key.to_string(), value];
    let mut args = vec!["broadcast".to_string(), "-a".to_string(), action.to_string()];
    args.extend(extra("--es", "provider", location.provider.clone()));
    args.extend(extra("--el", "time", location.time.to_string()));
    args.extend(extra("--ed", "latitude", location.latitude.to_string()));
    args.extend(extra("--ed", "longitude", location.longitude.to_string()));
    args.extend(extra("--ed", "altitude", location.altitude.to_string()));
    args.extend(extra("--ef", "accuracy", location.accuracy.to_string()));
    args.extend(extra("--ef", "bearing", location.bearing.to_string()));
    args.extend(extra("--ef", "speed", location.speed.to_string()));
    args
}

async fn read_trimmed(path: &Path) -> Result<String, SystemError> {
    tokio::fs::read_to_string(path)
        .await
        .map(|s| s.trim().to_string())
        .map_err(|source| SystemError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_value<T: std::str::FromStr>(path: &Path, value: &str) -> Result<T, SystemError> {
    value.parse().map_err(|_| SystemError::Parse {
        path: path.to_path_buf(),
        value: value.to_string(),
    })
}

#[async_trait]
impl SystemBridge for ShellSystem {
    async fn launch(&mut self, request: &LaunchRequest) -> Result<(), SystemError> {
        self.run(&self.config.activity_manager, &launch_args(request))
            .await
    }

    async fn key_event(&mut self, code: u32) -> Result<(), SystemError> {
        let args = ["keyevent".to_string(), code.to_string()];
        self.run(&self.config.input_tool, &args).await
    }

    async fn mock_location(&mut self, location: &MockLocation) -> Result<(), SystemError> {
        let args = location_args(&self.config.mock_location_action, location);
        self.run(&self.config.activity_manager, &args).await
    }

    async fn set_brightness(&mut self, level: u8) -> Result<(), SystemError> {
        let path = &self.config.backlight;
        tokio::fs::write(path, format!("{level}\n"))
            .await
            .map_err(|source| SystemError::Io {
                path: path.clone(),
                source,
            })?;
        let args = [
            "put".to_string(),
            "system".to_string(),
            "screen_brightness".to_string(),
            level.to_string(),
        ];
        self.run(&self.config.settings_tool, &args).await
    }

    async fn brightness(&mut self) -> Result<u32, SystemError> {
        let path = &self.config.backlight;
        let value = read_trimmed(path).await?;
        parse_value(path, &value)
    }

    async fn battery(&mut self) -> Result<BatteryStatus, SystemError> {
        let capacity = self.config.battery_dir.join("capacity");
        let level = parse_value(&capacity, &read_trimmed(&capacity).await?)?;
        let status = read_trimmed(&self.config.battery_dir.join("status")).await?;
        Ok(BatteryStatus {
            level,
            charging: matches!(status.as_str(), "Charging" | "Full"),
        })
    }
}

#[cfg(any(test, feature = "mock"))]
pub mod mock {
    //! Recording [`SystemBridge`] for tests.

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use touchbridge_protocol::{LaunchRequest, MockLocation};

    use super::{BatteryStatus, SystemBridge, SystemError};

    /// One call made on [`RecordingSystem`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum SystemCall {
        Launch(LaunchRequest),
        KeyEvent(u32),
        MockLocation(MockLocation),
        SetBrightness(u8),
    }

    #[derive(Debug)]
    struct RecordingState {
        calls: Vec<SystemCall>,
        brightness: u32,
        battery: BatteryStatus,
        read_only: bool,
        unreadable: bool,
    }

    /// Keeps brightness in memory and records every side effect.
    pub struct RecordingSystem {
        state: Arc<Mutex<RecordingState>>,
    }

    impl Default for RecordingSystem {
        fn default() -> Self {
            Self::new()
        }
    }

    impl RecordingSystem {
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(RecordingState {
                    calls: Vec::new(),
                    brightness: 100,
                    battery: BatteryStatus {
                        level: 80,
                        charging: false,
                    },
                    read_only: false,
                    unreadable: false,
                })),
            }
        }

        pub fn handle(&self) -> RecordingHandle {
            RecordingHandle {
                state: Arc::clone(&self.state),
            }
        }
    }

    /// Clonable observer handle for `RecordingSystem`.
    #[derive(Clone)]
    pub struct RecordingHandle {
        state: Arc<Mutex<RecordingState>>,
    }

    impl RecordingHandle {
        pub fn calls(&self) -> Vec<SystemCall> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn set_battery(&self, battery: BatteryStatus) {
            self.state.lock().unwrap().battery = battery;
        }

        /// Make brightness writes fail.
        pub fn set_read_only(&self, read_only: bool) {
            self.state.lock().unwrap().read_only = read_only;
        }

        /// Make brightness and battery reads fail.
        pub fn set_unreadable(&self, unreadable: bool) {
            self.state.lock().unwrap().unreadable = unreadable;
        }
    }

    #[async_trait]
    impl SystemBridge for RecordingSystem {
        async fn launch(&mut self, request: &LaunchRequest) -> Result<(), SystemError> {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(SystemCall::Launch(request.clone()));
            Ok(())
        }

        async fn key_event(&mut self, code: u32) -> Result<(), SystemError> {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(SystemCall::KeyEvent(code));
            Ok(())
        }

        async fn mock_location(&mut self, location: &MockLocation) -> Result<(), SystemError> {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(SystemCall::MockLocation(location.clone()));
            Ok(())
        }

        async fn set_brightness(&mut self, level: u8) -> Result<(), SystemError> {
            let mut state = self.state.lock().unwrap();
            if state.read_only {
                return Err(SystemError::Io {
                    path: "backlight".into(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            state.calls.push(SystemCall::SetBrightness(level));
            state.brightness = u32::from(level);
            Ok(())
        }

        async fn brightness(&mut self) -> Result<u32, SystemError> {
            let state = self.state.lock().unwrap();
            if state.unreadable {
                return Err(unreadable("backlight"));
            }
            Ok(state.brightness)
        }

        async fn battery(&mut self) -> Result<BatteryStatus, SystemError> {
            let state = self.state.lock().unwrap();
            if state.unreadable {
                return Err(unreadable("battery"));
            }
            Ok(state.battery)
        }
    }

    fn unreadable(path: &str) -> SystemError {
        SystemError::Io {
            path: path.into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }
}
