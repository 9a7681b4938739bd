//! Input subsystem errors.

use std::path::PathBuf;

use thiserror::Error;
use touchbridge_types::DeviceRole;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open device {path}: {reason}")]
    DeviceOpen { path: PathBuf, reason: String },

    #[error("failed to scan {0}: {1}")]
    Scan(PathBuf, std::io::Error),

    #[error("no touch device found in {0}")]
    NoTouchDevice(PathBuf),

    #[error("no {0} device available")]
    DeviceMissing(DeviceRole),

    #[error("failed to write to {role} device: {source}")]
    Write {
        role: DeviceRole,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected axis 0x{0:04x} on touch device")]
    UnexpectedAxis(u16),

    #[error("touch device does not report the {0} axis")]
    MissingAxis(&'static str),

    #[error("failed to read calibration: {0}")]
    Calibration(String),

    #[error("key code {0} does not fit a keyboard record")]
    KeyCodeOutOfRange(u32),

    #[error("failed to prepare node {path}: {reason}")]
    Node { path: PathBuf, reason: String },

    #[error("hot-plug watch failed: {0}")]
    Watch(String),
}
