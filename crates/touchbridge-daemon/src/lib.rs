//! Core daemon for touchbridge.
//!
//! Binds the control socket, serves one client at a time and dispatches
//! each command line to the input devices or to the host system.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod server;
pub mod setup;
pub mod system;

pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::DaemonError;
pub use server::{serve_connection, Server};
pub use system::{BatteryStatus, ShellSystem, SystemBridge, SystemError};
