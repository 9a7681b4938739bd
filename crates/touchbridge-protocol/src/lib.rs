//! Control channel protocol for touchbridge.
//!
//! The remote controller sends newline-terminated ASCII commands over TCP.
//! [`LineFramer`] reassembles complete lines across socket reads, and
//! [`Command::parse`] turns each line into a typed command for the daemon's
//! dispatcher.

pub mod command;
pub mod error;
pub mod framer;

pub use command::{Command, LaunchKind, LaunchRequest, MockLocation, TouchPhase};
pub use error::ProtocolError;
pub use framer::{LineFramer, DEFAULT_READ_CHUNK};
