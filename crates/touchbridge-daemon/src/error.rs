//! Daemon errors.

use thiserror::Error;

use crate::system::SystemError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("protocol error: {0}")]
    Protocol(#[from] touchbridge_protocol::ProtocolError),

    #[error("input error: {0}")]
    Input(#[from] touchbridge_input::InputError),

    #[error("canvas error: {0}")]
    Mapper(#[from] touchbridge_types::MapperError),

    #[error("system error: {0}")]
    System(#[from] SystemError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to accept connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("failed to read from connection: {0}")]
    Read(#[source] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DaemonError {
    /// Process exit status for a fatal error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Bind { .. } => 2,
            Self::Accept(_) | Self::Read(_) => 3,
            Self::Config(_) => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        let io = || std::io::Error::other("boom");
        assert_eq!(
            DaemonError::Input(touchbridge_input::InputError::NoTouchDevice("/dev/input".into()))
                .exit_code(),
            1
        );
        assert_eq!(
            DaemonError::Bind {
                addr: "0.0.0.0:2301".into(),
                source: io()
            }
            .exit_code(),
            2
        );
        assert_eq!(DaemonError::Accept(io()).exit_code(), 3);
        assert_eq!(DaemonError::Read(io()).exit_code(), 3);
        assert_eq!(DaemonError::Config("bad".into()).exit_code(), 4);
    }
}
