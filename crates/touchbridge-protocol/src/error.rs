//! Protocol errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty command line")]
    Empty,

    #[error("unknown opcode {0:?}")]
    UnknownOpcode(char),

    #[error("opcode {opcode:?} needs {expected} fields, parsed {found}")]
    MissingFields {
        opcode: char,
        expected: usize,
        found: usize,
    },
}
