use std::fmt;

use thiserror::Error;

/// Region of the datagram a truncation was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Header,
    Payload,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Header => f.write_str("header"),
            Region::Payload => f.write_str("payload"),
        }
    }
}

/// Errors returned by RPS decoding.
///
/// Unrecognized opcodes and out-of-range payload codes are representable
/// outcomes, not errors; truncation is the only failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{at} truncated: need {needed} bytes, got {available}")]
    Truncated {
        at: Region,
        needed: usize,
        available: usize,
    },
}
