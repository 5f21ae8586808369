use std::fmt;

use crate::error::ProtocolError;

/// Operation requested by the client, sent as a single ASCII byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Download,
    Upload,
    List,
}

impl Mode {
    /// Wire byte for this mode.
    pub const fn as_byte(self) -> u8 {
        match self {
            Mode::Download => b'D',
            Mode::Upload => b'U',
            Mode::List => b'L',
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'D' => Ok(Mode::Download),
            b'U' => Ok(Mode::Upload),
            b'L' => Ok(Mode::List),
            other => Err(ProtocolError::UnknownMode(other)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Download => "download",
            Mode::Upload => "upload",
            Mode::List => "list",
        })
    }
}

/// Server verdict on whether the requested resource could be opened.
///
/// Sent once per session, after the request path and before any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
}

impl Status {
    pub const fn as_byte(self) -> u8 {
        match self {
            Status::Ok => 0x00,
            Status::Error => 0x01,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0x00 => Ok(Status::Ok),
            0x01 => Ok(Status::Error),
            other => Err(ProtocolError::UnknownStatus(other)),
        }
    }
}
