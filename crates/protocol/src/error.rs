//! Error types for the wire layer.

use crate::constants::MAX_FRAME_LEN;

/// Errors produced while reading or writing protocol elements.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The stream ended or failed before the expected bytes arrived.
    #[error("short read: {0}")]
    ShortRead(#[source] std::io::Error),

    /// The stream failed before all bytes were written.
    #[error("short write: {0}")]
    ShortWrite(#[source] std::io::Error),

    #[error("invalid frame length: {0} (must be 1..={MAX_FRAME_LEN})")]
    InvalidFrameLength(usize),

    #[error("unknown mode byte: 0x{0:02x}")]
    UnknownMode(u8),

    #[error("unknown status byte: 0x{0:02x}")]
    UnknownStatus(u8),

    #[error("invalid UTF-8 in frame: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}
