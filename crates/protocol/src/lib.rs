//! Wire protocol for PAP sessions.
//!
//! A session is a single TCP connection carrying exactly one operation:
//!
//! ```text
//! Client -> Server: [1 byte: unlock 0x01]        (consumed by the accept loop)
//! Client -> Server: Frame(identity)
//! Client -> Server: [1 byte: mode 'D' | 'U' | 'L']
//! Client -> Server: Frame(path)
//! Server -> Client: [1 byte: status 0x00=OK, 0x01=ERROR]
//! ```
//!
//! followed by the mode-specific payload. See [`wire`] for the framing
//! primitives and [`types`] for the control codes.

pub mod constants;
pub mod error;
pub mod types;
pub mod wire;

pub use constants::{
    CHUNK_SIZE, DEFAULT_PORT, MAX_FRAME_LEN, MAX_IDENTITY_LEN, UNLOCK_SIGNAL,
};
pub use error::ProtocolError;
pub use types::{Mode, Status};
