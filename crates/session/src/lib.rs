//! PAP session engine.
//!
//! Drives one unlocked connection through identity, mode and exactly one
//! transfer (download, upload or directory listing). The caller owns the
//! accept loop and the unlock gate, and closes the stream afterwards.
//!
//! # Wire format
//!
//! Framing is defined in [`pap_protocol::wire`]. After the identity frame
//! and mode byte, each mode carries:
//!
//! ```text
//! DOWNLOAD ('D'):
//!   Client -> Server: Frame(requested_path)
//!   Server -> Client: [status]
//!     OK:    Frame(filename), raw file bytes until the server closes
//!
//! UPLOAD ('U'):
//!   Client -> Server: Frame(target_path)
//!   Server -> Client: [status]
//!     OK:    Client -> Server: raw file bytes until the client closes its write side
//!
//! LIST ('L'):
//!   Client -> Server: Frame(dir_path)
//!   Server -> Client: [status]
//!     OK:    Frame(entry_name)*, then [4 bytes: 0x00000000]
//! ```
//!
//! Path and identity frames are raw bytes; nothing requires them to be
//! UTF-8.

pub mod error;
mod handlers;
pub mod session;

#[cfg(test)]
mod test_support;

pub use error::SessionError;
pub use session::{SessionEngine, SessionOutcome, Transfer};
