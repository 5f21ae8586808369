//! TCP front end for PAP sessions.
//!
//! Accepts one connection at a time, gates it on the unlock byte, and
//! hands it to a [`SessionEngine`](pap_session::SessionEngine). The next
//! connection is not accepted until the current session has finished.

mod server;

pub use server::{PapServer, ServerConfig};

/// Errors produced by the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
