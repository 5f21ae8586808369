//! Error types for the client.

use std::path::PathBuf;

use pap_protocol::ProtocolError;

/// Errors produced by [`PapClient`](crate::PapClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("connection timed out")]
    Timeout,

    /// The server answered with an `ERROR` status.
    #[error("server rejected request for {0}")]
    Rejected(String),

    #[error("server sent an unusable filename: {0:?}")]
    InvalidFilename(String),

    #[error("local file not found: {}", .0.display())]
    LocalFileNotFound(PathBuf),

    /// The connection closed before the end-of-listing marker.
    #[error("listing truncated by server")]
    Truncated,
}
