//! Error types for the session engine.

use std::path::PathBuf;

use pap_file_ops::ResolveError;
use pap_protocol::ProtocolError;

/// Errors that end a session.
///
/// Only [`SessionError::ResourceOpen`] is announced to the client (as an
/// `ERROR` status byte); the list handler additionally announces failures
/// that precede its status. Everything else ends the session by closing
/// the stream.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("path resolution failed: {0}")]
    PathResolution(#[from] ResolveError),

    #[error("cannot open {}: {source}", path.display())]
    ResourceOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot create parent directories of {}: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },
}
