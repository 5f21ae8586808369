//! Session state machine.
//!
//! ```text
//! AwaitIdentity -> AwaitMode -> Downloading | Uploading | Listing -> Done
//! ```
//!
//! Each session is single-shot; no state is revisited.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use pap_file_ops::{PathResolver, ResolveError, SystemUsers, UserDirectory};
use pap_protocol::wire::{read_frame, read_mode};
use pap_protocol::{MAX_IDENTITY_LEN, Mode};

use crate::error::SessionError;
use crate::handlers;

/// What a completed session did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Downloaded { path: PathBuf, bytes: u64 },
    Uploaded { path: PathBuf, bytes: u64 },
    Listed { path: PathBuf, entries: u64 },
}

impl Transfer {
    pub fn mode(&self) -> Mode {
        match self {
            Transfer::Downloaded { .. } => Mode::Download,
            Transfer::Uploaded { .. } => Mode::Upload,
            Transfer::Listed { .. } => Mode::List,
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transfer::Downloaded { path, bytes } => {
                write!(f, "sent {bytes} bytes from {}", path.display())
            }
            Transfer::Uploaded { path, bytes } => {
                write!(f, "received {bytes} bytes into {}", path.display())
            }
            Transfer::Listed { path, entries } => {
                write!(f, "listed {entries} entries of {}", path.display())
            }
        }
    }
}

/// Result of a successful session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Identity exactly as received, after truncation.
    pub identity: Vec<u8>,
    pub transfer: Transfer,
}

/// Per-session request state handed to the transfer handlers.
pub(crate) struct SessionContext<'a, U> {
    pub identity: &'a [u8],
    pub resolver: &'a PathResolver<U>,
}

impl<U: UserDirectory> SessionContext<'_, U> {
    pub fn resolve(&self, raw: &[u8]) -> Result<PathBuf, ResolveError> {
        let resolved = self.resolver.resolve(raw, self.identity)?;
        debug!(
            raw = %String::from_utf8_lossy(raw),
            resolved = %resolved.display(),
            "path resolved"
        );
        Ok(resolved)
    }
}

/// Runs sessions over unlocked streams.
///
/// Holds only immutable state; the session identity lives on the stack of
/// [`run`](Self::run), so one engine may be shared freely.
pub struct SessionEngine<U = SystemUsers> {
    resolver: Arc<PathResolver<U>>,
}

impl<U> Clone for SessionEngine<U> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<U: UserDirectory> SessionEngine<U> {
    pub fn new(resolver: PathResolver<U>) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// Drives one session to completion.
    ///
    /// The stream must already be past the unlock byte. It is left open;
    /// closing it is the caller's job whatever the result.
    pub async fn run<S>(&self, stream: &mut S) -> Result<SessionOutcome, SessionError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // AwaitIdentity
        let identity = truncate_identity(read_frame(stream).await?);
        debug!(identity = %String::from_utf8_lossy(&identity), "identity received");

        // AwaitMode
        let mode = read_mode(stream).await?;
        debug!(%mode, "mode received");

        let ctx = SessionContext {
            identity: &identity,
            resolver: &self.resolver,
        };

        let transfer = match mode {
            Mode::Download => handlers::download(stream, &ctx).await?,
            Mode::Upload => handlers::upload(stream, &ctx).await?,
            Mode::List => handlers::list(stream, &ctx).await?,
        };

        Ok(SessionOutcome { identity, transfer })
    }
}

/// Keeps at most [`MAX_IDENTITY_LEN`] bytes of an identity frame.
fn truncate_identity(mut bytes: Vec<u8>) -> Vec<u8> {
    bytes.truncate(MAX_IDENTITY_LEN);
    bytes
}
