//! Transfer handlers, one per [`Mode`](pap_protocol::Mode).
//!
//! Payload layouts are documented at the crate root.

mod download;
mod list;
mod upload;

pub(crate) use download::download;
pub(crate) use list::list;
pub(crate) use upload::upload;

use tokio::io::AsyncWrite;
use tracing::debug;

use pap_protocol::Status;
use pap_protocol::wire::write_status;

use crate::error::SessionError;

/// Announces `err` to the client with an `ERROR` status, then hands it back.
///
/// The client may already be gone, so a failed status write is only logged.
async fn reject<W: AsyncWrite + Unpin>(writer: &mut W, err: SessionError) -> SessionError {
    if let Err(e) = write_status(writer, Status::Error).await {
        debug!("could not send ERROR status: {e}");
    }
    err
}
