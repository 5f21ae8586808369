use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn};

use pap_file_ops::UserDirectory;
use pap_protocol::Status;
use pap_protocol::wire::{read_frame, write_end_marker, write_frame, write_status};

use crate::error::SessionError;
use crate::session::{SessionContext, Transfer};

/// Streams the names in a directory, one frame each, then the end marker.
///
/// Unlike the other handlers, every failure before the status byte is
/// announced with `ERROR`. Names are sent as raw OS bytes in `read_dir`
/// order. A failure mid-enumeration ends the stream without the marker.
pub(crate) async fn list<S, U>(
    stream: &mut S,
    ctx: &SessionContext<'_, U>,
) -> Result<Transfer, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    U: UserDirectory,
{
    let requested = match read_frame(stream).await {
        Ok(requested) => requested,
        Err(e) => return Err(super::reject(stream, e.into()).await),
    };

    let path = match ctx.resolve(&requested) {
        Ok(path) => path,
        Err(e) => return Err(super::reject(stream, e.into()).await),
    };

    let mut dir = match tokio::fs::read_dir(&path).await {
        Ok(dir) => dir,
        Err(source) => {
            warn!(path = %path.display(), "listing rejected: {source}");
            return Err(super::reject(stream, SessionError::ResourceOpen { path, source }).await);
        }
    };

    write_status(stream, Status::Ok).await?;

    let mut entries: u64 = 0;
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|source| SessionError::FileIo {
            path: path.clone(),
            source,
        })?
    {
        let name = entry.file_name();
        if name == "." || name == ".." {
            continue;
        }
        write_frame(stream, name.as_encoded_bytes()).await?;
        entries += 1;
    }

    write_end_marker(stream).await?;
    debug!(path = %path.display(), entries, "listing sent");

    Ok(Transfer::Listed { path, entries })
}
