use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

use pap_file_ops::{UserDirectory, ensure_parent_dirs};
use pap_protocol::wire::{read_frame, write_status};
use pap_protocol::{CHUNK_SIZE, ProtocolError, Status};

use crate::error::SessionError;
use crate::session::{SessionContext, Transfer};

/// Receives a file from the client.
///
/// The client closing its write side is the only completion signal.
/// Existing files are truncated without confirmation.
pub(crate) async fn upload<S, U>(
    stream: &mut S,
    ctx: &SessionContext<'_, U>,
) -> Result<Transfer, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    U: UserDirectory,
{
    let target = read_frame(stream).await?;
    let path = ctx.resolve(&target)?;

    // Deliberately no status byte: deployed clients tell this bare close
    // apart from the ERROR sent for an unopenable target.
    if let Err(source) = ensure_parent_dirs(&path) {
        warn!(path = %path.display(), "upload aborted: {source}");
        return Err(SessionError::DirectoryCreation { path, source });
    }

    let mut file = match File::create(&path).await {
        Ok(file) => file,
        Err(source) => {
            warn!(path = %path.display(), "upload rejected: {source}");
            return Err(super::reject(stream, SessionError::ResourceOpen { path, source }).await);
        }
    };

    write_status(stream, Status::Ok).await?;
    debug!(path = %path.display(), "receiving file");

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                error!(path = %path.display(), received = total, "stream failed mid-upload: {e}");
                return Err(ProtocolError::ShortRead(e).into());
            }
        };
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .await
            .map_err(|source| SessionError::FileIo {
                path: path.clone(),
                source,
            })?;
        total += n as u64;
    }

    file.flush().await.map_err(|source| SessionError::FileIo {
        path: path.clone(),
        source,
    })?;

    Ok(Transfer::Uploaded { path, bytes: total })
}
