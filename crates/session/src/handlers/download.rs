use std::io;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use pap_file_ops::{UserDirectory, advertised_name};
use pap_protocol::wire::{read_frame, write_exact, write_frame, write_status};
use pap_protocol::{CHUNK_SIZE, ProtocolError, Status};

use crate::error::SessionError;
use crate::session::{SessionContext, Transfer};

/// Sends a file to the client.
///
/// Once `OK` and the filename are out, a failure can only be signaled by
/// closing the stream early.
pub(crate) async fn download<S, U>(
    stream: &mut S,
    ctx: &SessionContext<'_, U>,
) -> Result<Transfer, SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    U: UserDirectory,
{
    let requested = read_frame(stream).await?;
    let path = ctx.resolve(&requested)?;

    let mut file = match open_for_reading(&path).await {
        Ok(file) => file,
        Err(source) => {
            warn!(path = %path.display(), "download rejected: {source}");
            return Err(super::reject(stream, SessionError::ResourceOpen { path, source }).await);
        }
    };

    let filename = advertised_name(path.as_os_str().as_encoded_bytes());
    write_status(stream, Status::Ok).await?;
    write_frame(stream, filename).await?;
    debug!(path = %path.display(), "sending file");

    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|source| SessionError::FileIo {
                path: path.clone(),
                source,
            })?;
        if n == 0 {
            break;
        }
        write_exact(stream, &buf[..n]).await?;
        total += n as u64;
    }
    stream.flush().await.map_err(ProtocolError::ShortWrite)?;

    Ok(Transfer::Downloaded { path, bytes: total })
}

/// Opens `path` for reading. Directories count as unopenable.
async fn open_for_reading(path: &Path) -> io::Result<File> {
    let file = File::open(path).await?;
    if file.metadata().await?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::IsADirectory,
            "is a directory",
        ));
    }
    Ok(file)
}
