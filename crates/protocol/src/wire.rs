//! Framing primitives.
//!
//! # Wire format
//!
//! ```text
//! FRAME:        [4 bytes BE: len][len bytes: payload]     1 <= len <= 4096
//! END MARKER:   [4 bytes BE: 0x00000000]                  list terminator only
//! CONTROL BYTE: [1 byte]                                  unlock, mode, status
//! ```
//!
//! Every read either yields exactly the requested bytes or fails; partial
//! progress is never reported as success.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::constants::{MAX_FRAME_LEN, UNLOCK_SIGNAL};
use crate::error::ProtocolError;
use crate::types::{Mode, Status};

/// Reads exactly `len` bytes.
pub async fn read_exact<R: AsyncRead + Unpin>(
    reader: &mut R,
    len: usize,
) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = vec![0u8; len];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(ProtocolError::ShortRead)?;
    Ok(buf)
}

/// Writes all of `bytes`.
pub async fn write_exact<W: AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> Result<(), ProtocolError> {
    writer
        .write_all(bytes)
        .await
        .map_err(ProtocolError::ShortWrite)
}

fn check_frame_len(len: usize) -> Result<(), ProtocolError> {
    if len == 0 || len > MAX_FRAME_LEN {
        return Err(ProtocolError::InvalidFrameLength(len));
    }
    Ok(())
}

/// Reads one length-prefixed frame.
///
/// The length is validated before any payload is read, so an oversized
/// header never causes a large allocation.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let len = reader.read_u32().await.map_err(ProtocolError::ShortRead)? as usize;
    check_frame_len(len)?;
    read_exact(reader, len).await
}

/// Reads one frame and decodes it as UTF-8.
pub async fn read_frame_string<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<String, ProtocolError> {
    let bytes = read_frame(reader).await?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes one length-prefixed frame.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    bytes: &[u8],
) -> Result<(), ProtocolError> {
    check_frame_len(bytes.len())?;
    writer
        .write_u32(bytes.len() as u32)
        .await
        .map_err(ProtocolError::ShortWrite)?;
    write_exact(writer, bytes).await
}

/// Writes the zero-length frame that terminates a directory listing.
pub async fn write_end_marker<W: AsyncWrite + Unpin>(
    writer: &mut W,
) -> Result<(), ProtocolError> {
    writer.write_u32(0).await.map_err(ProtocolError::ShortWrite)?;
    writer.flush().await.map_err(ProtocolError::ShortWrite)
}

/// Reads one directory listing entry.
///
/// Returns `None` when the end marker is encountered.
pub async fn read_list_entry<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Vec<u8>>, ProtocolError> {
    let len = reader.read_u32().await.map_err(ProtocolError::ShortRead)? as usize;
    if len == 0 {
        return Ok(None);
    }
    check_frame_len(len)?;
    read_exact(reader, len).await.map(Some)
}

async fn read_byte<R: AsyncRead + Unpin>(reader: &mut R) -> Result<u8, ProtocolError> {
    reader.read_u8().await.map_err(ProtocolError::ShortRead)
}

async fn write_byte<W: AsyncWrite + Unpin>(writer: &mut W, byte: u8) -> Result<(), ProtocolError> {
    writer
        .write_u8(byte)
        .await
        .map_err(ProtocolError::ShortWrite)?;
    writer.flush().await.map_err(ProtocolError::ShortWrite)
}

/// Reads the mode byte. Unrecognized values yield [`ProtocolError::UnknownMode`].
pub async fn read_mode<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Mode, ProtocolError> {
    Mode::try_from(read_byte(reader).await?)
}

pub async fn write_mode<W: AsyncWrite + Unpin>(
    writer: &mut W,
    mode: Mode,
) -> Result<(), ProtocolError> {
    write_byte(writer, mode.as_byte()).await
}

/// Reads the status byte.
pub async fn read_status<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Status, ProtocolError> {
    Status::try_from(read_byte(reader).await?)
}

/// Writes the status byte and flushes so the client can act on it before
/// any payload follows.
pub async fn write_status<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: Status,
) -> Result<(), ProtocolError> {
    write_byte(writer, status.as_byte()).await
}

/// Reads the first byte of a connection and reports whether it unlocks a
/// session.
pub async fn read_unlock<R: AsyncRead + Unpin>(reader: &mut R) -> Result<bool, ProtocolError> {
    Ok(read_byte(reader).await? == UNLOCK_SIGNAL)
}

pub async fn write_unlock<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<(), ProtocolError> {
    write_byte(writer, UNLOCK_SIGNAL).await
}
