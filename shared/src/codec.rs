//! Wire codec: bincode payloads inside length-prefixed frames.
//!
//! Every message is one frame: a 4-byte big-endian payload length followed
//! by the bincode-encoded payload. TCP gives us a byte stream, not message
//! boundaries, so the prefix is what keeps "one request, one reply" intact
//! when messages coalesce or fragment in flight.
//!
//! I/O failures and undecodable payloads are kept apart on purpose: a frame
//! that arrives intact but fails [`decode`] is a recoverable, per-round
//! problem, while a failed read means the connection is gone.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{self, ErrorKind};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Bytes in the frame length prefix.
pub const LEN_PREFIX: usize = 4;

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(message)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, bincode::Error> {
    bincode::deserialize(bytes)
}

/// Encodes `message` and writes it as one frame.
///
/// Frames larger than `max_len` are refused before anything is written, so
/// a peer honoring the same limit can always receive with a fixed buffer.
pub async fn write_frame<W, T>(writer: &mut W, message: &T, max_len: usize) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = encode(message).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
    if payload.len() > max_len {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!(
                "frame of {} bytes exceeds the {} byte limit",
                payload.len(),
                max_len
            ),
        ));
    }

    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(&payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame into `buf` and returns the payload length.
///
/// Returns `Ok(None)` when the peer closed the connection cleanly between
/// frames. EOF in the middle of a frame, or a frame longer than `buf`, is
/// an error.
pub async fn read_frame<R>(reader: &mut R, buf: &mut [u8]) -> io::Result<Option<usize>>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; LEN_PREFIX];
    match reader.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > buf.len() {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!(
                "frame of {} bytes exceeds the {} byte receive buffer",
                len,
                buf.len()
            ),
        ));
    }

    reader.read_exact(&mut buf[..len]).await?;
    Ok(Some(len))
}
