//! I/O utilities for sending and receiving protocol messages
//!
//! Pairs the typed opcodes in [`crate::protocol`] with the raw frames in
//! [`crate::framing`].

use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::framing::{FrameError, FrameReader, FrameWriter, RawFrame};
use crate::protocol::{Request, Response};

// =============================================================================
// Error Conversion
// =============================================================================

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(msg) => io::Error::other(msg),
            FrameError::ConnectionClosed => {
                io::Error::new(io::ErrorKind::ConnectionReset, "connection closed")
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}

// =============================================================================
// Message Sending
// =============================================================================

/// Send a request to the server
pub async fn send_request<W>(
    writer: &mut FrameWriter<W>,
    request: Request,
    payload: &[u8],
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    writer
        .write(request.opcode(), payload)
        .await
        .map_err(Into::into)
}

/// Send a response to a client
pub async fn send_response<W>(
    writer: &mut FrameWriter<W>,
    response: Response,
    payload: &[u8],
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    writer
        .write(response.opcode(), payload)
        .await
        .map_err(Into::into)
}

/// Send an error response carrying a human-readable message
pub async fn send_error<W>(
    writer: &mut FrameWriter<W>,
    response: Response,
    message: &str,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    send_response(writer, response, message.as_bytes()).await
}

// =============================================================================
// Message Receiving
// =============================================================================

/// A response read from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedResponse {
    pub response: Response,
    pub payload: Vec<u8>,
}

impl ReceivedResponse {
    /// The payload as a UTF-8 message (lossy), for error and text replies
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Read a response from the stream
///
/// Returns `Ok(None)` if the connection was cleanly closed.
///
/// # Errors
///
/// Returns `InvalidData` if the opcode is not a known response.
pub async fn read_response<R>(reader: &mut FrameReader<R>) -> io::Result<Option<ReceivedResponse>>
where
    R: AsyncReadExt + Unpin,
{
    let Some(frame) = reader.read_frame().await? else {
        return Ok(None);
    };
    parse_response_frame(frame).map(Some)
}

/// Read a raw request frame from the stream
///
/// The opcode is left numeric so the server can answer unknown requests
/// instead of dropping the connection.
pub async fn read_request<R>(reader: &mut FrameReader<R>) -> Result<Option<RawFrame>, FrameError>
where
    R: AsyncReadExt + Unpin,
{
    reader.read_frame().await
}

fn parse_response_frame(frame: RawFrame) -> io::Result<ReceivedResponse> {
    let Some(response) = Response::from_opcode(frame.opcode) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown response opcode {}", frame.opcode),
        ));
    };
    Ok(ReceivedResponse {
        response,
        payload: frame.payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_send_and_receive_response() {
        let mut buffer = Vec::new();
        {
            let mut writer = FrameWriter::new(Cursor::new(&mut buffer));
            send_response(&mut writer, Response::SignInSuccess, b"SignIn success")
                .await
                .unwrap();
            send_error(&mut writer, Response::DeleteError, "Cannot delete file")
                .await
                .unwrap();
        }

        let mut reader = FrameReader::new(Cursor::new(buffer));
        let first = read_response(&mut reader).await.unwrap().unwrap();
        assert_eq!(first.response, Response::SignInSuccess);
        assert_eq!(first.text(), "SignIn success");

        let second = read_response(&mut reader).await.unwrap().unwrap();
        assert_eq!(second.response, Response::DeleteError);
        assert_eq!(second.text(), "Cannot delete file");

        assert!(read_response(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_send_and_receive_request() {
        let mut buffer = Vec::new();
        {
            let mut writer = FrameWriter::new(Cursor::new(&mut buffer));
            send_request(&mut writer, Request::GetData, b"").await.unwrap();
        }

        let mut reader = FrameReader::new(Cursor::new(buffer));
        let frame = read_request(&mut reader).await.unwrap().unwrap();
        assert_eq!(Request::from_opcode(frame.opcode), Some(Request::GetData));
        assert!(frame.payload.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_response_opcode() {
        let buffer = RawFrame::new(99, b"?".to_vec()).to_bytes();
        let mut reader = FrameReader::new(Cursor::new(buffer));

        let err = read_response(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_frame_error_conversion() {
        let err: io::Error = FrameError::ConnectionClosed.into();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);

        let err: io::Error = FrameError::FrameTooShort { length: 2 }.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
