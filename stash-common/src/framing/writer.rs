//! Frame writer for sending protocol messages to a stream

use tokio::io::AsyncWriteExt;

use super::error::FrameError;
use super::frame::RawFrame;

/// Writes protocol frames to an async writer
///
/// Each frame is encoded into one buffer and written with a single
/// `write_all`, so as long as a connection has exactly one writer its frames
/// never interleave.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W> FrameWriter<W> {
    /// Create a new frame writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get a mutable reference to the underlying writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }
}

impl<W: AsyncWriteExt + Unpin> FrameWriter<W> {
    /// Write a frame to the stream
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    pub async fn write_frame(&mut self, frame: &RawFrame) -> Result<(), FrameError> {
        let bytes = frame.to_bytes();
        self.writer.write_all(&bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write a frame with the given components
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    pub async fn write(&mut self, opcode: u32, payload: &[u8]) -> Result<(), FrameError> {
        let frame = RawFrame::new(opcode, payload.to_vec());
        self.write_frame(&frame).await
    }
}
