//! Frame reader for parsing protocol messages from a stream

use tokio::io::AsyncReadExt;

use super::error::FrameError;
use super::frame::{RawFrame, decode_opcode};
use super::limits::max_payload_for_request;
use super::{DEFAULT_MAX_FRAME_LENGTH, LENGTH_PREFIX_SIZE, OPCODE_WIDTH};

/// Minimum spare capacity reserved before each socket read (64KB)
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Reads protocol frames from an async reader
///
/// Bytes are accumulated in a per-connection buffer. A frame is only
/// surfaced once all of its declared bytes have arrived; anything left over
/// stays buffered for the next call.
pub struct FrameReader<R> {
    reader: R,
    buffer: Vec<u8>,
    max_frame_length: u32,
    request_limits: bool,
}

impl<R> FrameReader<R> {
    /// Create a new frame reader with the default maximum frame length
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            max_frame_length: DEFAULT_MAX_FRAME_LENGTH,
            request_limits: false,
        }
    }

    /// Set the maximum declared frame length
    pub fn with_max_frame_length(mut self, max_frame_length: u32) -> Self {
        self.max_frame_length = max_frame_length;
        self
    }

    /// Enforce per-request payload limits while decoding
    ///
    /// Used on the server side, where every inbound frame is a request.
    pub fn with_request_limits(mut self) -> Self {
        self.request_limits = true;
        self
    }

    /// Number of bytes buffered but not yet returned as a frame
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Append raw bytes to the decode buffer
    ///
    /// [`read_frame`](Self::read_frame) does this itself; this is for callers
    /// that feed bytes from elsewhere and then poll [`try_decode`](Self::try_decode).
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Try to decode one frame from the buffered bytes
    ///
    /// Returns `Ok(None)` if the buffer does not yet hold a complete frame;
    /// the buffered bytes are kept. On success the frame's bytes are removed
    /// from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as the header shows the frame can never be
    /// valid (length too short or too large, bad opcode, payload over the
    /// per-request limit).
    pub fn try_decode(&mut self) -> Result<Option<RawFrame>, FrameError> {
        if self.buffer.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let length = u32::from_be_bytes([
            self.buffer[0],
            self.buffer[1],
            self.buffer[2],
            self.buffer[3],
        ]);
        if (length as usize) < OPCODE_WIDTH {
            return Err(FrameError::FrameTooShort { length });
        }
        if length > self.max_frame_length {
            return Err(FrameError::FrameTooLarge {
                length,
                max: self.max_frame_length,
            });
        }

        let header_len = LENGTH_PREFIX_SIZE + OPCODE_WIDTH;
        if self.buffer.len() < header_len {
            return Ok(None);
        }

        let opcode = decode_opcode(&self.buffer[LENGTH_PREFIX_SIZE..header_len])?;
        let payload_len = (length as usize - OPCODE_WIDTH) as u64;

        // Check before the payload is buffered so oversized requests are
        // rejected without reading them
        if self.request_limits {
            let max = max_payload_for_request(opcode);
            if max > 0 && payload_len > max {
                return Err(FrameError::PayloadExceedsLimit {
                    opcode,
                    length: payload_len,
                    max,
                });
            }
        }

        let total = LENGTH_PREFIX_SIZE + length as usize;
        if self.buffer.len() < total {
            return Ok(None);
        }

        let payload = self.buffer[header_len..total].to_vec();
        self.buffer.drain(..total);

        Ok(Some(RawFrame::new(opcode, payload)))
    }
}

impl<R: AsyncReadExt + Unpin> FrameReader<R> {
    /// Read the next frame from the stream
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed between frames.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::ConnectionClosed` if the stream ends part-way
    /// through a frame, or any error from [`try_decode`](Self::try_decode).
    ///
    /// # Note
    ///
    /// This method has no timeout - it will wait indefinitely for data.
    pub async fn read_frame(&mut self) -> Result<Option<RawFrame>, FrameError> {
        loop {
            if let Some(frame) = self.try_decode()? {
                return Ok(Some(frame));
            }

            self.buffer.reserve(READ_CHUNK_SIZE);
            let n = self.reader.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None); // Clean disconnect
                }
                return Err(FrameError::ConnectionClosed);
            }
        }
    }
}
