//! Frame-level errors

use std::io;

use thiserror::Error;

/// Errors produced while reading or writing frames
///
/// Any of these ends the connection: once framing is lost there is no way to
/// find the start of the next message.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),

    /// The peer closed the stream in the middle of a frame
    #[error("connection closed mid-frame")]
    ConnectionClosed,

    /// Declared length cannot even hold the opcode field
    #[error("frame length {length} is shorter than the opcode field")]
    FrameTooShort { length: u32 },

    /// Declared length exceeds the configured maximum
    #[error("frame length {length} exceeds maximum of {max}")]
    FrameTooLarge { length: u32, max: u32 },

    /// Payload exceeds the per-request limit for its opcode
    #[error("payload of {length} bytes exceeds limit of {max} for opcode {opcode}")]
    PayloadExceedsLimit { opcode: u32, length: u64, max: u64 },

    /// Opcode field is not NUL-padded ASCII decimal
    #[error("invalid opcode field: {0:?}")]
    InvalidOpcode(String),
}

impl From<io::Error> for FrameError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FrameError::ConnectionClosed
        } else {
            FrameError::Io(err.to_string())
        }
    }
}
