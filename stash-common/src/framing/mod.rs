//! Length-prefixed framing for the Stash wire protocol
//!
//! Every message on the wire is a single frame:
//!
//! ```text
//! LENGTH (u32, big-endian) | OPCODE (8 bytes) | PAYLOAD (LENGTH - 8 bytes)
//! ```
//!
//! The length covers the opcode field and the payload, not itself. The
//! opcode is the message's numeric code written as ASCII decimal digits and
//! padded with NUL bytes on the right.
//!
//! Partial frames are buffered by [`FrameReader`] until the declared length
//! has arrived; callers never observe an incomplete frame.

mod error;
mod frame;
mod limits;
mod reader;
mod writer;

pub use error::FrameError;
pub use frame::{RawFrame, decode_opcode, encode_opcode};
pub use limits::max_payload_for_request;
pub use reader::FrameReader;
pub use writer::FrameWriter;

/// Size of the length prefix in bytes
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Size of the opcode field in bytes
pub const OPCODE_WIDTH: usize = 8;

/// Default upper bound for a frame's declared length (512 MiB)
///
/// Uploads travel in a single frame, so this also caps the largest file a
/// client can store in one request.
pub const DEFAULT_MAX_FRAME_LENGTH: u32 = 512 * 1024 * 1024;
