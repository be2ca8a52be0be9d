//! Raw frame type and opcode field encoding

use super::error::FrameError;
use super::{LENGTH_PREFIX_SIZE, OPCODE_WIDTH};

/// A decoded frame: numeric opcode plus opaque payload bytes
///
/// Whether the opcode is a request or a response depends on the direction of
/// travel; see [`crate::protocol`] for the typed views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub opcode: u32,
    pub payload: Vec<u8>,
}

impl RawFrame {
    /// Create a new frame
    pub fn new(opcode: u32, payload: Vec<u8>) -> Self {
        Self { opcode, payload }
    }

    /// Length value written into the prefix (opcode field plus payload)
    pub fn declared_length(&self) -> usize {
        OPCODE_WIDTH + self.payload.len()
    }

    /// Serialize the frame to its on-wire bytes
    ///
    /// Callers must keep payloads below `u32::MAX - 8` bytes; the framing
    /// limits enforce a much smaller ceiling in practice.
    pub fn to_bytes(&self) -> Vec<u8> {
        let length = self.declared_length() as u32;
        let mut bytes = Vec::with_capacity(LENGTH_PREFIX_SIZE + length as usize);
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.extend_from_slice(&encode_opcode(self.opcode));
        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

/// Encode an opcode as ASCII decimal digits, NUL-padded to the field width
///
/// Opcodes above `99_999_999` do not fit; debug builds panic on them.
pub fn encode_opcode(opcode: u32) -> [u8; OPCODE_WIDTH] {
    let mut field = [0u8; OPCODE_WIDTH];
    let digits = opcode.to_string();
    debug_assert!(
        digits.len() <= OPCODE_WIDTH,
        "opcode {opcode} does not fit in {OPCODE_WIDTH} digits"
    );
    let len = digits.len().min(OPCODE_WIDTH);
    field[..len].copy_from_slice(&digits.as_bytes()[..len]);
    field
}

/// Decode an opcode field
///
/// Trailing NUL or space padding is ignored. The remaining bytes must be
/// one or more ASCII digits.
///
/// # Errors
///
/// Returns `FrameError::InvalidOpcode` if the field is empty after trimming
/// or contains anything other than digits.
pub fn decode_opcode(field: &[u8]) -> Result<u32, FrameError> {
    let end = field
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |i| i + 1);
    let digits = &field[..end];

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::InvalidOpcode(
            String::from_utf8_lossy(field).into_owned(),
        ));
    }

    // At most 8 digits, so this always fits in a u32
    let text = std::str::from_utf8(digits)
        .map_err(|_| FrameError::InvalidOpcode(String::from_utf8_lossy(field).into_owned()))?;
    text.parse::<u32>()
        .map_err(|_| FrameError::InvalidOpcode(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_opcode_pads_with_nul() {
        assert_eq!(encode_opcode(4), *b"4\0\0\0\0\0\0\0");
        assert_eq!(encode_opcode(22), *b"22\0\0\0\0\0\0");
        assert_eq!(encode_opcode(0), *b"0\0\0\0\0\0\0\0");
        assert_eq!(encode_opcode(99_999_999), *b"99999999");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit")]
    fn test_encode_opcode_too_wide() {
        encode_opcode(100_000_000);
    }

    #[test]
    fn test_decode_opcode() {
        assert_eq!(decode_opcode(b"4\0\0\0\0\0\0\0").unwrap(), 4);
        assert_eq!(decode_opcode(b"10\0\0\0\0\0\0").unwrap(), 10);
        // Space padding is accepted as well
        assert_eq!(decode_opcode(b"7       ").unwrap(), 7);
        assert_eq!(decode_opcode(b"12345678").unwrap(), 12_345_678);
    }

    #[test]
    fn test_decode_opcode_rejects_garbage() {
        assert!(matches!(
            decode_opcode(b"\0\0\0\0\0\0\0\0"),
            Err(FrameError::InvalidOpcode(_))
        ));
        assert!(matches!(
            decode_opcode(b"GetData\0"),
            Err(FrameError::InvalidOpcode(_))
        ));
        // Padding in the middle is not allowed
        assert!(matches!(
            decode_opcode(b"1\02\0\0\0\0\0"),
            Err(FrameError::InvalidOpcode(_))
        ));
        assert!(matches!(
            decode_opcode(b"-1\0\0\0\0\0\0"),
            Err(FrameError::InvalidOpcode(_))
        ));
    }

    #[test]
    fn test_to_bytes_layout() {
        let frame = RawFrame::new(5, b"{\"path\":\"alice\"}".to_vec());
        let bytes = frame.to_bytes();

        let length = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(length as usize, OPCODE_WIDTH + frame.payload.len());
        assert_eq!(&bytes[4..12], b"5\0\0\0\0\0\0\0");
        assert_eq!(&bytes[12..], frame.payload.as_slice());
    }

    #[test]
    fn test_to_bytes_empty_payload() {
        let frame = RawFrame::new(4, Vec::new());
        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), LENGTH_PREFIX_SIZE + OPCODE_WIDTH);
        assert_eq!(&bytes[..4], &8u32.to_be_bytes());
    }
}
