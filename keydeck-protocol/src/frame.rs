//! Frame encoding
//!
//! A frame is the whole screen as one byte buffer of exactly
//! `width * height` bytes, row-major. Renderers hand over text that is
//! already wrapped and padded per line; encoding only maps characters to
//! bytes, truncates, and pads the tail with spaces.

use alloc::vec::Vec;

/// Byte used to fill positions past the end of the text
pub const PAD_BYTE: u8 = b' ';

/// Byte used for characters outside the single-byte range
const REPLACEMENT_BYTE: u8 = b'?';

/// Encoded screen contents, always `width * height` bytes long
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Encode rendered text for a `width` x `height` display
    pub fn encode(text: &str, width: u8, height: u8) -> Self {
        Self {
            bytes: encode(text, width, height),
        }
    }

    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-sized display
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Frame {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Encode text into a buffer of exactly `width * height` bytes
///
/// Each character becomes one byte. Code points up to 0xFF map to
/// themselves so the keyboard font's extended glyphs stay reachable;
/// anything wider becomes `?`.
pub fn encode(text: &str, width: u8, height: u8) -> Vec<u8> {
    let len = width as usize * height as usize;
    let mut buffer = Vec::with_capacity(len);

    for ch in text.chars().take(len) {
        let code = ch as u32;
        buffer.push(if code <= 0xFF {
            code as u8
        } else {
            REPLACEMENT_BYTE
        });
    }
    buffer.resize(len, PAD_BYTE);

    buffer
}
