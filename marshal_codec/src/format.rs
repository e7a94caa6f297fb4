// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Byte-level reading and writing primitives for the wire format.
//!
//! All multi-byte integers are little-endian. Higher-level codecs (the value decoder and the code
//! artifact schema) route every read through [`Reader`] so that truncation is reported uniformly.

use alloc::vec::Vec;
use core::fmt;

use crate::wire::Tag;

/// A decode error for marshalled bytes.
///
/// Every variant means the input is not well-formed. Callers are expected to discard the source of
/// the bytes rather than retry decoding them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remain than a payload requires.
    Truncated {
        /// Offset of the read that ran past the end of input.
        offset: usize,
    },
    /// A byte in tag position is not a known value tag.
    UnknownTag {
        /// The raw byte.
        tag: u8,
        /// Offset of the tag byte.
        offset: usize,
    },
    /// A dict payload reached the end of input where a key or the null terminator was expected.
    UnterminatedDict {
        /// Offset where the key or terminator was expected.
        offset: usize,
    },
    /// A well-formed value of the wrong kind appeared where the schema requires a specific kind.
    UnexpectedTag {
        /// The tag the schema requires.
        expected: Tag,
        /// The tag that was found.
        found: Tag,
        /// Offset of the tag byte.
        offset: usize,
    },
    /// A text payload is not valid UTF-8.
    InvalidUtf8 {
        /// Offset of the first payload byte.
        offset: usize,
    },
    /// An arbitrary-precision digit is outside `0..=32767`.
    InvalidDigit {
        /// The raw 16-bit digit.
        digit: u16,
        /// Offset of the digit.
        offset: usize,
    },
    /// Nesting is deeper than the configured limit.
    DepthExceeded {
        /// The configured limit.
        limit: usize,
        /// Offset of the tag that would exceed the limit.
        offset: usize,
    },
}

impl DecodeError {
    /// Returns the byte offset at which the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::Truncated { offset }
            | Self::UnknownTag { offset, .. }
            | Self::UnterminatedDict { offset }
            | Self::UnexpectedTag { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::InvalidDigit { offset, .. }
            | Self::DepthExceeded { offset, .. } => offset,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset } => {
                write!(f, "bad marshal data (unexpected end of input at {offset})")
            }
            Self::UnknownTag { tag, offset } => {
                write!(f, "bad marshal data (unknown type code {tag:#04x} at {offset})")
            }
            Self::UnterminatedDict { offset } => {
                write!(f, "bad marshal data (unterminated dict at {offset})")
            }
            Self::UnexpectedTag {
                expected,
                found,
                offset,
            } => write!(
                f,
                "bad marshal data (expected {} but found {} at {offset})",
                expected.name(),
                found.name()
            ),
            Self::InvalidUtf8 { offset } => {
                write!(f, "bad marshal data (invalid UTF-8 text at {offset})")
            }
            Self::InvalidDigit { digit, offset } => {
                write!(f, "bad marshal data (long digit {digit} out of range at {offset})")
            }
            Self::DepthExceeded { limit, offset } => {
                write!(f, "bad marshal data (nesting deeper than {limit} at {offset})")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

/// A simple byte reader with bounds checks.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// Returns the current cursor offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    /// Returns `true` if every byte has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let truncated = DecodeError::Truncated {
            offset: self.offset,
        };
        let end = self.offset.checked_add(len).ok_or(truncated.clone())?;
        let slice = self.bytes.get(self.offset..end).ok_or(truncated)?;
        self.offset = end;
        Ok(slice)
    }

    /// Returns the next byte without consuming it.
    #[must_use]
    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    /// Reads a `u8`.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32_le(&mut self) -> Result<i32, DecodeError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a little-endian IEEE-754 binary64 value, preserving its exact bit pattern.
    pub fn read_f64_le(&mut self) -> Result<f64, DecodeError> {
        let b = self.take(8)?;
        Ok(f64::from_bits(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ])))
    }

    /// Reads a 4-byte unsigned length or element count.
    pub fn read_len(&mut self) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let n = self.read_u32_le()?;
        usize::try_from(n).map_err(|_| DecodeError::Truncated { offset })
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.take(len)
    }

    /// Reads `len` bytes and validates UTF-8.
    pub fn read_str(&mut self, len: usize) -> Result<&'a str, DecodeError> {
        let offset = self.offset;
        let b = self.take(len)?;
        core::str::from_utf8(b).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }
}

/// A simple byte writer.
#[derive(Clone, Debug, Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Creates an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Returns a reference to the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the writer and returns the underlying byte buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Appends a `u8`.
    pub fn write_u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    /// Appends a little-endian `u16`.
    pub fn write_u16_le(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a little-endian `u32`.
    pub fn write_u32_le(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends a little-endian `i32`.
    pub fn write_i32_le(&mut self, v: i32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    /// Appends the raw bit pattern of an IEEE-754 binary64 value, little-endian.
    pub fn write_f64_le(&mut self, v: f64) {
        self.bytes.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, b: &[u8]) {
        self.bytes.extend_from_slice(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_integers() {
        assert_eq!(Reader::new(&[0x01, 0x00, 0x00, 0x00]).read_i32_le(), Ok(1));
        assert_eq!(
            Reader::new(&[0x01, 0x02, 0x03, 0x04]).read_i32_le(),
            Ok(0x0403_0201)
        );
        assert_eq!(
            Reader::new(&[0x00, 0x00, 0x00, 0x80]).read_i32_le(),
            Ok(i32::MIN)
        );
        assert_eq!(Reader::new(&[0x01, 0x02]).read_u16_le(), Ok(0x0201));
    }

    #[test]
    fn short_read_reports_offset_and_does_not_advance() {
        let mut r = Reader::new(&[0xAA, 0x01, 0x02]);
        assert_eq!(r.read_u8(), Ok(0xAA));
        assert_eq!(r.read_u32_le(), Err(DecodeError::Truncated { offset: 1 }));
        assert_eq!(r.offset(), 1);
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn huge_length_is_truncation_not_overflow() {
        let mut r = Reader::new(b"abc");
        assert_eq!(
            r.read_bytes(usize::MAX),
            Err(DecodeError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn read_str_rejects_invalid_utf8() {
        let mut r = Reader::new(&[b'o', b'k', 0xFF]);
        assert_eq!(r.read_str(2), Ok("ok"));
        assert_eq!(r.read_str(1), Err(DecodeError::InvalidUtf8 { offset: 2 }));
    }

    #[test]
    fn f64_bit_patterns_survive() {
        let mut w = Writer::new();
        w.write_f64_le(-0.0);
        w.write_f64_le(f64::from_bits(0x7FF8_0000_0000_0001));
        let bytes = w.into_vec();
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 0x80]);

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_f64_le().map(f64::to_bits), Ok((-0.0_f64).to_bits()));
        assert_eq!(
            r.read_f64_le().map(f64::to_bits),
            Ok(0x7FF8_0000_0000_0001)
        );
        assert!(r.is_empty());
    }
}
