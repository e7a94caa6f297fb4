// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The 12-byte header that precedes a marshalled module in a bytecode cache file.
//!
//! Layout (all little-endian `u32`): [`PYC_MAGIC`], source modification time, source size. The
//! marshalled body follows immediately; read it with
//! [`Decoder::with_reader`](crate::decode::Decoder::with_reader) on the same reader.

use core::fmt;

use crate::format::{Reader, Writer};

/// Magic number identifying the bytecode cache layout this codec reads.
pub const PYC_MAGIC: u32 = 3379 | ((b'\r' as u32) << 16) | ((b'\n' as u32) << 24);

/// Header length in bytes.
pub const PYC_HEADER_LEN: usize = 12;

/// A parsed bytecode cache header.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PycHeader {
    /// Source file modification time, in seconds.
    pub mtime: u32,
    /// Source file size, in bytes.
    pub source_size: u32,
}

/// A header read failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PycError {
    /// Fewer than [`PYC_HEADER_LEN`] bytes remain.
    Truncated,
    /// The magic number does not match [`PYC_MAGIC`].
    BadMagic {
        /// The magic number found.
        found: u32,
    },
}

impl fmt::Display for PycError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => f.write_str("reached end of file while reading header"),
            Self::BadMagic { found } => write!(f, "unsupported magic number {found:#010x}"),
        }
    }
}

impl core::error::Error for PycError {}

impl PycHeader {
    /// Appends the header to `out`.
    pub fn write(&self, out: &mut Writer) {
        out.write_u32_le(PYC_MAGIC);
        out.write_u32_le(self.mtime);
        out.write_u32_le(self.source_size);
    }

    /// Reads a header, leaving `r` positioned at the marshalled body.
    ///
    /// On failure `r` is not advanced.
    pub fn read(r: &mut Reader<'_>) -> Result<Self, PycError> {
        if r.remaining() < PYC_HEADER_LEN {
            return Err(PycError::Truncated);
        }
        let mut probe = r.clone();
        let mut next = || probe.read_u32_le().map_err(|_| PycError::Truncated);
        let magic = next()?;
        if magic != PYC_MAGIC {
            return Err(PycError::BadMagic { found: magic });
        }
        let header = Self {
            mtime: next()?,
            source_size: next()?,
        };
        *r = probe;
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Limits;
    use crate::decode::Decoder;
    use crate::trace::TraceMask;
    use crate::value::Value;

    #[test]
    fn magic_bytes() {
        assert_eq!(PYC_MAGIC, 0x0A0D_0D33);
        let mut w = Writer::new();
        PycHeader::default().write(&mut w);
        assert_eq!(&w.as_slice()[..4], b"\x33\x0d\x0d\x0a");
        assert_eq!(w.len(), PYC_HEADER_LEN);
    }

    #[test]
    fn header_then_body() {
        let header = PycHeader {
            mtime: 1_700_000_000,
            source_size: 42,
        };
        let mut w = Writer::new();
        header.write(&mut w);
        w.write_bytes(b"N");

        let mut r = Reader::new(w.as_slice());
        assert_eq!(PycHeader::read(&mut r), Ok(header));
        let mut d = Decoder::with_reader(r, Limits::default());
        assert_eq!(d.read_value(TraceMask::NONE, None), Ok(Value::None));
        assert_eq!(d.offset(), PYC_HEADER_LEN + 1);
    }

    #[test]
    fn rejects_short_and_foreign_headers() {
        let mut r = Reader::new(b"\x33\x0d\x0d\x0a\0\0");
        assert_eq!(PycHeader::read(&mut r), Err(PycError::Truncated));
        assert_eq!(r.offset(), 0);

        let mut r = Reader::new(b"\x42\x0d\x0d\x0a\0\0\0\0\0\0\0\0");
        assert_eq!(
            PycHeader::read(&mut r),
            Err(PycError::BadMagic { found: 0x0A0D_0D42 })
        );
        assert_eq!(r.offset(), 0);
    }
}
