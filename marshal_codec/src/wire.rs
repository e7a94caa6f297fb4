// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wire grammar: tag bytes and the payload layout each one introduces.
//!
//! This module is a small wrapper around the generated tag table (`tags_gen.rs`, rendered from
//! `tags.json` by `marshal_codec_codegen`).

include!("tags_gen.rs");

/// The only format revision this codec writes.
///
/// Revision 2 has no back-reference table: shared sub-objects are always re-emitted in full.
pub const FORMAT_REVISION: u32 = TABLE_REVISION;

/// Inclusive bounds of the fixed-width integer encoding.
pub const SMALL_INT_MIN: i64 = i32::MIN as i64;
/// See [`SMALL_INT_MIN`].
pub const SMALL_INT_MAX: i64 = i32::MAX as i64;

/// Number of magnitude bits carried by one arbitrary-precision digit.
pub const DIGIT_BITS: u32 = 15;
/// Largest valid arbitrary-precision digit.
pub const DIGIT_MAX: u16 = (1 << DIGIT_BITS) - 1;

/// Payload layout that follows a tag byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Nothing follows; the tag is the whole value.
    Empty,
    /// A little-endian `i32`.
    I32,
    /// A little-endian `i32` digit count whose sign is the value's sign, then `|n|` `u16` digits.
    Digits,
    /// Eight bytes of binary64.
    F64,
    /// Two binary64 payloads.
    F64Pair,
    /// A `u32` byte length, then that many bytes.
    Sized,
    /// A `u32` element count, then that many tagged values.
    Counted,
    /// Tagged key/value pairs until a [`Tag::Null`] byte.
    Terminated,
    /// The fixed field sequence of a code artifact.
    Code,
}

impl Tag {
    /// Returns the tag byte value.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self as u8
    }

    /// Returns `true` for tags that introduce nested values.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self.payload(),
            Payload::Counted | Payload::Terminated | Payload::Code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Payload, Tag};

    #[test]
    fn tag_values_are_stable() {
        assert_eq!(Tag::None.byte(), b'N');
        assert_eq!(Tag::StopIteration.byte(), b'S');
        assert_eq!(Tag::Ellipsis.byte(), b'.');
        assert_eq!(Tag::Int.byte(), b'i');
        assert_eq!(Tag::Long.byte(), b'l');
        assert_eq!(Tag::Float.byte(), b'g');
        assert_eq!(Tag::Complex.byte(), b'y');
        assert_eq!(Tag::Bytes.byte(), b's');
        assert_eq!(Tag::Str.byte(), b'u');
        assert_eq!(Tag::Dict.byte(), b'{');
        assert_eq!(Tag::Null.byte(), b'0');
        assert_eq!(Tag::Code.byte(), b'c');
    }

    #[test]
    fn from_u8_is_inverse_of_byte() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_u8(tag.byte()), Some(tag));
        }
        assert_eq!(Tag::from_u8(b'r'), None);
        assert_eq!(Tag::from_u8(b'z'), None);
        assert_eq!(Tag::from_u8(0x80 | b'i'), None);
    }

    #[test]
    fn container_classification() {
        assert!(Tag::Tuple.is_container());
        assert!(Tag::Dict.is_container());
        assert!(Tag::Code.is_container());
        assert!(!Tag::Str.is_container());
        assert_eq!(Tag::Long.payload(), Payload::Digits);
    }
}
