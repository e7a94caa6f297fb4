// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// @generated by marshal_codec_codegen from tags.json. Do not edit by hand.

/// Wire format revision described by this table.
pub const TABLE_REVISION: u32 = 2;

/// A wire tag byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// A count-prefixed tuple.
    Tuple = b'(',
    /// The `...` marker.
    Ellipsis = b'.',
    /// Dict terminator. Not a value.
    Null = b'0',
    /// A count-prefixed set.
    Set = b'<',
    /// A count-prefixed frozen set.
    FrozenSet = b'>',
    /// Boolean `false`.
    False = b'F',
    /// The `None` marker.
    None = b'N',
    /// The iteration-stop marker.
    StopIteration = b'S',
    /// Boolean `true`.
    True = b'T',
    /// A count-prefixed list.
    List = b'[',
    /// A compiled code artifact.
    Code = b'c',
    /// An IEEE-754 binary64 bit pattern.
    Float = b'g',
    /// A signed 32-bit integer.
    Int = b'i',
    /// An arbitrary-precision integer as signed digit count plus base-2^15 digits.
    Long = b'l',
    /// A length-prefixed byte sequence.
    Bytes = b's',
    /// Length-prefixed UTF-8 text.
    Str = b'u',
    /// Two binary64 bit patterns, real part first.
    Complex = b'y',
    /// Key/value pairs terminated by [`Tag::Null`].
    Dict = b'{',
}

impl Tag {
    /// Every tag, ordered by byte value.
    pub const ALL: [Self; 18] = [
        Self::Tuple,
        Self::Ellipsis,
        Self::Null,
        Self::Set,
        Self::FrozenSet,
        Self::False,
        Self::None,
        Self::StopIteration,
        Self::True,
        Self::List,
        Self::Code,
        Self::Float,
        Self::Int,
        Self::Long,
        Self::Bytes,
        Self::Str,
        Self::Complex,
        Self::Dict,
    ];

    /// Parses a tag from its byte value.
    #[must_use]
    pub const fn from_u8(b: u8) -> Option<Self> {
        match b {
            b'(' => Some(Self::Tuple),
            b'.' => Some(Self::Ellipsis),
            b'0' => Some(Self::Null),
            b'<' => Some(Self::Set),
            b'>' => Some(Self::FrozenSet),
            b'F' => Some(Self::False),
            b'N' => Some(Self::None),
            b'S' => Some(Self::StopIteration),
            b'T' => Some(Self::True),
            b'[' => Some(Self::List),
            b'c' => Some(Self::Code),
            b'g' => Some(Self::Float),
            b'i' => Some(Self::Int),
            b'l' => Some(Self::Long),
            b's' => Some(Self::Bytes),
            b'u' => Some(Self::Str),
            b'y' => Some(Self::Complex),
            b'{' => Some(Self::Dict),
            _ => None,
        }
    }

    /// Returns the payload layout that follows this tag.
    #[must_use]
    pub const fn payload(self) -> Payload {
        match self {
            Self::Tuple => Payload::Counted,
            Self::Ellipsis => Payload::Empty,
            Self::Null => Payload::Empty,
            Self::Set => Payload::Counted,
            Self::FrozenSet => Payload::Counted,
            Self::False => Payload::Empty,
            Self::None => Payload::Empty,
            Self::StopIteration => Payload::Empty,
            Self::True => Payload::Empty,
            Self::List => Payload::Counted,
            Self::Code => Payload::Code,
            Self::Float => Payload::F64,
            Self::Int => Payload::I32,
            Self::Long => Payload::Digits,
            Self::Bytes => Payload::Sized,
            Self::Str => Payload::Sized,
            Self::Complex => Payload::F64Pair,
            Self::Dict => Payload::Terminated,
        }
    }

    /// Returns a short name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tuple => "tuple",
            Self::Ellipsis => "ellipsis",
            Self::Null => "null",
            Self::Set => "set",
            Self::FrozenSet => "frozen_set",
            Self::False => "false",
            Self::None => "none",
            Self::StopIteration => "stop_iteration",
            Self::True => "true",
            Self::List => "list",
            Self::Code => "code",
            Self::Float => "float",
            Self::Int => "int",
            Self::Long => "long",
            Self::Bytes => "bytes",
            Self::Str => "str",
            Self::Complex => "complex",
            Self::Dict => "dict",
        }
    }
}
