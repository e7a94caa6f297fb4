// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The value model: every kind the wire format can represent.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::code::Code;
use crate::int::BigInt;
use crate::wire::{SMALL_INT_MAX, SMALL_INT_MIN, Tag};

/// A marshallable value.
///
/// Values decoded from bytes are owned by the caller. There is no identity or sharing: a
/// sub-value that appears twice is two independent copies.
///
/// Equality is structural. Floats compare by bit pattern (so `NaN == NaN` when the payloads match
/// and `0.0 != -0.0`), and [`Value::Int`] compares equal to a [`Value::BigInt`] holding the same
/// number.
#[derive(Clone, Debug)]
pub enum Value {
    /// The `None` marker.
    None,
    /// The iteration-stop marker.
    StopIteration,
    /// The `...` marker.
    Ellipsis,
    /// A boolean.
    Bool(bool),
    /// An integer that fits in `i64`.
    ///
    /// Encodes as `i` when it fits in `i32` and as `l` otherwise.
    Int(i64),
    /// An integer of any size. Decoding produces this only for values outside `i64`.
    BigInt(BigInt),
    /// A binary64 float.
    Float(f64),
    /// A complex number.
    Complex {
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },
    /// A byte sequence.
    Bytes(Vec<u8>),
    /// Text.
    Str(String),
    /// A tuple.
    Tuple(Vec<Value>),
    /// A list.
    List(Vec<Value>),
    /// A dict, in insertion order.
    Dict(Vec<(Value, Value)>),
    /// A set, in iteration order.
    Set(Vec<Value>),
    /// A frozen set, in iteration order.
    FrozenSet(Vec<Value>),
    /// A compiled code artifact.
    Code(Box<Code>),
}

impl Value {
    /// Builds an integer value, using [`Value::Int`] whenever the value fits in `i64`.
    #[must_use]
    pub fn int(v: i128) -> Self {
        match i64::try_from(v) {
            Ok(small) => Self::Int(small),
            Err(_) => Self::BigInt(BigInt::from(v)),
        }
    }

    /// Builds a text value.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Builds a byte sequence value.
    #[must_use]
    pub fn bytes(b: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(b.into())
    }

    /// Returns the tag this value is written with.
    #[must_use]
    pub fn tag(&self) -> Tag {
        match self {
            Self::None => Tag::None,
            Self::StopIteration => Tag::StopIteration,
            Self::Ellipsis => Tag::Ellipsis,
            Self::Bool(false) => Tag::False,
            Self::Bool(true) => Tag::True,
            Self::Int(v) if (SMALL_INT_MIN..=SMALL_INT_MAX).contains(v) => Tag::Int,
            Self::Int(_) => Tag::Long,
            Self::BigInt(v) if v.fits_i32() => Tag::Int,
            Self::BigInt(_) => Tag::Long,
            Self::Float(_) => Tag::Float,
            Self::Complex { .. } => Tag::Complex,
            Self::Bytes(_) => Tag::Bytes,
            Self::Str(_) => Tag::Str,
            Self::Tuple(_) => Tag::Tuple,
            Self::List(_) => Tag::List,
            Self::Dict(_) => Tag::Dict,
            Self::Set(_) => Tag::Set,
            Self::FrozenSet(_) => Tag::FrozenSet,
            Self::Code(_) => Tag::Code,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None)
            | (Self::StopIteration, Self::StopIteration)
            | (Self::Ellipsis, Self::Ellipsis) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::Int(a), Self::BigInt(b)) | (Self::BigInt(b), Self::Int(a)) => {
                BigInt::from(*a) == *b
            }
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Complex { re: ar, im: ai }, Self::Complex { re: br, im: bi }) => {
                ar.to_bits() == br.to_bits() && ai.to_bits() == bi.to_bits()
            }
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b))
            | (Self::List(a), Self::List(b))
            | (Self::Set(a), Self::Set(b))
            | (Self::FrozenSet(a), Self::FrozenSet(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Code(a), Self::Code(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        match v.to_i64() {
            Some(small) => Self::Int(small),
            None => Self::BigInt(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Code> for Value {
    fn from(v: Code) -> Self {
        Self::Code(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert_ne!(
            Value::Complex { re: 0.0, im: 1.0 },
            Value::Complex { re: -0.0, im: 1.0 }
        );
    }

    #[test]
    fn int_and_bigint_compare_numerically() {
        assert_eq!(Value::Int(7), Value::BigInt(BigInt::from(7_i64)));
        assert_eq!(Value::BigInt(BigInt::from(-9_i64)), Value::Int(-9));
        assert_ne!(Value::Int(7), Value::Float(7.0));
        assert_ne!(Value::Int(1), Value::Bool(true));
    }

    #[test]
    fn int_constructor_prefers_machine_ints() {
        assert!(matches!(Value::int(1 << 40), Value::Int(_)));
        assert!(matches!(Value::int(1 << 70), Value::BigInt(_)));
        assert!(matches!(Value::from(BigInt::from(5_i64)), Value::Int(5)));
    }

    #[test]
    fn tag_follows_int_range() {
        assert_eq!(Value::Int(i64::from(i32::MAX)).tag(), Tag::Int);
        assert_eq!(Value::Int(i64::from(i32::MIN)).tag(), Tag::Int);
        assert_eq!(Value::Int(i64::from(i32::MAX) + 1).tag(), Tag::Long);
        assert_eq!(Value::Int(i64::from(i32::MIN) - 1).tag(), Tag::Long);
        assert_eq!(Value::Bool(true).tag(), Tag::True);
    }

    #[test]
    fn containers_of_different_kinds_differ() {
        let items = vec![Value::None];
        assert_ne!(Value::Tuple(items.clone()), Value::List(items.clone()));
        assert_ne!(Value::Set(items.clone()), Value::FrozenSet(items));
    }
}
