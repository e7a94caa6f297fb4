// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The classification seam between an object model and the encoder.
//!
//! The encoder never inspects a host object directly. It asks one question per value,
//! [`Marshal::classify`], and dispatches on the returned [`Shape`]. An object model answers with
//! the shape of the builtin kind the value belongs to and whether its runtime type is *exactly*
//! that kind. Anything that is not exact is rejected, with one exception: byte-sequence values are
//! accepted through the [`Shape::Buffer`] capability regardless of their type, since their wire
//! form is only their bytes.

use crate::code::Code;
use crate::int::BigInt;
use crate::value::Value;

/// The wire-relevant view of one value.
#[derive(Debug)]
pub enum Shape<'a, T> {
    /// The `None` marker.
    None,
    /// The iteration-stop marker.
    StopIteration,
    /// The `...` marker.
    Ellipsis,
    /// A boolean.
    Bool(bool),
    /// An integer that fits in `i64`.
    Int(i64),
    /// An integer of any size.
    BigInt(&'a BigInt),
    /// A binary64 float.
    Float(f64),
    /// A complex number.
    Complex {
        /// Real part.
        re: f64,
        /// Imaginary part.
        im: f64,
    },
    /// A value exposing a read-only byte view.
    Buffer(&'a [u8]),
    /// Text.
    Str(&'a str),
    /// Tuple elements.
    Tuple(&'a [T]),
    /// List elements.
    List(&'a [T]),
    /// Dict entries in insertion order.
    Dict(&'a [(T, T)]),
    /// Set elements in iteration order.
    Set(&'a [T]),
    /// Frozen set elements in iteration order.
    FrozenSet(&'a [T]),
    /// A compiled code artifact.
    Code(&'a Code),
    /// A value of a kind the wire format cannot represent.
    Opaque,
}

/// The answer to [`Marshal::classify`].
#[derive(Debug)]
pub struct Classified<'a, T> {
    /// Runtime type name, used in error messages.
    pub type_name: &'a str,
    /// `true` if the runtime type is exactly the builtin kind named by `shape`, `false` for
    /// instances of a subtype.
    pub exact: bool,
    /// The wire-relevant view of the value.
    pub shape: Shape<'a, T>,
}

impl<'a, T> Classified<'a, T> {
    /// Classifies a value whose runtime type is exactly its builtin kind.
    #[must_use]
    pub fn exact(type_name: &'a str, shape: Shape<'a, T>) -> Self {
        Self {
            type_name,
            exact: true,
            shape,
        }
    }

    /// Classifies an instance of a subtype of a builtin kind.
    #[must_use]
    pub fn subtype(type_name: &'a str, shape: Shape<'a, T>) -> Self {
        Self {
            type_name,
            exact: false,
            shape,
        }
    }

    /// Classifies a value with no wire representation.
    #[must_use]
    pub fn opaque(type_name: &'a str) -> Self {
        Self {
            type_name,
            exact: false,
            shape: Shape::Opaque,
        }
    }
}

/// An object model the encoder can walk.
pub trait Marshal: Sized {
    /// Describes this value to the encoder.
    fn classify(&self) -> Classified<'_, Self>;
}

impl Marshal for Value {
    fn classify(&self) -> Classified<'_, Self> {
        let (type_name, shape): (&str, Shape<'_, Self>) = match self {
            Self::None => ("NoneType", Shape::None),
            Self::StopIteration => ("type", Shape::StopIteration),
            Self::Ellipsis => ("ellipsis", Shape::Ellipsis),
            Self::Bool(b) => ("bool", Shape::Bool(*b)),
            Self::Int(v) => ("int", Shape::Int(*v)),
            Self::BigInt(v) => ("int", Shape::BigInt(v)),
            Self::Float(v) => ("float", Shape::Float(*v)),
            Self::Complex { re, im } => ("complex", Shape::Complex { re: *re, im: *im }),
            Self::Bytes(b) => ("bytes", Shape::Buffer(b)),
            Self::Str(s) => ("str", Shape::Str(s)),
            Self::Tuple(items) => ("tuple", Shape::Tuple(items)),
            Self::List(items) => ("list", Shape::List(items)),
            Self::Dict(entries) => ("dict", Shape::Dict(entries)),
            Self::Set(items) => ("set", Shape::Set(items)),
            Self::FrozenSet(items) => ("frozenset", Shape::FrozenSet(items)),
            Self::Code(code) => ("code", Shape::Code(code)),
        };
        Classified::exact(type_name, shape)
    }
}
