// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value encoder.
//!
//! The encoder walks a value depth-first, pre-order. For each value it makes a single
//! [`Marshal::classify`] call and matches on the returned shape; there is no other type test.
//!
//! Format revision 2 has no back-reference table, so there is no memoization here: a sub-value
//! reachable twice is written twice. The only defense against cyclic input is the depth bound in
//! [`Limits`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Limits;
use crate::code::{self, Code};
use crate::format::Writer;
use crate::int::BigInt;
use crate::object::{Classified, Marshal, Shape};
use crate::trace::{Direction, TraceMask, TraceOutcome, TraceSink, Tracer};
use crate::wire::{FORMAT_REVISION, Tag};

/// Encoding failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// The value's runtime type has no wire representation, or is a subtype of a kind that only
    /// accepts exact instances.
    Unrepresentable {
        /// Runtime type name reported by the object model.
        type_name: String,
    },
    /// Nesting is deeper than [`Limits::max_depth`].
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The requested format revision is not supported.
    UnsupportedRevision {
        /// The requested revision.
        revision: u32,
    },
    /// A length or count does not fit its 4-byte field.
    TooLarge {
        /// The length that did not fit.
        len: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrepresentable { type_name } => {
                write!(f, "unmarshallable object of type {type_name}")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "object nested deeper than {limit} levels")
            }
            Self::UnsupportedRevision { revision } => write!(
                f,
                "unsupported marshal format revision {revision} (supported: {FORMAT_REVISION})"
            ),
            Self::TooLarge { len } => {
                write!(f, "object too large to marshal ({len} does not fit in 32 bits)")
            }
        }
    }
}

impl core::error::Error for EncodeError {}

/// A reusable encoder.
///
/// Encoding is stateless across calls; the encoder only carries its [`Limits`].
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    limits: Limits,
}

impl Encoder {
    /// Creates an encoder with the given limits.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Returns the encoder limits.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Encodes `obj` under format `revision` into a fresh buffer.
    pub fn encode<M: Marshal>(
        &self,
        obj: &M,
        revision: u32,
        trace_mask: TraceMask,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<Vec<u8>, EncodeError> {
        let mut out = Writer::new();
        self.encode_into(obj, revision, &mut out, trace_mask, trace)?;
        Ok(out.into_vec())
    }

    /// Encodes `obj` under format `revision`, appending to `out`.
    ///
    /// On failure `out` may hold a partial encoding after its previous contents. Trace offsets are
    /// relative to the length of `out` at the start of the call.
    pub fn encode_into<M: Marshal>(
        &self,
        obj: &M,
        revision: u32,
        out: &mut Writer,
        trace_mask: TraceMask,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<(), EncodeError> {
        if revision != FORMAT_REVISION {
            return Err(EncodeError::UnsupportedRevision { revision });
        }

        let start = out.len();
        let mut emit = Emit {
            limits: &self.limits,
            out,
            start,
            tracer: Tracer::new(trace_mask, trace),
        };
        emit.tracer.run_start(Direction::Encode);
        let result = emit.write_object(obj, 1);
        let len = emit.out.len() - start;
        let outcome = match result {
            Ok(()) => TraceOutcome::Ok { len },
            Err(_) => TraceOutcome::Failed { offset: len },
        };
        emit.tracer.run_end(Direction::Encode, outcome);
        result
    }
}

/// Encodes `obj` under format `revision` with default limits and no tracing.
///
/// ```
/// use marshal_codec::value::Value;
///
/// let bytes = marshal_codec::encode(&Value::Int(1234), 2).unwrap();
/// assert_eq!(bytes, b"i\xd2\x04\x00\x00");
/// ```
pub fn encode<M: Marshal>(obj: &M, revision: u32) -> Result<Vec<u8>, EncodeError> {
    Encoder::default().encode(obj, revision, TraceMask::NONE, None)
}

fn unrepresentable(type_name: &str) -> EncodeError {
    EncodeError::Unrepresentable {
        type_name: String::from(type_name),
    }
}

fn checked_u32(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| EncodeError::TooLarge { len })
}

/// One in-progress encode call.
pub(crate) struct Emit<'e, 's> {
    limits: &'e Limits,
    out: &'e mut Writer,
    start: usize,
    tracer: Tracer<'s>,
}

impl Emit<'_, '_> {
    fn offset(&self) -> usize {
        self.out.len() - self.start
    }

    pub(crate) fn begin(&mut self, tag: Tag, depth: usize) -> Result<(), EncodeError> {
        if depth > self.limits.max_depth {
            return Err(EncodeError::DepthExceeded {
                limit: self.limits.max_depth,
            });
        }
        let offset = self.offset();
        self.out.write_u8(tag.byte());
        self.tracer.value_enter(tag, depth, offset);
        Ok(())
    }

    pub(crate) fn end(&mut self, tag: Tag, depth: usize) {
        let offset = self.offset();
        self.tracer.value_exit(tag, depth, offset);
    }

    /// Writes a bare little-endian `i32` (no tag).
    pub(crate) fn raw_i32(&mut self, v: i32) {
        self.out.write_i32_le(v);
    }

    /// Writes one value at `depth`.
    ///
    /// This is the recursive step, so it keeps only container handling inline; scalars are
    /// written by [`Emit::write_scalar`].
    pub(crate) fn write_object<M: Marshal>(
        &mut self,
        obj: &M,
        depth: usize,
    ) -> Result<(), EncodeError> {
        if depth > self.limits.max_depth {
            return Err(EncodeError::DepthExceeded {
                limit: self.limits.max_depth,
            });
        }

        let Classified {
            type_name,
            exact,
            shape,
        } = obj.classify();
        // Anything exposing a byte view is written as bytes, subtype or not.
        if !exact && !matches!(shape, Shape::Buffer(_)) {
            return Err(unrepresentable(type_name));
        }

        match shape {
            Shape::Tuple(items) => self.write_counted(Tag::Tuple, items, depth),
            Shape::List(items) => self.write_counted(Tag::List, items, depth),
            Shape::Set(items) => self.write_counted(Tag::Set, items, depth),
            Shape::FrozenSet(items) => self.write_counted(Tag::FrozenSet, items, depth),
            Shape::Dict(entries) => self.write_dict(entries, depth),
            Shape::Code(c) => self.write_code(c, depth),
            scalar => self.write_scalar(scalar, type_name, depth),
        }
    }

    fn write_scalar<M: Marshal>(
        &mut self,
        shape: Shape<'_, M>,
        type_name: &str,
        depth: usize,
    ) -> Result<(), EncodeError> {
        match shape {
            Shape::None => self.write_marker(Tag::None, depth),
            Shape::StopIteration => self.write_marker(Tag::StopIteration, depth),
            Shape::Ellipsis => self.write_marker(Tag::Ellipsis, depth),
            Shape::Bool(false) => self.write_marker(Tag::False, depth),
            Shape::Bool(true) => self.write_marker(Tag::True, depth),
            Shape::Int(v) => self.write_int(v, depth),
            Shape::BigInt(v) => match v.to_i64() {
                Some(small) => self.write_int(small, depth),
                None => self.write_long(v, depth),
            },
            Shape::Float(v) => {
                self.begin(Tag::Float, depth)?;
                self.out.write_f64_le(v);
                self.end(Tag::Float, depth);
                Ok(())
            }
            Shape::Complex { re, im } => {
                self.begin(Tag::Complex, depth)?;
                self.out.write_f64_le(re);
                self.out.write_f64_le(im);
                self.end(Tag::Complex, depth);
                Ok(())
            }
            Shape::Buffer(bytes) => self.write_sized(Tag::Bytes, bytes, depth),
            Shape::Str(s) => self.write_str(s, depth),
            // `Opaque`; containers are written by `write_object`.
            _ => Err(unrepresentable(type_name)),
        }
    }

    fn write_dict<M: Marshal>(
        &mut self,
        entries: &[(M, M)],
        depth: usize,
    ) -> Result<(), EncodeError> {
        self.begin(Tag::Dict, depth)?;
        for (key, value) in entries {
            self.write_object(key, depth + 1)?;
            self.write_object(value, depth + 1)?;
        }
        self.out.write_u8(Tag::Null.byte());
        self.end(Tag::Dict, depth);
        Ok(())
    }

    fn write_code(&mut self, c: &Code, depth: usize) -> Result<(), EncodeError> {
        self.begin(Tag::Code, depth)?;
        code::write_fields(self, c, depth)?;
        self.end(Tag::Code, depth);
        Ok(())
    }

    fn write_marker(&mut self, tag: Tag, depth: usize) -> Result<(), EncodeError> {
        self.begin(tag, depth)?;
        self.end(tag, depth);
        Ok(())
    }

    /// Writes `i` when `v` lies in `[-2^31, 2^31 - 1]` and `l` otherwise.
    fn write_int(&mut self, v: i64, depth: usize) -> Result<(), EncodeError> {
        let Ok(small) = i32::try_from(v) else {
            return self.write_long(&BigInt::from(v), depth);
        };
        self.begin(Tag::Int, depth)?;
        self.out.write_i32_le(small);
        self.end(Tag::Int, depth);
        Ok(())
    }

    fn write_long(&mut self, v: &BigInt, depth: usize) -> Result<(), EncodeError> {
        let digits = v.digits();
        let count = i32::try_from(digits.len()).map_err(|_| EncodeError::TooLarge {
            len: digits.len(),
        })?;
        self.begin(Tag::Long, depth)?;
        self.out
            .write_i32_le(if v.is_negative() { -count } else { count });
        for &d in digits {
            self.out.write_u16_le(d);
        }
        self.end(Tag::Long, depth);
        Ok(())
    }

    /// Writes a tagged byte sequence.
    pub(crate) fn write_sized(
        &mut self,
        tag: Tag,
        bytes: &[u8],
        depth: usize,
    ) -> Result<(), EncodeError> {
        let len = checked_u32(bytes.len())?;
        self.begin(tag, depth)?;
        self.out.write_u32_le(len);
        self.out.write_bytes(bytes);
        self.end(tag, depth);
        Ok(())
    }

    /// Writes tagged text; the length is the UTF-8 byte length.
    pub(crate) fn write_str(&mut self, s: &str, depth: usize) -> Result<(), EncodeError> {
        self.write_sized(Tag::Str, s.as_bytes(), depth)
    }

    /// Writes a count-prefixed container.
    pub(crate) fn write_counted<M: Marshal>(
        &mut self,
        tag: Tag,
        items: &[M],
        depth: usize,
    ) -> Result<(), EncodeError> {
        let n = checked_u32(items.len())?;
        self.begin(tag, depth)?;
        self.out.write_u32_le(n);
        for item in items {
            self.write_object(item, depth + 1)?;
        }
        self.end(tag, depth);
        Ok(())
    }

    /// Writes a tuple whose elements are all text.
    pub(crate) fn write_str_tuple(
        &mut self,
        items: &[String],
        depth: usize,
    ) -> Result<(), EncodeError> {
        let n = checked_u32(items.len())?;
        self.begin(Tag::Tuple, depth)?;
        self.out.write_u32_le(n);
        for item in items {
            self.write_str(item, depth + 1)?;
        }
        self.end(Tag::Tuple, depth);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use alloc::vec;

    struct Foreign;

    impl Marshal for Foreign {
        fn classify(&self) -> Classified<'_, Self> {
            Classified::opaque("Foreign")
        }
    }

    fn enc(v: &Value) -> Vec<u8> {
        encode(v, FORMAT_REVISION).unwrap()
    }

    #[test]
    fn markers_are_single_bytes() {
        assert_eq!(enc(&Value::None), b"N");
        assert_eq!(enc(&Value::StopIteration), b"S");
        assert_eq!(enc(&Value::Ellipsis), b".");
        assert_eq!(enc(&Value::Bool(false)), b"F");
        assert_eq!(enc(&Value::Bool(true)), b"T");
    }

    #[test]
    fn int_range_selects_tag() {
        assert_eq!(enc(&Value::Int(0)), b"i\x00\x00\x00\x00");
        assert_eq!(enc(&Value::Int(-1)), b"i\xff\xff\xff\xff");
        assert_eq!(enc(&Value::Int(1 << 31))[0], b'l');
        // A small value held as a BigInt still uses the fixed-width form.
        assert_eq!(
            enc(&Value::BigInt(BigInt::from(7_i64))),
            b"i\x07\x00\x00\x00"
        );
    }

    #[test]
    fn dict_is_null_terminated_without_count() {
        let v = Value::Dict(vec![(Value::Int(1), Value::None)]);
        assert_eq!(enc(&v), b"{i\x01\x00\x00\x00N0");
        assert_eq!(enc(&Value::Dict(vec![])), b"{0");
    }

    #[test]
    fn rejects_other_revisions() {
        for revision in [0, 1, 3, 4] {
            assert_eq!(
                encode(&Value::None, revision),
                Err(EncodeError::UnsupportedRevision { revision })
            );
        }
    }

    #[test]
    fn opaque_values_are_unrepresentable() {
        let err = encode(&Foreign, FORMAT_REVISION).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Unrepresentable {
                type_name: String::from("Foreign")
            }
        );
        assert!(alloc::format!("{err}").contains("unmarshallable object"));
    }

    #[test]
    fn depth_limit_applies_to_containers() {
        let encoder = Encoder::new(Limits { max_depth: 2 });
        let ok = Value::List(vec![Value::None]);
        assert!(encoder.encode(&ok, 2, TraceMask::NONE, None).is_ok());

        let too_deep = Value::List(vec![Value::List(vec![Value::None])]);
        assert_eq!(
            encoder.encode(&too_deep, 2, TraceMask::NONE, None),
            Err(EncodeError::DepthExceeded { limit: 2 })
        );

        // An empty container has no children, so it stays within the bound.
        let empty = Value::List(vec![Value::List(vec![])]);
        assert!(encoder.encode(&empty, 2, TraceMask::NONE, None).is_ok());
    }

    #[test]
    fn encode_into_appends() {
        let mut out = Writer::new();
        out.write_bytes(b"hdr");
        Encoder::default()
            .encode_into(&Value::None, 2, &mut out, TraceMask::NONE, None)
            .unwrap();
        assert_eq!(out.as_slice(), b"hdrN");
    }
}
