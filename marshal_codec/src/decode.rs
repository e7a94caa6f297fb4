// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value decoder.
//!
//! The decoder is the inverse of [`crate::encode`]: it reads one tagged value, recursing into
//! containers, and returns an owned [`Value`]. Every read goes through [`Reader`], so running out
//! of input anywhere is reported as [`DecodeError::Truncated`] with the offset of the short read.
//!
//! Declared counts are not trusted for allocation: a container reserves at most one slot per
//! remaining input byte, since every element occupies at least one byte.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Limits;
use crate::code;
use crate::format::{DecodeError, Reader};
use crate::int::BigInt;
use crate::trace::{Direction, TraceMask, TraceOutcome, TraceSink, Tracer};
use crate::value::Value;
use crate::wire::{DIGIT_MAX, Tag};

/// A decoder over one input buffer.
///
/// Each [`Decoder::read_value`] call reads one value starting at the current offset and leaves the
/// decoder positioned just past it, so several values written back to back can be read in turn.
/// After an error the position is unspecified.
#[derive(Clone, Debug)]
pub struct Decoder<'a> {
    reader: Reader<'a>,
    limits: Limits,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8], limits: Limits) -> Self {
        Self::with_reader(Reader::new(bytes), limits)
    }

    /// Creates a decoder that continues from `reader`'s position.
    ///
    /// Offsets in errors and trace events stay relative to the start of the reader's buffer.
    #[must_use]
    pub fn with_reader(reader: Reader<'a>, limits: Limits) -> Self {
        Self { reader, limits }
    }

    /// Returns the decoder limits.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the current byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.reader.offset()
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Returns the underlying reader.
    #[must_use]
    pub fn into_reader(self) -> Reader<'a> {
        self.reader
    }

    /// Reads one value.
    pub fn read_value(
        &mut self,
        trace_mask: TraceMask,
        trace: Option<&mut dyn TraceSink>,
    ) -> Result<Value, DecodeError> {
        let start = self.reader.offset();
        let mut parse = Parse {
            r: &mut self.reader,
            limits: &self.limits,
            tracer: Tracer::new(trace_mask, trace),
        };
        parse.tracer.run_start(Direction::Decode);
        let result = parse.read_object(1);
        let outcome = match &result {
            Ok(_) => TraceOutcome::Ok {
                len: parse.r.offset() - start,
            },
            Err(err) => TraceOutcome::Failed {
                offset: err.offset(),
            },
        };
        parse.tracer.run_end(Direction::Decode, outcome);
        result
    }
}

/// Decodes the first value in `bytes` with default limits and no tracing.
///
/// Bytes after the first complete value are ignored.
///
/// ```
/// use marshal_codec::value::Value;
///
/// let v = marshal_codec::decode(b"[\x02\x00\x00\x00NT").unwrap();
/// assert_eq!(v, Value::List(vec![Value::None, Value::Bool(true)]));
/// ```
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    Decoder::new(bytes, Limits::default()).read_value(TraceMask::NONE, None)
}

/// One in-progress [`Decoder::read_value`] call.
pub(crate) struct Parse<'p, 'a, 's> {
    r: &'p mut Reader<'a>,
    limits: &'p Limits,
    tracer: Tracer<'s>,
}

impl Parse<'_, '_, '_> {
    /// Reads and validates a tag byte for a value at `depth`.
    fn next_tag(&mut self, depth: usize) -> Result<(Tag, usize), DecodeError> {
        let offset = self.r.offset();
        let byte = self.r.read_u8()?;
        let tag = match Tag::from_u8(byte) {
            Some(Tag::Null) | None => return Err(DecodeError::UnknownTag { tag: byte, offset }),
            Some(tag) => tag,
        };
        if depth > self.limits.max_depth {
            return Err(DecodeError::DepthExceeded {
                limit: self.limits.max_depth,
                offset,
            });
        }
        Ok((tag, offset))
    }

    /// Reads a tag that must be `expected`; the caller reads the payload, then calls
    /// [`Parse::finish`].
    pub(crate) fn expect(&mut self, expected: Tag, depth: usize) -> Result<(), DecodeError> {
        let (found, offset) = self.next_tag(depth)?;
        if found != expected {
            return Err(DecodeError::UnexpectedTag {
                expected,
                found,
                offset,
            });
        }
        self.tracer.value_enter(found, depth, offset);
        Ok(())
    }

    pub(crate) fn finish(&mut self, tag: Tag, depth: usize) {
        let offset = self.r.offset();
        self.tracer.value_exit(tag, depth, offset);
    }

    /// Reads a bare little-endian `i32` (no tag).
    pub(crate) fn raw_i32(&mut self) -> Result<i32, DecodeError> {
        self.r.read_i32_le()
    }

    /// Reads one tagged value at `depth`.
    ///
    /// This is the recursive step, so it and [`Parse::read_payload`] keep only container handling
    /// inline; scalar payloads are read in [`Parse::read_scalar`].
    pub(crate) fn read_object(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let (tag, offset) = self.next_tag(depth)?;
        self.tracer.value_enter(tag, depth, offset);
        let value = self.read_payload(tag, offset, depth)?;
        self.finish(tag, depth);
        Ok(value)
    }

    fn read_payload(
        &mut self,
        tag: Tag,
        offset: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match tag {
            Tag::Tuple => self.read_items(depth).map(Value::Tuple),
            Tag::List => self.read_items(depth).map(Value::List),
            Tag::Set => self.read_items(depth).map(Value::Set),
            Tag::FrozenSet => self.read_items(depth).map(Value::FrozenSet),
            Tag::Dict => self.read_entries(depth).map(Value::Dict),
            Tag::Code => self.read_code(depth),
            _ => self.read_scalar(tag, offset),
        }
    }

    fn read_scalar(&mut self, tag: Tag, offset: usize) -> Result<Value, DecodeError> {
        Ok(match tag {
            Tag::None => Value::None,
            Tag::StopIteration => Value::StopIteration,
            Tag::Ellipsis => Value::Ellipsis,
            Tag::False => Value::Bool(false),
            Tag::True => Value::Bool(true),
            Tag::Int => Value::Int(i64::from(self.r.read_i32_le()?)),
            Tag::Long => Value::from(self.read_long()?),
            Tag::Float => Value::Float(self.r.read_f64_le()?),
            Tag::Complex => {
                let re = self.r.read_f64_le()?;
                let im = self.r.read_f64_le()?;
                Value::Complex { re, im }
            }
            Tag::Bytes => {
                let len = self.r.read_len()?;
                Value::Bytes(self.r.read_bytes(len)?.to_vec())
            }
            Tag::Str => {
                let len = self.r.read_len()?;
                Value::Str(String::from(self.r.read_str(len)?))
            }
            // Containers are read by `read_payload`; `next_tag` never yields `Null`.
            _ => {
                return Err(DecodeError::UnknownTag {
                    tag: tag.byte(),
                    offset,
                });
            }
        })
    }

    fn read_code(&mut self, depth: usize) -> Result<Value, DecodeError> {
        code::read_fields(self, depth).map(Value::from)
    }

    fn read_long(&mut self) -> Result<BigInt, DecodeError> {
        let n = self.r.read_i32_le()?;
        let count = usize::try_from(n.unsigned_abs()).map_err(|_| DecodeError::Truncated {
            offset: self.r.offset(),
        })?;
        let mut digits = Vec::with_capacity(count.min(self.r.remaining() / 2));
        for _ in 0..count {
            let offset = self.r.offset();
            let digit = self.r.read_u16_le()?;
            if digit > DIGIT_MAX {
                return Err(DecodeError::InvalidDigit { digit, offset });
            }
            digits.push(digit);
        }
        Ok(BigInt::from_checked_digits(n < 0, digits))
    }

    fn read_items(&mut self, depth: usize) -> Result<Vec<Value>, DecodeError> {
        let n = self.r.read_len()?;
        let mut items = Vec::with_capacity(n.min(self.r.remaining()));
        for _ in 0..n {
            items.push(self.read_object(depth + 1)?);
        }
        Ok(items)
    }

    fn read_entries(&mut self, depth: usize) -> Result<Vec<(Value, Value)>, DecodeError> {
        let mut entries = Vec::new();
        loop {
            match self.r.peek_u8() {
                None => {
                    return Err(DecodeError::UnterminatedDict {
                        offset: self.r.offset(),
                    });
                }
                Some(b) if b == Tag::Null.byte() => {
                    self.r.read_u8()?;
                    return Ok(entries);
                }
                Some(_) => {
                    let key = self.read_object(depth + 1)?;
                    // Input that stops between a key and its value never reached the terminator.
                    if self.r.is_empty() {
                        return Err(DecodeError::UnterminatedDict {
                            offset: self.r.offset(),
                        });
                    }
                    let value = self.read_object(depth + 1)?;
                    entries.push((key, value));
                }
            }
        }
    }

    /// Reads a `s` value.
    pub(crate) fn read_bytes_value(&mut self, depth: usize) -> Result<Vec<u8>, DecodeError> {
        self.expect(Tag::Bytes, depth)?;
        let len = self.r.read_len()?;
        let bytes = self.r.read_bytes(len)?.to_vec();
        self.finish(Tag::Bytes, depth);
        Ok(bytes)
    }

    /// Reads a `u` value.
    pub(crate) fn read_str_value(&mut self, depth: usize) -> Result<String, DecodeError> {
        self.expect(Tag::Str, depth)?;
        let len = self.r.read_len()?;
        let s = String::from(self.r.read_str(len)?);
        self.finish(Tag::Str, depth);
        Ok(s)
    }

    /// Reads a `(` value with arbitrary elements.
    pub(crate) fn read_tuple_value(&mut self, depth: usize) -> Result<Vec<Value>, DecodeError> {
        self.expect(Tag::Tuple, depth)?;
        let items = self.read_items(depth)?;
        self.finish(Tag::Tuple, depth);
        Ok(items)
    }

    /// Reads a `(` value whose elements must all be `u` values.
    pub(crate) fn read_str_tuple(&mut self, depth: usize) -> Result<Vec<String>, DecodeError> {
        self.expect(Tag::Tuple, depth)?;
        let n = self.r.read_len()?;
        let mut items = Vec::with_capacity(n.min(self.r.remaining()));
        for _ in 0..n {
            items.push(self.read_str_value(depth + 1)?);
        }
        self.finish(Tag::Tuple, depth);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn limited(bytes: &[u8], max_depth: usize) -> Result<Value, DecodeError> {
        Decoder::new(bytes, Limits { max_depth }).read_value(TraceMask::NONE, None)
    }

    #[test]
    fn reads_scalars() {
        assert_eq!(decode(b"N"), Ok(Value::None));
        assert_eq!(decode(b"i\xd2\x04\x00\x00"), Ok(Value::Int(1234)));
        assert_eq!(decode(b"i\xff\xff\xff\xff"), Ok(Value::Int(-1)));
        assert_eq!(
            decode(b"s\x03\x00\x00\x00abc"),
            Ok(Value::Bytes(b"abc".to_vec()))
        );
    }

    #[test]
    fn long_within_i64_becomes_int() {
        assert_eq!(
            decode(b"l\x03\x00\x00\x00\x00\x00\x00\x00\x02\x00"),
            Ok(Value::Int(1 << 31))
        );
        // Unnormalized high zero digits are accepted.
        assert_eq!(
            decode(b"l\xfe\xff\xff\xff\x05\x00\x00\x00"),
            Ok(Value::Int(-5))
        );
        assert_eq!(decode(b"l\x00\x00\x00\x00"), Ok(Value::Int(0)));
    }

    #[test]
    fn long_digit_out_of_range() {
        assert_eq!(
            decode(b"l\x02\x00\x00\x00\x01\x00\x00\x80"),
            Err(DecodeError::InvalidDigit {
                digit: 0x8000,
                offset: 7
            })
        );
    }

    #[test]
    fn truncation_reports_offset() {
        assert_eq!(decode(b""), Err(DecodeError::Truncated { offset: 0 }));
        assert_eq!(decode(b"i\x01\x00"), Err(DecodeError::Truncated { offset: 1 }));
        assert_eq!(
            decode(b"(\x02\x00\x00\x00N"),
            Err(DecodeError::Truncated { offset: 6 })
        );
    }

    #[test]
    fn huge_counts_do_not_preallocate() {
        assert_eq!(
            decode(b"[\xff\xff\xff\x7fN"),
            Err(DecodeError::Truncated { offset: 6 })
        );
        assert_eq!(
            decode(b"l\xff\xff\xff\x7f"),
            Err(DecodeError::Truncated { offset: 5 })
        );
    }

    #[test]
    fn unknown_and_null_tags() {
        assert_eq!(
            decode(b"?"),
            Err(DecodeError::UnknownTag { tag: b'?', offset: 0 })
        );
        assert_eq!(
            decode(b"0"),
            Err(DecodeError::UnknownTag { tag: b'0', offset: 0 })
        );
        // The terminator is only meaningful at a key position.
        assert_eq!(
            decode(b"{NN0"),
            Ok(Value::Dict(vec![(Value::None, Value::None)]))
        );
        assert_eq!(
            decode(b"{N0"),
            Err(DecodeError::UnknownTag { tag: b'0', offset: 2 })
        );
    }

    #[test]
    fn dict_without_terminator() {
        assert_eq!(
            decode(b"{NT"),
            Err(DecodeError::UnterminatedDict { offset: 3 })
        );
        assert_eq!(decode(b"{"), Err(DecodeError::UnterminatedDict { offset: 1 }));
        // Ending where a value should start is still a missing terminator.
        assert_eq!(decode(b"{N"), Err(DecodeError::UnterminatedDict { offset: 2 }));
        assert_eq!(
            decode(b"{u\x01\x00\x00\x00k"),
            Err(DecodeError::UnterminatedDict { offset: 7 })
        );
        // Running out inside a key or value payload is a short read.
        assert_eq!(
            decode(b"{Nu\x02\x00\x00\x00a"),
            Err(DecodeError::Truncated { offset: 7 })
        );
    }

    #[test]
    fn invalid_utf8_text() {
        assert_eq!(
            decode(b"u\x02\x00\x00\x00\xc3\x28"),
            Err(DecodeError::InvalidUtf8 { offset: 5 })
        );
    }

    #[test]
    fn depth_limit() {
        assert_eq!(limited(b"[\x01\x00\x00\x00N", 2), Ok(Value::List(vec![Value::None])));
        assert_eq!(
            limited(b"[\x01\x00\x00\x00[\x01\x00\x00\x00N", 2),
            Err(DecodeError::DepthExceeded {
                limit: 2,
                offset: 10
            })
        );
    }

    #[test]
    fn reads_consecutive_values_and_ignores_trailing_bytes() {
        let bytes = b"TFjunk";
        let mut d = Decoder::new(bytes, Limits::default());
        assert_eq!(d.read_value(TraceMask::NONE, None), Ok(Value::Bool(true)));
        assert_eq!(d.offset(), 1);
        assert_eq!(d.read_value(TraceMask::NONE, None), Ok(Value::Bool(false)));
        assert_eq!(d.remaining(), 4);
        assert_eq!(decode(bytes), Ok(Value::Bool(true)));
    }
}
