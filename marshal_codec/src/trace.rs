// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for `marshal_codec`.
//!
//! Tracing is optional and is designed to be `no_std` friendly.
//! The encoder and decoder only emit events requested by a [`TraceMask`].
//!
//! To enable tracing, pass a [`TraceMask`] and [`TraceSink`] to [`Encoder::encode`] or
//! [`Decoder::read_value`].

#[cfg(doc)]
use crate::decode::Decoder;
#[cfg(doc)]
use crate::encode::Encoder;

use crate::wire::Tag;

/// A set of trace events requested by a [`TraceSink`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TraceMask(u32);

impl core::ops::BitOr for TraceMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for TraceMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl TraceMask {
    /// No tracing.
    pub const NONE: Self = Self(0);
    /// Trace call boundaries.
    ///
    /// Enables:
    /// - [`TraceSink::run_start`]
    /// - [`TraceSink::run_end`]
    pub const RUN: Self = Self(1 << 0);
    /// Trace every value written or read.
    ///
    /// Enables:
    /// - [`TraceSink::value_enter`]
    /// - [`TraceSink::value_exit`]
    pub const VALUE: Self = Self(1 << 1);

    /// Returns `true` if this mask includes all bits in `other`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

/// Which way bytes are flowing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Values to bytes.
    Encode,
    /// Bytes to values.
    Decode,
}

/// Call outcome for tracing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The call produced a result.
    Ok {
        /// Bytes written or consumed.
        len: usize,
    },
    /// The call failed.
    Failed {
        /// Offset at which the failure was detected.
        offset: usize,
    },
}

/// A trace sink that can receive codec events.
pub trait TraceSink {
    /// Returns the set of events the sink wants.
    fn mask(&self) -> TraceMask {
        TraceMask::NONE
    }

    /// Called at the start of an encode or decode call.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    fn run_start(&mut self, _direction: Direction) {}

    /// Called when a value's tag has been written or read.
    ///
    /// Called only if `mask()` includes [`TraceMask::VALUE`].
    ///
    /// - `tag`: the value's tag
    /// - `depth`: nesting depth, `1` for the top-level value
    /// - `offset`: byte offset of the tag
    fn value_enter(&mut self, _tag: Tag, _depth: usize, _offset: usize) {}

    /// Called when a value's payload has been fully written or read.
    ///
    /// Called only if `mask()` includes [`TraceMask::VALUE`]. Not called for a value whose payload
    /// failed; [`TraceSink::run_end`] reports the failure instead.
    ///
    /// - `offset`: byte offset just past the payload
    fn value_exit(&mut self, _tag: Tag, _depth: usize, _offset: usize) {}

    /// Called at the end of an encode or decode call.
    ///
    /// Called only if `mask()` includes [`TraceMask::RUN`].
    fn run_end(&mut self, _direction: Direction, _outcome: TraceOutcome) {}
}

/// Routes events to an optional sink, filtered by the caller's mask.
pub(crate) struct Tracer<'s> {
    sink: Option<&'s mut dyn TraceSink>,
    run: bool,
    value: bool,
}

impl<'s> Tracer<'s> {
    pub(crate) fn new(mask: TraceMask, sink: Option<&'s mut dyn TraceSink>) -> Self {
        let enabled = sink.is_some();
        Self {
            sink,
            run: enabled && mask.contains(TraceMask::RUN),
            value: enabled && mask.contains(TraceMask::VALUE),
        }
    }

    pub(crate) fn run_start(&mut self, direction: Direction) {
        if !self.run {
            return;
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.run_start(direction);
        }
    }

    pub(crate) fn run_end(&mut self, direction: Direction, outcome: TraceOutcome) {
        if !self.run {
            return;
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.run_end(direction, outcome);
        }
    }

    pub(crate) fn value_enter(&mut self, tag: Tag, depth: usize, offset: usize) {
        if !self.value {
            return;
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.value_enter(tag, depth, offset);
        }
    }

    pub(crate) fn value_exit(&mut self, tag: Tag, depth: usize, offset: usize) {
        if !self.value {
            return;
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.value_exit(tag, depth, offset);
        }
    }
}
