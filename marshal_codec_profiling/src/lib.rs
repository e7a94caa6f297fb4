// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracy profiling adapter for `marshal_codec`.
//!
//! [`ProfilingTraceSink`] turns codec trace events into Tracy zones: one zone per encode or decode
//! call and one nested zone per container or code value. Scalars are not given zones; they are far
//! too numerous to be useful in a timeline.
//!
//! Zones are only emitted while a Tracy client is running (see `tracy_client::Client::start`).
//! Without one the sink is inert.

use marshal_codec::trace::{Direction, TraceMask, TraceOutcome, TraceSink};
use marshal_codec::wire::Tag;
use tracy_client::{Client, Span};

/// Supplies zone names for values.
pub trait LabelResolver {
    /// Returns the zone name for a container or code value, or `None` to skip the zone.
    fn value_label(&mut self, tag: Tag, depth: usize) -> Option<String>;
}

/// Names zones after the value's tag.
#[derive(Clone, Debug, Default)]
pub struct TagLabelResolver {
    /// Containers deeper than this get no zone. `0` means no limit.
    pub max_depth: usize,
}

impl LabelResolver for TagLabelResolver {
    fn value_label(&mut self, tag: Tag, depth: usize) -> Option<String> {
        if self.max_depth != 0 && depth > self.max_depth {
            return None;
        }
        Some(format!("marshal {}", tag.name()))
    }
}

/// A [`TraceSink`] that reports codec activity to Tracy.
pub struct ProfilingTraceSink<R = TagLabelResolver> {
    resolver: R,
    run: Option<Span>,
    // One entry per open container, `None` where no zone was opened.
    values: Vec<Option<Span>>,
}

impl<R> core::fmt::Debug for ProfilingTraceSink<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProfilingTraceSink")
            .field("open_values", &self.values.len())
            .finish_non_exhaustive()
    }
}

impl Default for ProfilingTraceSink {
    fn default() -> Self {
        Self::with_resolver(TagLabelResolver::default())
    }
}

impl ProfilingTraceSink {
    /// Creates a sink that names zones after tags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: LabelResolver> ProfilingTraceSink<R> {
    /// Creates a sink with a custom zone-name resolver.
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            run: None,
            values: Vec::new(),
        }
    }

    /// Returns the resolver.
    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Number of container zones currently open.
    #[must_use]
    pub fn open_values(&self) -> usize {
        self.values.len()
    }

    fn close_all(&mut self) {
        // Zones must close innermost first.
        while self.values.pop().is_some() {}
        self.run = None;
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Encode => "marshal encode",
        Direction::Decode => "marshal decode",
    }
}

impl<R: LabelResolver> TraceSink for ProfilingTraceSink<R> {
    fn mask(&self) -> TraceMask {
        TraceMask::RUN | TraceMask::VALUE
    }

    fn run_start(&mut self, direction: Direction) {
        self.close_all();
        self.run = Client::running().map(|client| {
            client.span_alloc(Some(direction_name(direction)), "run", file!(), line!(), 0)
        });
    }

    fn value_enter(&mut self, tag: Tag, depth: usize, _offset: usize) {
        if !tag.is_container() {
            return;
        }
        let span = self.resolver.value_label(tag, depth).and_then(|label| {
            Client::running()
                .map(|client| client.span_alloc(Some(&label), "value", file!(), line!(), 0))
        });
        self.values.push(span);
    }

    fn value_exit(&mut self, tag: Tag, _depth: usize, _offset: usize) {
        if tag.is_container() {
            self.values.pop();
        }
    }

    fn run_end(&mut self, direction: Direction, outcome: TraceOutcome) {
        if let (Some(span), TraceOutcome::Ok { len }) = (&self.run, outcome) {
            span.emit_text(&format!("{len} bytes"));
        }
        if let TraceOutcome::Failed { offset } = outcome {
            if let Some(client) = Client::running() {
                client.message(
                    &format!("{} failed at offset {offset}", direction_name(direction)),
                    0,
                );
            }
        }
        self.close_all();
    }
}
