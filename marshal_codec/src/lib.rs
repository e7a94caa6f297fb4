// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `marshal_codec`: a binary serializer for a dynamic-language object model.
//!
//! The codec reads and writes format revision 2 of the marshal wire format: a compact, tagged,
//! depth-first encoding of markers, integers, floats, byte and text sequences, containers and
//! compiled code artifacts. Revision 2 has no back-references, so shared or repeated sub-values are
//! written out in full each time.
//!
//! The encoder is generic over the object model through [`object::Marshal`]; [`value::Value`] is
//! the crate's own model and the one the decoder produces.
//!
//! ## Example
//!
//! ```
//! extern crate alloc;
//!
//! use alloc::vec;
//!
//! use marshal_codec::decode::Decoder;
//! use marshal_codec::encode::Encoder;
//! use marshal_codec::trace::TraceMask;
//! use marshal_codec::value::Value;
//! use marshal_codec::{FORMAT_REVISION, Limits};
//!
//! let v = Value::Dict(vec![(Value::str("hello"), Value::str("world"))]);
//!
//! let encoder = Encoder::new(Limits::default());
//! let bytes = encoder.encode(&v, FORMAT_REVISION, TraceMask::NONE, None)?;
//! assert_eq!(bytes, b"{u\x05\x00\x00\x00hellou\x05\x00\x00\x00world0");
//!
//! let mut decoder = Decoder::new(&bytes, Limits::default());
//! assert_eq!(decoder.read_value(TraceMask::NONE, None)?, v);
//! assert_eq!(decoder.remaining(), 0);
//! # Ok::<(), Box<dyn core::error::Error>>(())
//! ```

#![no_std]

extern crate alloc;

pub mod code;
pub mod decode;
pub mod encode;
pub mod format;
pub mod int;
pub mod object;
pub mod pretty;
pub mod pyc;
pub mod trace;
pub mod value;
pub mod wire;

pub use decode::decode;
pub use encode::encode;
pub use wire::FORMAT_REVISION;

/// Resource limits shared by the encoder and decoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth. The top-level value is at depth 1; each container or code artifact
    /// adds one level for its elements or fields.
    ///
    /// Both directions recurse on the native stack, so this also bounds stack use. The default
    /// fits within a 2 MiB thread stack in unoptimized builds.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}
