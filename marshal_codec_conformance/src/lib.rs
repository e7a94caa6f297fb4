// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance suite for `marshal_codec`.
//!
//! The tests live in `tests/conformance.rs`. Run with:
//! `cargo test -p marshal_codec_conformance`
