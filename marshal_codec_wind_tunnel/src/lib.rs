// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `marshal_codec`.
//!
//! Run with:
//! `cargo bench -p marshal_codec_wind_tunnel`
