// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Encodes a small module-shaped code artifact, then decodes and prints it.
//!
//! Run with:
//! `cargo run -p marshal_codec --example dump`

use marshal_codec::code::Code;
use marshal_codec::pretty::{dump_code, repr};
use marshal_codec::pyc::PycHeader;
use marshal_codec::value::Value;
use marshal_codec::{FORMAT_REVISION, Limits};
use marshal_codec::decode::Decoder;
use marshal_codec::encode::Encoder;
use marshal_codec::format::{Reader, Writer};
use marshal_codec::trace::TraceMask;

fn main() {
    let body = Code {
        argcount: 2,
        nlocals: 2,
        stacksize: 2,
        flags: 0x43,
        code: b"|\x00|\x01\x17\x00S\x00".to_vec(),
        consts: vec![Value::None],
        varnames: vec!["a".into(), "b".into()],
        filename: "demo.py".into(),
        name: "add".into(),
        firstlineno: 1,
        lnotab: b"\x00\x01".to_vec(),
        ..Code::default()
    };
    let module = Code {
        stacksize: 2,
        code: b"d\x00d\x01\x84\x00Z\x00d\x02S\x00".to_vec(),
        consts: vec![Value::from(body), Value::str("add"), Value::None],
        names: vec!["add".into()],
        filename: "demo.py".into(),
        name: "<module>".into(),
        firstlineno: 1,
        ..Code::default()
    };

    let mut out = Writer::new();
    PycHeader {
        mtime: 0,
        source_size: 42,
    }
    .write(&mut out);
    Encoder::new(Limits::default())
        .encode_into(&Value::from(module), FORMAT_REVISION, &mut out, TraceMask::NONE, None)
        .unwrap();
    println!("{} bytes", out.len());

    let mut r = Reader::new(out.as_slice());
    let header = PycHeader::read(&mut r).unwrap();
    println!("{header:?}");
    let value = Decoder::with_reader(r, Limits::default())
        .read_value(TraceMask::NONE, None)
        .unwrap();
    println!("{}", repr(&value));
    if let Value::Code(code) = &value {
        print!("{}", dump_code(code));
    }
}
