// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiled code artifacts and their field schema.
//!
//! A code value is the `c` tag followed by a fixed sequence of fields. Integer fields are bare
//! little-endian `i32`s; every other field is a complete tagged value of a required kind:
//!
//! | field            | wire form            |
//! |------------------|----------------------|
//! | `argcount`       | `i32`                |
//! | `kwonlyargcount` | `i32`                |
//! | `nlocals`        | `i32`                |
//! | `stacksize`      | `i32`                |
//! | `flags`          | `i32`                |
//! | `code`           | `s`                  |
//! | `consts`         | `(` of any values    |
//! | `names`          | `(` of `u`           |
//! | `varnames`       | `(` of `u`           |
//! | `freevars`       | `(` of `u`           |
//! | `cellvars`       | `(` of `u`           |
//! | `filename`       | `u`                  |
//! | `name`           | `u`                  |
//! | `firstlineno`    | `i32`                |
//! | `lnotab`         | `s`                  |
//!
//! A field of the wrong kind fails with [`DecodeError::UnexpectedTag`].

use alloc::string::String;
use alloc::vec::Vec;

use crate::decode::Parse;
use crate::encode::{EncodeError, Emit};
use crate::format::DecodeError;
use crate::value::Value;
use crate::wire::Tag;

/// A compiled code artifact.
///
/// The codec treats every field as opaque data; no field is interpreted or cross-checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Code {
    /// Number of positional parameters.
    pub argcount: i32,
    /// Number of keyword-only parameters.
    pub kwonlyargcount: i32,
    /// Number of local variables.
    pub nlocals: i32,
    /// Maximum evaluation stack depth.
    pub stacksize: i32,
    /// Compiler flags.
    pub flags: i32,
    /// Bytecode.
    pub code: Vec<u8>,
    /// Constants referenced by the bytecode. May contain nested code artifacts.
    pub consts: Vec<Value>,
    /// Global and attribute names.
    pub names: Vec<String>,
    /// Local variable names.
    pub varnames: Vec<String>,
    /// Source file name.
    pub filename: String,
    /// Function or module name.
    pub name: String,
    /// First source line.
    pub firstlineno: i32,
    /// Line number table.
    pub lnotab: Vec<u8>,
    /// Free variable names.
    pub freevars: Vec<String>,
    /// Cell variable names.
    pub cellvars: Vec<String>,
}

/// Writes the fields of a code value whose tag is at `depth`.
pub(crate) fn write_fields(
    emit: &mut Emit<'_, '_>,
    code: &Code,
    depth: usize,
) -> Result<(), EncodeError> {
    let field = depth + 1;
    emit.raw_i32(code.argcount);
    emit.raw_i32(code.kwonlyargcount);
    emit.raw_i32(code.nlocals);
    emit.raw_i32(code.stacksize);
    emit.raw_i32(code.flags);
    emit.write_sized(Tag::Bytes, &code.code, field)?;
    emit.write_counted(Tag::Tuple, &code.consts, field)?;
    emit.write_str_tuple(&code.names, field)?;
    emit.write_str_tuple(&code.varnames, field)?;
    emit.write_str_tuple(&code.freevars, field)?;
    emit.write_str_tuple(&code.cellvars, field)?;
    emit.write_str(&code.filename, field)?;
    emit.write_str(&code.name, field)?;
    emit.raw_i32(code.firstlineno);
    emit.write_sized(Tag::Bytes, &code.lnotab, field)?;
    Ok(())
}

/// Reads the fields of a code value whose tag is at `depth`.
pub(crate) fn read_fields(
    parse: &mut Parse<'_, '_, '_>,
    depth: usize,
) -> Result<Code, DecodeError> {
    let field = depth + 1;
    let argcount = parse.raw_i32()?;
    let kwonlyargcount = parse.raw_i32()?;
    let nlocals = parse.raw_i32()?;
    let stacksize = parse.raw_i32()?;
    let flags = parse.raw_i32()?;
    let code = parse.read_bytes_value(field)?;
    let consts = parse.read_tuple_value(field)?;
    let names = parse.read_str_tuple(field)?;
    let varnames = parse.read_str_tuple(field)?;
    let freevars = parse.read_str_tuple(field)?;
    let cellvars = parse.read_str_tuple(field)?;
    let filename = parse.read_str_value(field)?;
    let name = parse.read_str_value(field)?;
    let firstlineno = parse.raw_i32()?;
    let lnotab = parse.read_bytes_value(field)?;
    Ok(Code {
        argcount,
        kwonlyargcount,
        nlocals,
        stacksize,
        flags,
        code,
        consts,
        names,
        varnames,
        filename,
        name,
        firstlineno,
        lnotab,
        freevars,
        cellvars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Limits, decode, encode};
    use crate::decode::Decoder;
    use crate::trace::TraceMask;
    use crate::wire::FORMAT_REVISION;
    use alloc::vec;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| String::from(*s)).collect()
    }

    fn sample() -> Code {
        Code {
            argcount: 2,
            nlocals: 3,
            stacksize: 1,
            flags: 0x43,
            code: b"\x64\x00\x53\x00".to_vec(),
            consts: vec![Value::None, Value::str("doc")],
            names: names(&["print"]),
            varnames: names(&["a", "b", "c"]),
            filename: String::from("mod.py"),
            name: String::from("f"),
            firstlineno: 10,
            lnotab: b"\x02\x01".to_vec(),
            ..Code::default()
        }
    }

    #[test]
    fn empty_code_layout() {
        let bytes = encode(&Value::from(Code::default()), FORMAT_REVISION).unwrap();
        let mut expected = vec![b'c'];
        expected.extend_from_slice(&[0; 20]);
        expected.extend_from_slice(b"s\x00\x00\x00\x00");
        for _ in 0..5 {
            expected.extend_from_slice(b"(\x00\x00\x00\x00");
        }
        expected.extend_from_slice(b"u\x00\x00\x00\x00u\x00\x00\x00\x00");
        expected.extend_from_slice(&[0; 4]);
        expected.extend_from_slice(b"s\x00\x00\x00\x00");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn nested_code_in_consts() {
        let inner = sample();
        let outer = Code {
            consts: vec![Value::from(inner.clone()), Value::Int(1)],
            name: String::from("<module>"),
            ..Code::default()
        };
        let v = Value::from(outer);
        let bytes = encode(&v, FORMAT_REVISION).unwrap();
        assert_eq!(decode(&bytes), Ok(v));
    }

    #[test]
    fn wrong_field_kind_is_rejected() {
        let mut bytes = encode(&Value::from(sample()), FORMAT_REVISION).unwrap();
        // The bytecode field starts right after the tag and five i32 fields.
        assert_eq!(bytes[21], b's');
        bytes[21] = b'u';
        assert_eq!(
            decode(&bytes),
            Err(DecodeError::UnexpectedTag {
                expected: Tag::Bytes,
                found: Tag::Str,
                offset: 21
            })
        );
    }

    #[test]
    fn name_tuple_requires_text() {
        let c = Code {
            names: names(&["x"]),
            ..Code::default()
        };
        let mut bytes = encode(&Value::from(c), FORMAT_REVISION).unwrap();
        // c, 5 x i32, empty s, empty (, then the names tuple header and its first element.
        let element = 1 + 20 + 5 + 5 + 5;
        assert_eq!(bytes[element], b'u');
        bytes[element] = b's';
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::UnexpectedTag {
                expected: Tag::Str,
                found: Tag::Bytes,
                ..
            })
        ));
    }

    #[test]
    fn fields_count_toward_depth() {
        let v = Value::from(Code {
            consts: vec![Value::None],
            ..Code::default()
        });
        let bytes = encode(&v, FORMAT_REVISION).unwrap();
        let shallow = Limits { max_depth: 2 };
        assert!(
            Decoder::new(&bytes, shallow)
                .read_value(TraceMask::NONE, None)
                .is_err()
        );
        let enough = Limits { max_depth: 3 };
        assert_eq!(
            Decoder::new(&bytes, enough).read_value(TraceMask::NONE, None),
            Ok(v)
        );
    }
}
