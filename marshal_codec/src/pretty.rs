// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable rendering of values and code artifacts.
//!
//! [`repr`] (and the [`core::fmt::Display`] impl on [`Value`]) renders a value in the object
//! model's own literal syntax: `None`, `b'..'`, `'..'`, `(1,)`, `{'k': 'v'}`, `frozenset({..})` and
//! so on. [`dump_code`] renders a code artifact as an indented field listing, recursing into code
//! constants.

use alloc::string::String;
use core::fmt::{self, Write};

use crate::code::Code;
use crate::value::Value;

/// Renders `value` as a literal.
#[must_use]
pub fn repr(value: &Value) -> String {
    let mut out = String::new();
    // Writing to a `String` cannot fail.
    let _ = write_value(&mut out, value);
    out
}

/// Renders `code` as a field listing.
#[must_use]
pub fn dump_code(code: &Code) -> String {
    let mut out = String::new();
    let _ = write_code(&mut out, code, 0);
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self)
    }
}

fn write_value<W: Write>(out: &mut W, value: &Value) -> fmt::Result {
    match value {
        Value::None => out.write_str("None"),
        Value::StopIteration => out.write_str("StopIteration"),
        Value::Ellipsis => out.write_str("Ellipsis"),
        Value::Bool(true) => out.write_str("True"),
        Value::Bool(false) => out.write_str("False"),
        Value::Int(v) => write!(out, "{v}"),
        Value::BigInt(v) => write!(out, "{v}"),
        Value::Float(v) => write_float(out, *v),
        Value::Complex { re, im } => {
            out.write_char('(')?;
            write_float(out, *re)?;
            if !im.is_sign_negative() || im.is_nan() {
                out.write_char('+')?;
            }
            write_float(out, *im)?;
            out.write_str("j)")
        }
        Value::Bytes(b) => write_bytes(out, b),
        Value::Str(s) => write_str(out, s),
        Value::Tuple(items) => {
            out.write_char('(')?;
            write_items(out, items)?;
            if items.len() == 1 {
                out.write_char(',')?;
            }
            out.write_char(')')
        }
        Value::List(items) => {
            out.write_char('[')?;
            write_items(out, items)?;
            out.write_char(']')
        }
        Value::Dict(entries) => {
            out.write_char('{')?;
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_value(out, k)?;
                out.write_str(": ")?;
                write_value(out, v)?;
            }
            out.write_char('}')
        }
        Value::Set(items) if items.is_empty() => out.write_str("set()"),
        Value::Set(items) => {
            out.write_char('{')?;
            write_items(out, items)?;
            out.write_char('}')
        }
        Value::FrozenSet(items) if items.is_empty() => out.write_str("frozenset()"),
        Value::FrozenSet(items) => {
            out.write_str("frozenset({")?;
            write_items(out, items)?;
            out.write_str("})")
        }
        Value::Code(code) => write!(
            out,
            "<code object {}, file \"{}\", line {}>",
            code.name, code.filename, code.firstlineno
        ),
    }
}

fn write_items<W: Write>(out: &mut W, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_value(out, item)?;
    }
    Ok(())
}

fn write_float<W: Write>(out: &mut W, v: f64) -> fmt::Result {
    if v.is_nan() {
        out.write_str("nan")
    } else if v.is_infinite() {
        out.write_str(if v < 0.0 { "-inf" } else { "inf" })
    } else {
        write!(out, "{v:?}")
    }
}

fn write_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> fmt::Result {
    out.write_str("b'")?;
    for &b in bytes {
        match b {
            b'\\' => out.write_str("\\\\")?,
            b'\'' => out.write_str("\\'")?,
            b'\t' => out.write_str("\\t")?,
            b'\n' => out.write_str("\\n")?,
            b'\r' => out.write_str("\\r")?,
            0x20..=0x7e => out.write_char(char::from(b))?,
            _ => write!(out, "\\x{b:02x}")?,
        }
    }
    out.write_char('\'')
}

fn write_str<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('\'')?;
    for c in s.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '\'' => out.write_str("\\'")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            c if c.is_control() && u32::from(c) < 0x100 => write!(out, "\\x{:02x}", u32::from(c))?,
            c if c.is_control() => write!(out, "\\u{:04x}", u32::from(c))?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('\'')
}

fn write_names<W: Write>(out: &mut W, label: &str, names: &[String], pad: usize) -> fmt::Result {
    write!(out, "{:pad$}{label}: (", "")?;
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_str(out, name)?;
    }
    if names.len() == 1 {
        out.write_char(',')?;
    }
    out.write_str(")\n")
}

fn write_code<W: Write>(out: &mut W, code: &Code, indent: usize) -> fmt::Result {
    let pad = indent + 2;
    writeln!(out, "{:indent$}code object {}", "", code.name)?;
    writeln!(out, "{:pad$}file: {}", "", code.filename)?;
    writeln!(out, "{:pad$}first line: {}", "", code.firstlineno)?;
    writeln!(
        out,
        "{:pad$}argcount: {}, kwonlyargcount: {}, nlocals: {}, stacksize: {}, flags: {:#x}",
        "", code.argcount, code.kwonlyargcount, code.nlocals, code.stacksize, code.flags
    )?;
    writeln!(out, "{:pad$}code: {} bytes", "", code.code.len())?;
    writeln!(out, "{:pad$}consts: {}", "", code.consts.len())?;
    for (i, c) in code.consts.iter().enumerate() {
        match c {
            Value::Code(nested) => {
                writeln!(out, "{:w$}{i}:", "", w = pad + 2)?;
                write_code(out, nested, pad + 4)?;
            }
            other => {
                write!(out, "{:w$}{i}: ", "", w = pad + 2)?;
                write_value(out, other)?;
                out.write_char('\n')?;
            }
        }
    }
    write_names(out, "names", &code.names, pad)?;
    write_names(out, "varnames", &code.varnames, pad)?;
    write_names(out, "freevars", &code.freevars, pad)?;
    write_names(out, "cellvars", &code.cellvars, pad)?;
    writeln!(out, "{:pad$}lnotab: {} bytes", "", code.lnotab.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::int::BigInt;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn scalars() {
        assert_eq!(repr(&Value::None), "None");
        assert_eq!(repr(&Value::Bool(true)), "True");
        assert_eq!(repr(&Value::Int(-3)), "-3");
        assert_eq!(repr(&Value::BigInt(BigInt::from(1_i128 << 70))), "1180591620717411303424");
        assert_eq!(repr(&Value::Float(1.0)), "1.0");
        assert_eq!(repr(&Value::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(repr(&Value::Complex { re: 1.5, im: -2.0 }), "(1.5-2.0j)");
        assert_eq!(repr(&Value::Complex { re: 0.0, im: 1.0 }), "(0.0+1.0j)");
    }

    #[test]
    fn text_and_bytes_escape() {
        assert_eq!(repr(&Value::bytes(&b"a'\x00\n"[..])), "b'a\\'\\x00\\n'");
        assert_eq!(repr(&Value::str("it's\u{3000}")), "'it\\'s\u{3000}'");
        assert_eq!(Value::str("\u{7f}").to_string(), "'\\x7f'");
    }

    #[test]
    fn containers() {
        assert_eq!(repr(&Value::Tuple(vec![])), "()");
        assert_eq!(repr(&Value::Tuple(vec![Value::Int(1)])), "(1,)");
        assert_eq!(
            repr(&Value::List(vec![Value::None, Value::Bool(false)])),
            "[None, False]"
        );
        assert_eq!(
            repr(&Value::Dict(vec![(Value::str("k"), Value::Int(1))])),
            "{'k': 1}"
        );
        assert_eq!(repr(&Value::Set(vec![])), "set()");
        assert_eq!(repr(&Value::FrozenSet(vec![Value::Int(2)])), "frozenset({2})");
    }

    #[test]
    fn code_listing_recurses_into_consts() {
        let inner = Code {
            name: String::from("inner"),
            ..Code::default()
        };
        let outer = Code {
            name: String::from("<module>"),
            filename: String::from("m.py"),
            consts: vec![Value::from(inner), Value::None],
            names: vec![String::from("x")],
            ..Code::default()
        };
        let text = dump_code(&outer);
        assert!(text.starts_with("code object <module>\n  file: m.py\n"));
        assert!(text.contains("    0:\n      code object inner\n"));
        assert!(text.contains("    1: None\n"));
        assert!(text.contains("  names: ('x',)\n"));
        assert_eq!(
            repr(&Value::from(outer)),
            "<code object <module>, file \"m.py\", line 0>"
        );
    }
}
