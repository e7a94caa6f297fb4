// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = "Code generator for the `marshal_codec` wire tag table.\n\n\
          This is a std-only build tool crate. It is not shipped as part of the codec.\n"]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
struct Spec {
    version: u32,
    revision: u32,
    tags: Vec<TagSpec>,
}

#[derive(Deserialize, Clone)]
struct TagSpec {
    name: String,
    byte: String,
    payload: String,
    doc: Option<String>,
}

fn parse_tag_byte(s: &str) -> Result<u8> {
    let mut chars = s.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        bail!("tag byte '{s}' must be exactly one character");
    };
    if !ch.is_ascii_graphic() || ch == '\'' || ch == '\\' {
        bail!("tag byte '{s}' must be a printable ASCII character other than a quote or backslash");
    }
    Ok(ch as u8)
}

fn payload_rust(payload: &str) -> Result<&'static str> {
    Ok(match payload {
        "empty" => "Payload::Empty",
        "i32" => "Payload::I32",
        "digits" => "Payload::Digits",
        "f64" => "Payload::F64",
        "f64_pair" => "Payload::F64Pair",
        "sized" => "Payload::Sized",
        "counted" => "Payload::Counted",
        "terminated" => "Payload::Terminated",
        "code" => "Payload::Code",
        other => bail!("unknown payload layout '{other}'"),
    })
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i != 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn sort_and_validate_tags(tags: &mut [(u8, TagSpec)]) -> Result<()> {
    tags.sort_by(|(b0, t0), (b1, t1)| b0.cmp(b1).then_with(|| t0.name.cmp(&t1.name)));

    for w in tags.windows(2) {
        let (b0, t0) = &w[0];
        let (b1, t1) = &w[1];
        if b0 == b1 {
            bail!(
                "duplicate tag byte '{}': {} and {}",
                char::from(*b0),
                t0.name,
                t1.name
            );
        }
    }

    let mut names: Vec<&str> = tags.iter().map(|(_, t)| t.name.as_str()).collect();
    names.sort_unstable();
    for w in names.windows(2) {
        if w[0] == w[1] {
            bail!("duplicate tag name '{}'", w[0]);
        }
    }

    for (_, t) in tags.iter() {
        if !t.name.starts_with(|c: char| c.is_ascii_uppercase())
            || !t.name.chars().all(|c| c.is_ascii_alphanumeric())
        {
            bail!("tag name '{}' must be UpperCamelCase", t.name);
        }
    }
    Ok(())
}

fn generate(spec: Spec, src: &Path) -> Result<String> {
    if spec.version != 1 {
        bail!("unsupported tags.json version {}", spec.version);
    }

    let mut tags: Vec<(u8, TagSpec)> = Vec::with_capacity(spec.tags.len());
    for tag in spec.tags {
        let b = parse_tag_byte(&tag.byte)
            .with_context(|| format!("tag {}", tag.name))?;
        tags.push((b, tag));
    }
    sort_and_validate_tags(&mut tags)?;

    let mut out = String::new();
    out.push_str("// Copyright 2026 the Marshal Codec Authors\n");
    out.push_str("// SPDX-License-Identifier: Apache-2.0 OR MIT\n\n");
    let src_name = src
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no file name in {}", src.display()))?;
    out.push_str(&format!(
        "// @generated by marshal_codec_codegen from {src_name}. Do not edit by hand.\n"
    ));
    out.push('\n');

    out.push_str("/// Wire format revision described by this table.\n");
    out.push_str(&format!(
        "pub const TABLE_REVISION: u32 = {};\n\n",
        spec.revision
    ));

    out.push_str("/// A wire tag byte.\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("#[repr(u8)]\n");
    out.push_str("pub enum Tag {\n");
    for (b, t) in &tags {
        if let Some(doc) = &t.doc {
            out.push_str(&format!("    /// {doc}\n"));
        }
        out.push_str(&format!("    {} = b'{}',\n", t.name, char::from(*b)));
    }
    out.push_str("}\n\n");

    out.push_str("impl Tag {\n");
    out.push_str("    /// Every tag, ordered by byte value.\n");
    out.push_str(&format!("    pub const ALL: [Self; {}] = [\n", tags.len()));
    for (_, t) in &tags {
        out.push_str(&format!("        Self::{},\n", t.name));
    }
    out.push_str("    ];\n\n");

    out.push_str("    /// Parses a tag from its byte value.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn from_u8(b: u8) -> Option<Self> {\n");
    out.push_str("        match b {\n");
    for (b, t) in &tags {
        out.push_str(&format!(
            "            b'{}' => Some(Self::{}),\n",
            char::from(*b),
            t.name
        ));
    }
    out.push_str("            _ => None,\n");
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// Returns the payload layout that follows this tag.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn payload(self) -> Payload {\n");
    out.push_str("        match self {\n");
    for (_, t) in &tags {
        let payload = payload_rust(&t.payload).with_context(|| format!("tag {}", t.name))?;
        out.push_str(&format!("            Self::{} => {payload},\n", t.name));
    }
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// Returns a short name for diagnostics.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn name(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for (_, t) in &tags {
        out.push_str(&format!(
            "            Self::{} => \"{}\",\n",
            t.name,
            snake_case(&t.name)
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    Ok(out)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let spec_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("marshal_codec/tags.json"));
    let tags_out_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("marshal_codec/src/tags_gen.rs"));
    if args.next().is_some() {
        bail!("usage: marshal_codec_codegen [tags.json] [tags_out.rs]");
    }

    let json =
        fs::read_to_string(&spec_path).with_context(|| format!("read {}", spec_path.display()))?;
    let spec: Spec =
        serde_json::from_str(&json).with_context(|| format!("parse {}", spec_path.display()))?;

    let rendered = generate(spec, &spec_path)?;

    if let Some(parent) = tags_out_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&tags_out_path, rendered.as_bytes())
        .with_context(|| format!("write {}", tags_out_path.display()))?;
    Ok(())
}
