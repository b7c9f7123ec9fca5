//! Canonical fingerprinting of mirror inputs.
//!
//! The fingerprint identifies everything the mirror tables are derived from:
//!
//! ```text
//! fingerprint = hex(BLAKE3(canonical_json({ "config": .., "skeleton": .. })))
//! ```
//!
//! Canonical JSON sorts object keys and emits no whitespace, so the same
//! skeleton and configuration always produce the same 64-character string.
//! The `enable` flag is not part of the fingerprint: toggling it never changes
//! the tables.

use serde_json::{json, Value};

use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::skeleton::Skeleton;

/// Computes the fingerprint of a skeleton and configuration.
///
/// # Example
/// ```
/// use bonemirror_core::{fingerprint, MirrorConfig, Skeleton, Transform};
///
/// let skeleton = Skeleton::builder().root("root", Transform::IDENTITY).build().unwrap();
/// let hash = fingerprint(&skeleton, &MirrorConfig::default()).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn fingerprint(skeleton: &Skeleton, config: &MirrorConfig) -> Result<String, MirrorError> {
    let mut config = serde_json::to_value(config)?;
    if let Value::Object(fields) = &mut config {
        fields.remove("enable");
    }
    let value = json!({
        "config": config,
        "skeleton": serde_json::to_value(skeleton)?,
    });
    Ok(canonical_value_hash(&value))
}

/// BLAKE3 of the canonical encoding of a JSON value, as lowercase hex.
pub fn canonical_value_hash(value: &Value) -> String {
    blake3::hash(canonicalize_json(value).as_bytes())
        .to_hex()
        .to_string()
}

/// Encodes a JSON value with sorted keys and no whitespace.
pub fn canonicalize_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, field)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(field, out);
            }
            out.push('}');
        }
    }
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
