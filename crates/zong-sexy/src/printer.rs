//! Canonical rendering of Sexy values.
//!
//! `parse(format(v))` reproduces `v` for every value free of pattern-only
//! constructs; the matcher's failure messages also render subtrees with
//! this formatter.

use std::fmt::Write;

use crate::value::{Value, ValueKind};

/// Render a value in canonical form.
#[must_use]
pub fn format(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    if let Some(label) = &value.label {
        let _ = write!(out, "#{label}=");
    }
    match &value.kind {
        ValueKind::Symbol(text) => out.push_str(text),
        ValueKind::Str(text) => {
            out.push('"');
            for ch in text.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    other => out.push(other),
                }
            }
            out.push('"');
        }
        ValueKind::Integer(text) => out.push_str(text),
        ValueKind::Ellipsis => out.push_str("..."),
        ValueKind::LabelRef(name) => {
            let _ = write!(out, "#{name}#");
        }
        ValueKind::List { items, meta } => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_value(out, item);
            }
            if !meta.is_empty() {
                if !items.is_empty() {
                    out.push(' ');
                }
                out.push_str("^{");
                for (i, (key, entry)) in meta.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key}: ");
                    write_value(out, entry);
                }
                out.push('}');
            }
            out.push(')');
        }
        ValueKind::Map { entries, rest } => {
            out.push('{');
            for (i, (key, entry)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{key}: ");
                write_value(out, entry);
            }
            if *rest {
                if !entries.is_empty() {
                    out.push_str(", ");
                }
                out.push_str("...");
            }
            out.push('}');
        }
        ValueKind::Set { items, rest } => {
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_value(out, item);
            }
            if *rest {
                if !items.is_empty() {
                    out.push(' ');
                }
                out.push_str("...");
            }
            out.push('}');
        }
        ValueKind::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_value(out, item);
            }
            out.push(']');
        }
    }
}
