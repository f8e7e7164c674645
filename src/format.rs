//! Textual rendering of boxed values in Whiley notation

use std::fmt::Write;

use crate::errors::RuntimeResult;
use crate::object::{view, Value, WyccObj};

/// Render `obj` as it appears at the top level of debug output
///
/// Top-level strings are written raw; everything else is quoted.
///
/// # Safety
/// `obj` must satisfy the contract of `object::view`, as must every
/// object reachable from it. Containers never hold themselves (insertion
/// rejects cycles), so rendering terminates.
pub unsafe fn render_top(obj: *const WyccObj) -> RuntimeResult<String> {
    match view(obj)? {
        Value::Str(text) => Ok(text.to_string_lossy().into_owned()),
        value => {
            let mut out = String::new();
            write_value(&mut out, value)?;
            Ok(out)
        }
    }
}

/// Render `obj` in nested form (strings quoted)
///
/// # Safety
/// See `render_top`.
pub unsafe fn render(obj: *const WyccObj) -> RuntimeResult<String> {
    let mut out = String::new();
    write_value(&mut out, view(obj)?)?;
    Ok(out)
}

unsafe fn write_value(out: &mut String, value: Value<'_>) -> RuntimeResult<()> {
    // Writing into a String cannot fail
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
        Value::Byte(b) => {
            let _ = write!(out, "{b:08b}b");
        }
        Value::Char(c) => {
            let _ = write!(out, "'{}'", c.escape_default());
        }
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Str(text) => {
            let _ = write!(out, "\"{}\"", text.to_string_lossy().escape_default());
        }
        Value::List(items) => write_items(out, '[', items, ']')?,
        Value::Set(items) => write_items(out, '{', items, '}')?,
        Value::Tuple(items) => write_items(out, '(', items, ')')?,
        Value::Record(fields) => {
            out.push('{');
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                write_value(out, view(*item)?)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

unsafe fn write_items(out: &mut String, open: char, items: &[*mut WyccObj], close: char) -> RuntimeResult<()> {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_value(out, view(*item)?)?;
    }
    out.push(close);
    Ok(())
}
