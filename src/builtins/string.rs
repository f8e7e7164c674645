//! String boxes - NUL-terminated UTF-8 owned by the object
//!
//! The payload pointer is the C string itself, so generated code can read
//! `(char*)obj->ptr` without a call.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use super::mismatch;
use crate::errors::{or_record, RuntimeError, RuntimeResult};
use crate::format::render_top;
use crate::object::{alloc, view, Payload, TypeTag, Value, WyccObj};

/// Copy `text` into a C string, truncating at the first NUL
fn c_string(text: &str) -> CString {
    let end = text.find('\0').unwrap_or(text.len());
    CString::new(&text[..end]).unwrap_or_default()
}

/// Box a copy of `text`
pub fn box_str(text: &str) -> *mut WyccObj {
    alloc(Payload::Str(c_string(text)))
}

/// Box the rendering of `obj` as a new string
///
/// # Safety
/// `obj` must satisfy the contract of `object::view`.
pub unsafe fn obj_str(obj: *const WyccObj) -> RuntimeResult<*mut WyccObj> {
    Ok(box_str(&render_top(obj)?))
}

/// Box a copy of the C string `text`
///
/// The caller keeps ownership of `text`. Invalid UTF-8 sequences are
/// replaced with U+FFFD.
#[no_mangle]
pub unsafe extern "C" fn wycc_box_str(text: *const c_char) -> *mut WyccObj {
    if text.is_null() {
        crate::errors::record(RuntimeError::NullPointer { op: "wycc_box_str" });
        return ptr::null_mut();
    }
    box_str(&CStr::from_ptr(text).to_string_lossy())
}

/// New string box holding the rendering of `obj`
#[no_mangle]
pub unsafe extern "C" fn wycc_obj_str(obj: *const WyccObj) -> *mut WyccObj {
    or_record(obj_str(obj), ptr::null_mut())
}

/// Borrow the text of a string box (valid while the box is alive)
#[no_mangle]
pub unsafe extern "C" fn wycc_str_value(obj: *const WyccObj) -> *const c_char {
    let text = view(obj).and_then(|value| match value {
        Value::Str(text) => Ok(text.as_ptr()),
        other => Err(mismatch(TypeTag::String, other.tag())),
    });
    or_record(text, ptr::null())
}
