//! Record boxes - named fields, rendered in name order

use std::ffi::{c_char, c_int, CStr};
use std::ptr;

use crate::errors::{or_record, record, RuntimeError, RuntimeResult};
use crate::object::{alloc, check_insert, record_fields_mut, release, Fields, Payload, WyccObj};

/// Box a record with no fields
pub fn record_new() -> *mut WyccObj {
    alloc(Payload::Record(Fields::new()))
}

/// Bind `field` to `item`, releasing any previous value
///
/// # Safety
/// `rec`, `item` and everything reachable from them must satisfy
/// `object::view`.
pub unsafe fn record_put(rec: *mut WyccObj, field: &str, item: *mut WyccObj) -> RuntimeResult<()> {
    check_insert(rec, item, "wycc_record_put")?;
    let fields = record_fields_mut(rec, "wycc_record_put")?;
    if let Some(previous) = fields.insert(field.to_owned(), item) {
        release(previous, true)?;
    }
    Ok(())
}

/// Borrow the value bound to `field` (no reference is added)
///
/// # Safety
/// `rec` must satisfy the contract of `object::view`.
pub unsafe fn record_get(rec: *mut WyccObj, field: &str) -> RuntimeResult<*mut WyccObj> {
    record_fields_mut(rec, "wycc_record_get")?
        .get(field)
        .copied()
        .ok_or_else(|| RuntimeError::UnknownField(field.to_owned()))
}

unsafe fn field_name<'a>(field: *const c_char, op: &'static str) -> RuntimeResult<std::borrow::Cow<'a, str>> {
    if field.is_null() {
        return Err(RuntimeError::NullPointer { op });
    }
    Ok(CStr::from_ptr(field).to_string_lossy())
}

#[no_mangle]
pub extern "C" fn wycc_record_new() -> *mut WyccObj {
    record_new()
}

/// Bind a NUL-terminated field name; returns 0 on success, the error code otherwise
#[no_mangle]
pub unsafe extern "C" fn wycc_record_put(rec: *mut WyccObj, field: *const c_char, item: *mut WyccObj) -> c_int {
    let result = field_name(field, "wycc_record_put").and_then(|name| record_put(rec, &name, item));
    match result {
        Ok(()) => 0,
        Err(err) => {
            let code = err.code();
            record(err);
            code
        }
    }
}

/// Borrowed field value, null on error
#[no_mangle]
pub unsafe extern "C" fn wycc_record_get(rec: *mut WyccObj, field: *const c_char) -> *mut WyccObj {
    let item = field_name(field, "wycc_record_get").and_then(|name| record_get(rec, &name));
    or_record(item, ptr::null_mut())
}
