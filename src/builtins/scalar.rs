//! Scalar boxes - null, bool, byte, char and int

use std::ffi::c_int;
use std::ptr;

use super::mismatch;
use crate::errors::{or_record, RuntimeError, RuntimeResult};
use crate::object::{alloc, view, Payload, TypeTag, Value, WyccObj};

pub fn box_null() -> *mut WyccObj {
    alloc(Payload::Null)
}

pub fn box_bool(value: bool) -> *mut WyccObj {
    alloc(Payload::Bool(value))
}

pub fn box_byte(value: u8) -> *mut WyccObj {
    alloc(Payload::Byte(value))
}

/// Box a unicode scalar given as a code point
pub fn box_char(code: u32) -> RuntimeResult<*mut WyccObj> {
    let c = char::from_u32(code).ok_or(RuntimeError::InvalidChar(code))?;
    Ok(alloc(Payload::Char(c)))
}

pub fn box_int(value: i64) -> *mut WyccObj {
    alloc(Payload::Int(value))
}

/// Read a bool box
///
/// # Safety
/// `obj` must satisfy the contract of `object::view`.
pub unsafe fn bool_value(obj: *const WyccObj) -> RuntimeResult<bool> {
    match view(obj)? {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(TypeTag::Bool, other.tag())),
    }
}

/// Read an int box
///
/// # Safety
/// `obj` must satisfy the contract of `object::view`.
pub unsafe fn int_value(obj: *const WyccObj) -> RuntimeResult<i64> {
    match view(obj)? {
        Value::Int(i) => Ok(i),
        other => Err(mismatch(TypeTag::Int, other.tag())),
    }
}

#[no_mangle]
pub extern "C" fn wycc_box_null() -> *mut WyccObj {
    box_null()
}

#[no_mangle]
pub extern "C" fn wycc_box_bool(value: c_int) -> *mut WyccObj {
    box_bool(value != 0)
}

#[no_mangle]
pub extern "C" fn wycc_box_byte(value: u8) -> *mut WyccObj {
    box_byte(value)
}

/// Box a char; null for surrogates and values above U+10FFFF
#[no_mangle]
pub extern "C" fn wycc_box_char(code: u32) -> *mut WyccObj {
    or_record(box_char(code), ptr::null_mut())
}

#[no_mangle]
pub extern "C" fn wycc_box_int(value: i64) -> *mut WyccObj {
    box_int(value)
}

/// 1 for true, 0 for false or on error
#[no_mangle]
pub unsafe extern "C" fn wycc_bool_value(obj: *const WyccObj) -> c_int {
    or_record(bool_value(obj).map(c_int::from), 0)
}

/// Integer payload, 0 on error
#[no_mangle]
pub unsafe extern "C" fn wycc_int_value(obj: *const WyccObj) -> i64 {
    or_record(int_value(obj), 0)
}
