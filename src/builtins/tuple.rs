//! Tuple boxes - fixed-arity sequences
//!
//! A new tuple starts with every slot holding `null`; generated code
//! fills the slots with `wycc_tuple_set`.

use std::ffi::c_int;
use std::ptr;

use super::scalar::box_null;
use crate::errors::{or_record, record, RuntimeError, RuntimeResult};
use crate::object::{alloc, check_insert, items_mut, release, Payload, TypeTag, WyccObj};

/// Box a tuple of `arity` null slots
pub fn tuple_new(arity: usize) -> *mut WyccObj {
    alloc(Payload::Tuple((0..arity).map(|_| box_null()).collect()))
}

/// Box a tuple from owned element references
pub fn tuple_from(items: Vec<*mut WyccObj>) -> *mut WyccObj {
    alloc(Payload::Tuple(items))
}

/// Store `item` in slot `index`, releasing the previous occupant
///
/// # Safety
/// `tuple`, `item` and everything reachable from them must satisfy
/// `object::view`.
pub unsafe fn tuple_set(tuple: *mut WyccObj, index: usize, item: *mut WyccObj) -> RuntimeResult<()> {
    check_insert(tuple, item, "wycc_tuple_set")?;
    let items = items_mut(tuple, TypeTag::Tuple, "wycc_tuple_set")?;
    let length = items.len();
    let slot = items
        .get_mut(index)
        .ok_or(RuntimeError::IndexOutOfBounds { index, length })?;
    let previous = std::mem::replace(slot, item);
    release(previous, true)?;
    Ok(())
}

/// Borrow slot `index` (no reference is added)
///
/// # Safety
/// `tuple` must satisfy the contract of `object::view`.
pub unsafe fn tuple_get(tuple: *mut WyccObj, index: usize) -> RuntimeResult<*mut WyccObj> {
    let items = items_mut(tuple, TypeTag::Tuple, "wycc_tuple_get")?;
    items
        .get(index)
        .copied()
        .ok_or(RuntimeError::IndexOutOfBounds {
            index,
            length: items.len(),
        })
}

/// New tuple of `arity` null slots; negative arities are treated as zero
#[no_mangle]
pub extern "C" fn wycc_tuple_new(arity: c_int) -> *mut WyccObj {
    tuple_new(usize::try_from(arity).unwrap_or(0))
}

/// Fill slot `index`; returns 0 on success, the error code otherwise
#[no_mangle]
pub unsafe extern "C" fn wycc_tuple_set(tuple: *mut WyccObj, index: c_int, item: *mut WyccObj) -> c_int {
    match tuple_set(tuple, usize::try_from(index).unwrap_or(usize::MAX), item) {
        Ok(()) => 0,
        Err(err) => {
            let code = err.code();
            record(err);
            code
        }
    }
}

/// Borrowed slot `index`, null on error
#[no_mangle]
pub unsafe extern "C" fn wycc_tuple_get(tuple: *mut WyccObj, index: c_int) -> *mut WyccObj {
    // Negative indices are never in bounds
    let item = tuple_get(tuple, usize::try_from(index).unwrap_or(usize::MAX));
    or_record(item, ptr::null_mut())
}
