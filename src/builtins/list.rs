//! List boxes - growable sequences owning one reference per element

use std::ffi::c_int;
use std::ptr;

use crate::errors::{or_record, RuntimeError, RuntimeResult};
use crate::object::{alloc, check_insert, list_items_mut, Payload, WyccObj};

/// Box an empty list
pub fn list_new(capacity: usize) -> *mut WyccObj {
    alloc(Payload::List(Vec::with_capacity(capacity)))
}

/// Append `item`, transferring the caller's reference to the list
///
/// Fails with `CyclicReference` if `item` is the list itself or
/// (transitively) contains it.
///
/// # Safety
/// `list` and `item` must satisfy the contract of `object::view`.
pub unsafe fn list_add(list: *mut WyccObj, item: *mut WyccObj) -> RuntimeResult<()> {
    check_insert(list, item, "wycc_list_add")?;
    list_items_mut(list, "wycc_list_add")?.push(item);
    Ok(())
}

/// Borrow element `index` (no reference is added)
///
/// # Safety
/// `list` must satisfy the contract of `object::view`.
pub unsafe fn list_get(list: *mut WyccObj, index: usize) -> RuntimeResult<*mut WyccObj> {
    let items = list_items_mut(list, "wycc_list_get")?;
    items
        .get(index)
        .copied()
        .ok_or(RuntimeError::IndexOutOfBounds {
            index,
            length: items.len(),
        })
}

/// New empty list; negative capacities are treated as zero
#[no_mangle]
pub extern "C" fn wycc_list_new(capacity: c_int) -> *mut WyccObj {
    list_new(usize::try_from(capacity).unwrap_or(0))
}

/// Append `item`; returns 0 on success, the error code otherwise
#[no_mangle]
pub unsafe extern "C" fn wycc_list_add(list: *mut WyccObj, item: *mut WyccObj) -> c_int {
    match list_add(list, item) {
        Ok(()) => 0,
        Err(err) => {
            let code = err.code();
            crate::errors::record(err);
            code
        }
    }
}

/// Number of elements, -1 on error
#[no_mangle]
pub unsafe extern "C" fn wycc_list_size(list: *mut WyccObj) -> c_int {
    let size = list_items_mut(list, "wycc_list_size")
        .map(|items| c_int::try_from(items.len()).unwrap_or(c_int::MAX));
    or_record(size, -1)
}

/// Borrowed element `index`, null on error
#[no_mangle]
pub unsafe extern "C" fn wycc_list_get(list: *mut WyccObj, index: c_int) -> *mut WyccObj {
    // Negative indices are never in bounds
    let item = list_get(list, usize::try_from(index).unwrap_or(usize::MAX));
    or_record(item, ptr::null_mut())
}
