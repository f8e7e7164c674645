//! Set boxes - unordered collections of pairwise unequal values

use std::ffi::c_int;

use super::compare::contains;
use crate::errors::{or_record, record, RuntimeResult};
use crate::object::{alloc, check_insert, items_mut, release, Payload, TypeTag, WyccObj};

/// Box an empty set
pub fn set_new() -> *mut WyccObj {
    alloc(Payload::Set(Vec::new()))
}

/// Insert `item`, transferring the caller's reference to the set
///
/// Returns `false` when an equal element was already present; the
/// reference to `item` is then dropped.
///
/// # Safety
/// `set`, `item` and everything reachable from them must satisfy
/// `object::view`.
pub unsafe fn set_add(set: *mut WyccObj, item: *mut WyccObj) -> RuntimeResult<bool> {
    check_insert(set, item, "wycc_set_add")?;
    let items = items_mut(set, TypeTag::Set, "wycc_set_add")?;
    if contains(items, item)? {
        release(item, true)?;
        return Ok(false);
    }
    items.push(item);
    Ok(true)
}

#[no_mangle]
pub extern "C" fn wycc_set_new() -> *mut WyccObj {
    set_new()
}

/// Insert `item`; returns 1 if added, 0 if an equal element was present,
/// the negated error code on failure
#[no_mangle]
pub unsafe extern "C" fn wycc_set_add(set: *mut WyccObj, item: *mut WyccObj) -> c_int {
    match set_add(set, item) {
        Ok(added) => c_int::from(added),
        Err(err) => {
            let code = err.code();
            record(err);
            -code
        }
    }
}

/// Number of elements, -1 on error
#[no_mangle]
pub unsafe extern "C" fn wycc_set_size(set: *mut WyccObj) -> c_int {
    let size = items_mut(set, TypeTag::Set, "wycc_set_size")
        .map(|items| c_int::try_from(items.len()).unwrap_or(c_int::MAX));
    or_record(size, -1)
}
