//! Reference counting - C API for taking and dropping references
//!
//! `cnt` lives inside the C-visible struct, so updates are plain
//! (non-atomic) writes owned by the calling thread.

use std::ffi::c_int;
use std::ptr;

use super::{checked_tag, destroy, WyccObj};
use crate::errors::{or_record, RuntimeError, RuntimeResult};

/// Add one reference to `obj`
///
/// # Safety
/// See `checked_tag`.
pub unsafe fn retain(obj: *mut WyccObj) -> RuntimeResult<()> {
    checked_tag(obj, "wycc_incr_box")?;
    let count = (*obj).cnt;
    if count <= 0 {
        return Err(RuntimeError::RefcountUnderflow {
            address: obj as usize,
            count,
        });
    }

    (*obj).cnt = count.checked_add(1).ok_or(RuntimeError::RefcountOverflow {
        address: obj as usize,
    })?;
    Ok(())
}

/// Drop one reference to `obj`, freeing it at zero
///
/// Returns `true` when the object was freed. With `deep`, a freed
/// container also drops the reference it holds to each element.
///
/// # Safety
/// See `checked_tag`.
pub unsafe fn release(obj: *mut WyccObj, deep: bool) -> RuntimeResult<bool> {
    let tag = checked_tag(obj, "wycc_deref_box")?;
    let count = (*obj).cnt;
    if count <= 0 {
        return Err(RuntimeError::RefcountUnderflow {
            address: obj as usize,
            count,
        });
    }

    if count > 1 {
        (*obj).cnt = count - 1;
        return Ok(false);
    }

    (*obj).cnt = 0;
    destroy(obj, tag, deep);
    Ok(true)
}

/// Increment the reference count and return the same pointer
#[no_mangle]
pub unsafe extern "C" fn wycc_incr_box(obj: *mut WyccObj) -> *mut WyccObj {
    or_record(retain(obj).map(|()| obj), ptr::null_mut())
}

/// Drop one reference to `itm`
///
/// Returns `itm` while it is still referenced and null once it has been
/// freed (or on error). A non-zero `flg` releases the elements of a freed
/// container as well; zero frees the container only.
#[no_mangle]
pub unsafe extern "C" fn wycc_deref_box(itm: *mut WyccObj, flg: c_int) -> *mut WyccObj {
    match release(itm, flg != 0) {
        Ok(false) => itm,
        Ok(true) => ptr::null_mut(),
        Err(err) => {
            crate::errors::record(err);
            ptr::null_mut()
        }
    }
}
