//! Structural equality - Whiley values compare by content, not identity

use std::ffi::c_int;

use crate::errors::{or_record, RuntimeResult};
use crate::object::{view, Value, WyccObj};

/// Whether `a` and `b` hold equal values
///
/// Sets compare without regard to order.
///
/// # Safety
/// `a`, `b` and everything reachable from them must satisfy
/// `object::view`.
pub unsafe fn equals(a: *const WyccObj, b: *const WyccObj) -> RuntimeResult<bool> {
    if a == b {
        view(a)?;
        return Ok(true);
    }

    Ok(match (view(a)?, view(b)?) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Byte(x), Value::Byte(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(xs), Value::List(ys)) | (Value::Tuple(xs), Value::Tuple(ys)) => {
            xs.len() == ys.len() && all_equal(xs, ys)?
        }
        (Value::Set(xs), Value::Set(ys)) => {
            // Set elements are pairwise unequal, so equal sizes plus
            // inclusion one way is enough
            xs.len() == ys.len() && contains_all(ys, xs)?
        }
        (Value::Record(xs), Value::Record(ys)) => {
            xs.len() == ys.len() && xs.keys().eq(ys.keys()) && {
                let left: Vec<_> = xs.values().copied().collect();
                let right: Vec<_> = ys.values().copied().collect();
                all_equal(&left, &right)?
            }
        }
        _ => false,
    })
}

unsafe fn all_equal(xs: &[*mut WyccObj], ys: &[*mut WyccObj]) -> RuntimeResult<bool> {
    for (x, y) in xs.iter().zip(ys) {
        if !equals(*x, *y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether some element of `items` equals `item`
///
/// # Safety
/// See `equals`.
pub unsafe fn contains(items: &[*mut WyccObj], item: *const WyccObj) -> RuntimeResult<bool> {
    for candidate in items {
        if equals(*candidate, item)? {
            return Ok(true);
        }
    }
    Ok(false)
}

unsafe fn contains_all(haystack: &[*mut WyccObj], needles: &[*mut WyccObj]) -> RuntimeResult<bool> {
    for needle in needles {
        if !contains(haystack, *needle)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// 1 when `a` and `b` hold equal values, 0 otherwise or on error
#[no_mangle]
pub unsafe extern "C" fn wycc_equals(a: *const WyccObj, b: *const WyccObj) -> c_int {
    or_record(equals(a, b).map(c_int::from), 0)
}
