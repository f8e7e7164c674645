//! Tests for builtin boxing operations

use super::*;
use crate::errors::{take_last_error, wycc_clear_error, RuntimeError};
use crate::object::{view, wycc_deref_box, wycc_incr_box, Value};
use std::ffi::{CStr, CString};
use std::ptr;

#[test]
fn test_box_str_copies_input() {
    let mut text = CString::new("hello").unwrap().into_bytes_with_nul();
    let obj = unsafe { wycc_box_str(text.as_ptr().cast()) };
    text[0] = b'j';

    unsafe {
        assert_eq!((*obj).cnt, 1);
        assert_eq!((*obj).typ, crate::object::TypeTag::String as i32);
        assert_eq!(CStr::from_ptr(wycc_str_value(obj)).to_str().unwrap(), "hello");
        assert!(wycc_deref_box(obj, 1).is_null());
    }
}

#[test]
fn test_box_str_null_input() {
    wycc_clear_error();
    assert!(unsafe { wycc_box_str(ptr::null()) }.is_null());
    assert_eq!(
        take_last_error(),
        Some(RuntimeError::NullPointer { op: "wycc_box_str" })
    );
}

#[test]
fn test_box_str_invalid_utf8_replaced() {
    let bytes = [b'a', 0xFF, b'b', 0];
    let obj = unsafe { wycc_box_str(bytes.as_ptr().cast()) };
    unsafe {
        assert_eq!(CStr::from_ptr(wycc_str_value(obj)).to_str().unwrap(), "a\u{FFFD}b");
        wycc_deref_box(obj, 1);
    }
}

#[test]
fn test_rust_box_str_truncates_at_nul() {
    let obj = box_str("left\0right");
    unsafe {
        assert_eq!(view(obj), Ok(Value::Str(CStr::from_bytes_with_nul(b"left\0").unwrap())));
        wycc_deref_box(obj, 1);
    }
}

#[test]
fn test_scalar_boxes() {
    unsafe {
        let t = wycc_box_bool(5);
        assert_eq!(wycc_bool_value(t), 1);
        wycc_deref_box(t, 1);

        let i = wycc_box_int(-40);
        assert_eq!(wycc_int_value(i), -40);
        wycc_deref_box(i, 1);

        let b = wycc_box_byte(0xA5);
        assert_eq!(view(b), Ok(Value::Byte(0xA5)));
        wycc_deref_box(b, 1);

        let n = wycc_box_null();
        assert_eq!(view(n), Ok(Value::Null));
        wycc_deref_box(n, 1);
    }
}

#[test]
fn test_box_char_rejects_surrogate() {
    wycc_clear_error();
    assert!(wycc_box_char(0xD800).is_null());
    assert_eq!(take_last_error(), Some(RuntimeError::InvalidChar(0xD800)));

    let c = wycc_box_char('λ' as u32);
    unsafe {
        assert_eq!(view(c), Ok(Value::Char('λ')));
        wycc_deref_box(c, 1);
    }
}

#[test]
fn test_unbox_mismatch() {
    wycc_clear_error();
    let obj = box_str("7");
    unsafe {
        assert_eq!(wycc_int_value(obj), 0);
        assert_eq!(
            take_last_error(),
            Some(RuntimeError::TypeMismatch {
                expected: "int",
                found: "string"
            })
        );
        let int = wycc_box_int(1);
        assert!(wycc_str_value(int).is_null());
        wycc_deref_box(int, 1);
        wycc_deref_box(obj, 1);
    }
}

#[test]
fn test_list_operations() {
    wycc_clear_error();
    unsafe {
        let list = wycc_list_new(2);
        assert_eq!(wycc_list_size(list), 0);

        assert_eq!(wycc_list_add(list, wycc_box_int(10)), 0);
        assert_eq!(wycc_list_add(list, box_str("ten")), 0);
        assert_eq!(wycc_list_size(list), 2);

        assert_eq!(wycc_int_value(wycc_list_get(list, 0)), 10);
        assert!(wycc_list_get(list, 2).is_null());
        assert_eq!(
            take_last_error(),
            Some(RuntimeError::IndexOutOfBounds { index: 2, length: 2 })
        );
        assert!(wycc_list_get(list, -1).is_null());

        assert!(wycc_deref_box(list, 1).is_null());
    }
}

#[test]
fn test_list_add_rejects_null_and_non_list() {
    wycc_clear_error();
    unsafe {
        let list = list_new(0);
        assert_eq!(wycc_list_add(list, ptr::null_mut()), 1);

        let not_list = box_int(0);
        let item = box_int(1);
        assert_eq!(wycc_list_add(not_list, item), 5);
        assert_eq!(wycc_list_size(not_list), -1);

        wycc_deref_box(item, 1);
        wycc_deref_box(not_list, 1);
        wycc_deref_box(list, 1);
    }
}

#[test]
fn test_obj_str_renders_value() {
    unsafe {
        let list = list_new(0);
        list_add(list, box_bool(true)).unwrap();
        list_add(list, box_str("a")).unwrap();

        let text = wycc_obj_str(list);
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "[true, \"a\"]");

        wycc_deref_box(text, 1);
        wycc_deref_box(list, 1);
    }
}

#[test]
fn test_list_rejects_itself() {
    wycc_clear_error();
    unsafe {
        let xs = wycc_list_new(1);
        assert_eq!(wycc_list_add(xs, wycc_incr_box(xs)), 11);
        assert!(matches!(take_last_error(), Some(RuntimeError::CyclicReference { .. })));

        // The rejected reference stays with the caller
        assert_eq!((*xs).cnt, 2);
        let text = wycc_obj_str(xs);
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "[]");

        wycc_deref_box(text, 1);
        assert_eq!(wycc_deref_box(xs, 1), xs);
        assert!(wycc_deref_box(xs, 1).is_null());
    }
}

#[test]
fn test_containers_reject_indirect_cycles() {
    wycc_clear_error();
    unsafe {
        let xs = list_new(0);
        let ys = list_new(0);
        list_add(xs, wycc_incr_box(ys)).unwrap();

        // xs -> ys, so ys may not take xs
        let shared = wycc_incr_box(xs);
        assert_eq!(wycc_list_add(ys, shared), 11);

        let tup = tuple_new(1);
        list_add(ys, wycc_incr_box(tup)).unwrap();
        assert!(matches!(
            tuple_set(tup, 0, shared),
            Err(RuntimeError::CyclicReference { .. })
        ));

        let rec = record_new();
        record_put(rec, "inner", wycc_incr_box(xs)).unwrap();
        // rec -> xs -> ys -> tup
        assert!(matches!(
            set_add(tup, rec),
            Err(RuntimeError::CyclicReference { .. })
        ));

        let text = obj_str(xs).unwrap();
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "[[(null)]]");
        wycc_deref_box(text, 1);

        wycc_deref_box(rec, 1);
        wycc_deref_box(shared, 1);
        wycc_deref_box(tup, 1);
        wycc_deref_box(ys, 1);
        assert!(wycc_deref_box(xs, 1).is_null());
    }
}

#[test]
fn test_set_keeps_distinct_values() {
    wycc_clear_error();
    unsafe {
        let set = wycc_set_new();
        assert_eq!(wycc_set_add(set, box_int(3)), 1);
        assert_eq!(wycc_set_add(set, box_int(1)), 1);
        assert_eq!(wycc_set_add(set, box_int(3)), 0);
        assert_eq!(wycc_set_size(set), 2);

        let text = obj_str(set).unwrap();
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "{3, 1}");
        wycc_deref_box(text, 1);

        assert_eq!(wycc_set_add(set, ptr::null_mut()), -1);
        let text = box_str("s");
        assert_eq!(wycc_set_size(text), -1);
        wycc_deref_box(text, 1);
        wycc_deref_box(set, 1);
    }
}

#[test]
fn test_equals_is_structural() {
    unsafe {
        let a = set_new();
        set_add(a, box_int(1)).unwrap();
        set_add(a, box_str("b")).unwrap();
        let b = set_new();
        set_add(b, box_str("b")).unwrap();
        set_add(b, box_int(1)).unwrap();
        assert_eq!(wycc_equals(a, b), 1);

        let xs = list_new(0);
        list_add(xs, box_int(1)).unwrap();
        let ys = list_new(0);
        list_add(ys, box_int(1)).unwrap();
        assert_eq!(wycc_equals(xs, ys), 1);
        list_add(ys, box_int(2)).unwrap();
        assert_eq!(wycc_equals(xs, ys), 0);

        // A list and a tuple with the same elements are different values
        let tup = tuple_from(vec![box_int(1)]);
        assert_eq!(wycc_equals(xs, tup), 0);

        let r1 = record_new();
        record_put(r1, "f", box_int(1)).unwrap();
        let r2 = record_new();
        record_put(r2, "f", box_int(1)).unwrap();
        assert!(equals(r1, r2).unwrap());
        record_put(r2, "f", box_int(2)).unwrap();
        assert!(!equals(r1, r2).unwrap());

        for obj in [a, b, xs, ys, tup, r1, r2] {
            assert!(wycc_deref_box(obj, 1).is_null());
        }
    }
}

#[test]
fn test_tuple_operations() {
    wycc_clear_error();
    unsafe {
        let tup = wycc_tuple_new(2);
        assert_eq!(view(wycc_tuple_get(tup, 1)), Ok(Value::Null));

        assert_eq!(wycc_tuple_set(tup, 0, box_int(4)), 0);
        assert_eq!(wycc_tuple_set(tup, 1, box_str("x")), 0);
        assert_eq!(wycc_int_value(wycc_tuple_get(tup, 0)), 4);

        let item = box_int(9);
        assert_eq!(wycc_tuple_set(tup, 2, item), 7);
        assert!(wycc_tuple_get(tup, -1).is_null());
        assert_eq!(
            take_last_error(),
            Some(RuntimeError::IndexOutOfBounds {
                index: usize::MAX,
                length: 2
            })
        );

        let text = obj_str(tup).unwrap();
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "(4, \"x\")");

        wycc_deref_box(text, 1);
        wycc_deref_box(item, 1);
        assert!(wycc_deref_box(tup, 1).is_null());
    }
}

#[test]
fn test_record_operations() {
    wycc_clear_error();
    let x = CString::new("x").unwrap();
    let y = CString::new("y").unwrap();
    unsafe {
        let rec = wycc_record_new();
        assert_eq!(wycc_record_put(rec, y.as_ptr(), box_bool(false)), 0);
        assert_eq!(wycc_record_put(rec, x.as_ptr(), box_int(1)), 0);
        assert_eq!(wycc_record_put(rec, x.as_ptr(), box_int(2)), 0);
        assert_eq!(wycc_int_value(wycc_record_get(rec, x.as_ptr())), 2);

        assert!(record_get(rec, "z").is_err());
        assert!(wycc_record_get(rec, ptr::null()).is_null());
        assert_eq!(take_last_error(), Some(RuntimeError::NullPointer { op: "wycc_record_get" }));

        let text = obj_str(rec).unwrap();
        assert_eq!(CStr::from_ptr(wycc_str_value(text)).to_str().unwrap(), "{x: 2, y: false}");

        wycc_deref_box(text, 1);
        assert!(wycc_deref_box(rec, 1).is_null());
    }
}

#[test]
fn test_deep_release_drops_element_references() {
    unsafe {
        let shared = box_int(5);
        let set = set_new();
        set_add(set, wycc_incr_box(shared)).unwrap();
        let tup = tuple_from(vec![wycc_incr_box(shared)]);
        let rec = record_new();
        record_put(rec, "v", wycc_incr_box(shared)).unwrap();
        assert_eq!((*shared).cnt, 4);

        for container in [set, tup, rec] {
            assert!(wycc_deref_box(container, 1).is_null());
        }
        assert_eq!((*shared).cnt, 1);

        // A shallow release leaves the elements alone
        let shallow = tuple_from(vec![wycc_incr_box(shared)]);
        assert!(wycc_deref_box(shallow, 0).is_null());
        assert_eq!((*shared).cnt, 2);

        wycc_deref_box(shared, 1);
        assert!(wycc_deref_box(shared, 1).is_null());
    }
}

#[test]
fn test_last_error_message_after_failed_call() {
    wycc_clear_error();
    assert!(unsafe { wycc_box_str(ptr::null()) }.is_null());
    let message = unsafe { CStr::from_ptr(crate::errors::wycc_last_error_message()) };
    assert_eq!(message.to_str().unwrap(), "null pointer passed to wycc_box_str");
    assert_eq!(crate::errors::wycc_last_error(), 1);
}
