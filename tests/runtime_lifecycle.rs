//! End-to-end use of the C surface the way generated code drives it

use std::ffi::{CStr, CString};
use wycc::builtins::{wycc_box_int, wycc_box_str, wycc_list_add, wycc_list_new, wycc_list_size, wycc_obj_str};
use wycc::debug::{capture_output, wyil_debug_obj, wyil_debug_str};
use wycc::errors::{wycc_clear_error, wycc_last_error};
use wycc::{wycc_deref_box, wycc_incr_box, wycc_main, wycc_shutdown};

#[test]
fn test_program_lifecycle() {
    wycc_main();
    wycc_main();
    assert!(wycc::config().is_some());
    wycc_clear_error();

    let greeting = CString::new("Hello World").unwrap();
    let newline = CString::new("\n").unwrap();
    let out = capture_output(|| unsafe {
        // x = "Hello World"; debug x; debug "\n"
        let x = wycc_box_str(greeting.as_ptr());
        wyil_debug_obj(x);
        wyil_debug_str(newline.as_ptr());

        // xs = [1, 2, x]
        let xs = wycc_list_new(3);
        wycc_list_add(xs, wycc_box_int(1));
        wycc_list_add(xs, wycc_box_int(2));
        wycc_list_add(xs, wycc_incr_box(x));
        assert_eq!(wycc_list_size(xs), 3);
        wyil_debug_obj(xs);

        let text = wycc_obj_str(xs);
        assert_eq!(
            CStr::from_ptr((*text).ptr.cast::<std::ffi::c_char>()).to_str().unwrap(),
            "[1, 2, \"Hello World\"]"
        );

        // Scope exit: the list still holds `x`
        assert_eq!(wycc_deref_box(x, 1), x);
        assert!(wycc_deref_box(xs, 1).is_null());
        assert!(wycc_deref_box(text, 1).is_null());
    });

    assert_eq!(out, "Hello World\n[1, 2, \"Hello World\"]");
    assert_eq!(wycc_last_error(), 0);

    if wycc::object::is_tracking() {
        assert_eq!(wycc_shutdown(), 0);
    }
}
