//! Built-in operations - boxing constructors and accessors for generated code
//!
//! Each family lives in its own module and exposes both a safe Rust API
//! and `extern "C"` entry points.

mod compare;
mod list;
mod record;
mod scalar;
mod set;
mod string;
mod tuple;

#[cfg(test)]
mod tests;

pub use compare::{contains, equals, wycc_equals};
pub use list::{list_add, list_get, list_new, wycc_list_add, wycc_list_get, wycc_list_new, wycc_list_size};
pub use scalar::{
    box_bool, box_byte, box_char, box_int, box_null, bool_value, int_value, wycc_bool_value, wycc_box_bool,
    wycc_box_byte, wycc_box_char, wycc_box_int, wycc_box_null, wycc_int_value,
};
pub use record::{record_get, record_new, record_put, wycc_record_get, wycc_record_new, wycc_record_put};
pub use set::{set_add, set_new, wycc_set_add, wycc_set_new, wycc_set_size};
pub use string::{box_str, obj_str, wycc_box_str, wycc_obj_str, wycc_str_value};
pub use tuple::{tuple_from, tuple_get, tuple_new, tuple_set, wycc_tuple_get, wycc_tuple_new, wycc_tuple_set};

use crate::errors::RuntimeError;
use crate::object::TypeTag;

pub(crate) fn mismatch(expected: TypeTag, found: TypeTag) -> RuntimeError {
    RuntimeError::TypeMismatch {
        expected: expected.name(),
        found: found.name(),
    }
}
