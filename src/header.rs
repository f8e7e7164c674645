//! C header generation - `wycc_lib.h` for the generated code to include

use std::fmt::Write;

use crate::object::TypeTag;

/// Exported routines, grouped as they appear in the header
const BOOKKEEPING: &[&str] = &[
    "void wycc_main(void);",
    "int wycc_shutdown(void);",
    "wycc_obj* wycc_incr_box(wycc_obj* itm);",
    "wycc_obj* wycc_deref_box(wycc_obj* itm, int flg);",
    "int wycc_last_error(void);",
    "const char* wycc_last_error_message(void);",
    "void wycc_clear_error(void);",
];

const BOXING: &[&str] = &[
    "wycc_obj* wycc_box_null(void);",
    "wycc_obj* wycc_box_bool(int value);",
    "wycc_obj* wycc_box_byte(uint8_t value);",
    "wycc_obj* wycc_box_char(uint32_t code);",
    "wycc_obj* wycc_box_int(int64_t value);",
    "wycc_obj* wycc_box_str(const char* text);",
    "wycc_obj* wycc_obj_str(const wycc_obj* itm);",
    "int wycc_bool_value(const wycc_obj* itm);",
    "int64_t wycc_int_value(const wycc_obj* itm);",
    "const char* wycc_str_value(const wycc_obj* itm);",
    "wycc_obj* wycc_list_new(int capacity);",
    "int wycc_list_add(wycc_obj* lst, wycc_obj* itm);",
    "int wycc_list_size(wycc_obj* lst);",
    "wycc_obj* wycc_list_get(wycc_obj* lst, int idx);",
    "wycc_obj* wycc_set_new(void);",
    "int wycc_set_add(wycc_obj* set, wycc_obj* itm);",
    "int wycc_set_size(wycc_obj* set);",
    "wycc_obj* wycc_tuple_new(int arity);",
    "int wycc_tuple_set(wycc_obj* tup, int idx, wycc_obj* itm);",
    "wycc_obj* wycc_tuple_get(wycc_obj* tup, int idx);",
    "wycc_obj* wycc_record_new(void);",
    "int wycc_record_put(wycc_obj* rec, const char* field, wycc_obj* itm);",
    "wycc_obj* wycc_record_get(wycc_obj* rec, const char* field);",
    "int wycc_equals(const wycc_obj* lhs, const wycc_obj* rhs);",
];

const WYIL: &[&str] = &[
    "void wyil_debug_str(const char* mesg);",
    "void wyil_debug_obj(wycc_obj* ptr);",
];

/// Every prototype in the header
pub fn prototypes() -> impl Iterator<Item = &'static str> {
    BOOKKEEPING.iter().chain(BOXING).chain(WYIL).copied()
}

/// C macro name for a tag, e.g. `Wy_String`
pub fn tag_macro(tag: TypeTag) -> String {
    let name = tag.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("Wy_{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => String::from("Wy_"),
    }
}

/// Render the complete header
pub fn render() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/*");
    let _ = writeln!(out, " * wycc_lib.h");
    let _ = writeln!(out, " *");
    let _ = writeln!(out, " * Support routines for Whiley programs translated into C.");
    let _ = writeln!(out, " * Generated by wycc {}; do not edit.", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, " */");
    let _ = writeln!(out);
    let _ = writeln!(out, "#ifndef WYCC_LIB_H");
    let _ = writeln!(out, "#define WYCC_LIB_H");
    let _ = writeln!(out);
    let _ = writeln!(out, "#include <stdint.h>");
    let _ = writeln!(out);

    for tag in TypeTag::ALL {
        let _ = writeln!(out, "#define {} {}", tag_macro(tag), tag as i32);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "typedef struct Wycc_object {{");
    let _ = writeln!(out, "    int typ;");
    let _ = writeln!(out, "    int cnt;");
    let _ = writeln!(out, "    void* ptr;");
    let _ = writeln!(out, "}} wycc_obj;");

    for (title, group) in [
        ("routines used by wycc for structure and bookkeeping", BOOKKEEPING),
        ("boxing and unboxing", BOXING),
        ("routines to implement wyil operations", WYIL),
    ] {
        let _ = writeln!(out);
        let _ = writeln!(out, "/*\n * {title}\n */");
        for proto in group {
            let _ = writeln!(out, "{proto}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "#endif /* WYCC_LIB_H */");
    out
}
