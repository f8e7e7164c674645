//! Object system - the tagged box shared with generated C code
//!
//! Layout is fixed by `wycc_lib.h`: `{ int typ; int cnt; void* ptr; }`.
//! `typ` selects how `ptr` is interpreted, `cnt` is the reference count
//! and the payload behind `ptr` is owned by the object.

mod refcount;
mod registry;


pub use refcount::{release, retain, wycc_deref_box, wycc_incr_box};
pub use registry::{is_live, is_tracking, live_objects, set_tracking, stats, RuntimeStats};

use std::collections::{BTreeMap, HashSet};
use std::ffi::{c_int, c_void, CStr, CString};
use std::ptr;

use crate::errors::{RuntimeError, RuntimeResult};
use crate::logging::{log_box, log_free};

/// Boxed runtime value (C layout)
#[repr(C)]
#[derive(Debug)]
pub struct WyccObj {
    pub typ: c_int,
    pub cnt: c_int,
    pub ptr: *mut c_void,
}

/// Dynamic kind stored in `WyccObj::typ`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TypeTag {
    Null = 0,
    Bool = 1,
    Byte = 2,
    Char = 3,
    Int = 4,
    String = 5,
    List = 6,
    Set = 7,
    Tuple = 8,
    Record = 9,
}

impl TypeTag {
    pub const ALL: [TypeTag; 10] = [
        TypeTag::Null,
        TypeTag::Bool,
        TypeTag::Byte,
        TypeTag::Char,
        TypeTag::Int,
        TypeTag::String,
        TypeTag::List,
        TypeTag::Set,
        TypeTag::Tuple,
        TypeTag::Record,
    ];

    /// Lowercase kind name used in errors and logs
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Char => "char",
            TypeTag::Int => "int",
            TypeTag::String => "string",
            TypeTag::List => "list",
            TypeTag::Set => "set",
            TypeTag::Tuple => "tuple",
            TypeTag::Record => "record",
        }
    }
}

impl TryFrom<c_int> for TypeTag {
    type Error = RuntimeError;

    fn try_from(value: c_int) -> Result<Self, Self::Error> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| *tag as c_int == value)
            .ok_or(RuntimeError::InvalidTag(value))
    }
}

/// Record fields, kept ordered by name
pub type Fields = BTreeMap<String, *mut WyccObj>;

/// Owned value handed to `alloc`
///
/// Containers own one reference to each element.
#[derive(Debug)]
pub enum Payload {
    Null,
    Bool(bool),
    Byte(u8),
    Char(char),
    Int(i64),
    Str(CString),
    List(Vec<*mut WyccObj>),
    /// Elements are pairwise unequal; see `builtins::set_add`
    Set(Vec<*mut WyccObj>),
    Tuple(Vec<*mut WyccObj>),
    Record(Fields),
}

impl Payload {
    fn tag(&self) -> TypeTag {
        match self {
            Payload::Null => TypeTag::Null,
            Payload::Bool(_) => TypeTag::Bool,
            Payload::Byte(_) => TypeTag::Byte,
            Payload::Char(_) => TypeTag::Char,
            Payload::Int(_) => TypeTag::Int,
            Payload::Str(_) => TypeTag::String,
            Payload::List(_) => TypeTag::List,
            Payload::Set(_) => TypeTag::Set,
            Payload::Tuple(_) => TypeTag::Tuple,
            Payload::Record(_) => TypeTag::Record,
        }
    }

    fn into_raw(self) -> *mut c_void {
        match self {
            Payload::Null => ptr::null_mut(),
            Payload::Bool(b) => Box::into_raw(Box::new(b)).cast(),
            Payload::Byte(b) => Box::into_raw(Box::new(b)).cast(),
            Payload::Char(c) => Box::into_raw(Box::new(c as u32)).cast(),
            Payload::Int(i) => Box::into_raw(Box::new(i)).cast(),
            Payload::Str(s) => s.into_raw().cast(),
            Payload::List(items) | Payload::Set(items) | Payload::Tuple(items) => {
                Box::into_raw(Box::new(items)).cast()
            }
            Payload::Record(fields) => Box::into_raw(Box::new(fields)).cast(),
        }
    }
}

/// Borrowed typed view of a live object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Byte(u8),
    Char(char),
    Int(i64),
    Str(&'a CStr),
    List(&'a [*mut WyccObj]),
    Set(&'a [*mut WyccObj]),
    Tuple(&'a [*mut WyccObj]),
    Record(&'a Fields),
}

impl Value<'_> {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Byte(_) => TypeTag::Byte,
            Value::Char(_) => TypeTag::Char,
            Value::Int(_) => TypeTag::Int,
            Value::Str(_) => TypeTag::String,
            Value::List(_) => TypeTag::List,
            Value::Set(_) => TypeTag::Set,
            Value::Tuple(_) => TypeTag::Tuple,
            Value::Record(_) => TypeTag::Record,
        }
    }

    /// Objects directly referenced by a container (empty for scalars)
    pub fn children(&self) -> Vec<*mut WyccObj> {
        match self {
            Value::List(items) | Value::Set(items) | Value::Tuple(items) => items.to_vec(),
            Value::Record(fields) => fields.values().copied().collect(),
            _ => Vec::new(),
        }
    }
}

/// Box `payload` with a count of one
pub fn alloc(payload: Payload) -> *mut WyccObj {
    let tag = payload.tag();
    let obj = Box::into_raw(Box::new(WyccObj {
        typ: tag as c_int,
        cnt: 1,
        ptr: payload.into_raw(),
    }));

    registry::register(obj as usize, tag);
    log_box(tag.name(), obj as *const u8);
    obj
}

/// Validate `obj` and read its tag
///
/// # Safety
/// `obj` must be null, a pointer produced by `alloc`, or (with tracking
/// on) any address; without tracking a freed pointer is undefined.
pub(crate) unsafe fn checked_tag(obj: *const WyccObj, op: &'static str) -> RuntimeResult<TypeTag> {
    if obj.is_null() {
        return Err(RuntimeError::NullPointer { op });
    }
    registry::check(obj as usize)?;
    TypeTag::try_from((*obj).typ)
}

/// Borrow a typed view of `obj`
///
/// # Safety
/// Same contract as `checked_tag`; the view must not outlive the object.
pub unsafe fn view<'a>(obj: *const WyccObj) -> RuntimeResult<Value<'a>> {
    let tag = checked_tag(obj, "view")?;
    let raw = (*obj).ptr;

    Ok(match tag {
        TypeTag::Null => Value::Null,
        TypeTag::Bool => Value::Bool(*(raw as *const bool)),
        TypeTag::Byte => Value::Byte(*(raw as *const u8)),
        TypeTag::Char => {
            let code = *(raw as *const u32);
            Value::Char(char::from_u32(code).ok_or(RuntimeError::InvalidChar(code))?)
        }
        TypeTag::Int => Value::Int(*(raw as *const i64)),
        TypeTag::String => Value::Str(CStr::from_ptr(raw as *const _)),
        TypeTag::List => Value::List((*(raw as *const Vec<*mut WyccObj>)).as_slice()),
        TypeTag::Set => Value::Set((*(raw as *const Vec<*mut WyccObj>)).as_slice()),
        TypeTag::Tuple => Value::Tuple((*(raw as *const Vec<*mut WyccObj>)).as_slice()),
        TypeTag::Record => Value::Record(&*(raw as *const Fields)),
    })
}

/// Mutable access to the element vector of a list, set or tuple
///
/// `expected` must be one of those three tags.
///
/// # Safety
/// Same contract as `checked_tag`; no other borrow of the container may exist.
pub(crate) unsafe fn items_mut<'a>(
    obj: *mut WyccObj,
    expected: TypeTag,
    op: &'static str,
) -> RuntimeResult<&'a mut Vec<*mut WyccObj>> {
    match checked_tag(obj, op)? {
        tag if tag == expected => Ok(&mut *((*obj).ptr as *mut Vec<*mut WyccObj>)),
        other => Err(RuntimeError::TypeMismatch {
            expected: expected.name(),
            found: other.name(),
        }),
    }
}

/// Mutable access to the element vector of a list object
///
/// # Safety
/// See `items_mut`.
pub(crate) unsafe fn list_items_mut<'a>(
    obj: *mut WyccObj,
    op: &'static str,
) -> RuntimeResult<&'a mut Vec<*mut WyccObj>> {
    items_mut(obj, TypeTag::List, op)
}

/// Mutable access to the fields of a record object
///
/// # Safety
/// See `items_mut`.
pub(crate) unsafe fn record_fields_mut<'a>(obj: *mut WyccObj, op: &'static str) -> RuntimeResult<&'a mut Fields> {
    match checked_tag(obj, op)? {
        TypeTag::Record => Ok(&mut *((*obj).ptr as *mut Fields)),
        other => Err(RuntimeError::TypeMismatch {
            expected: TypeTag::Record.name(),
            found: other.name(),
        }),
    }
}

/// Whether `target` is reachable from `from` through container elements
///
/// # Safety
/// Every object reachable from `from` must satisfy `view`.
pub unsafe fn reaches(from: *const WyccObj, target: *const WyccObj) -> RuntimeResult<bool> {
    let mut seen = HashSet::new();
    let mut stack = vec![from as *mut WyccObj];

    while let Some(obj) = stack.pop() {
        if obj as *const WyccObj == target {
            return Ok(true);
        }
        if seen.insert(obj as usize) {
            stack.extend(view(obj)?.children());
        }
    }
    Ok(false)
}

/// Validate `item` before `container` takes over a reference to it
///
/// Rejects null or dead items and any insertion that would make
/// `container` reachable from itself.
///
/// # Safety
/// `container` and everything reachable from `item` must satisfy `view`.
pub(crate) unsafe fn check_insert(
    container: *mut WyccObj,
    item: *mut WyccObj,
    op: &'static str,
) -> RuntimeResult<()> {
    if item.is_null() {
        return Err(RuntimeError::NullPointer { op });
    }
    view(item)?;
    if reaches(item, container)? {
        return Err(RuntimeError::CyclicReference {
            address: container as usize,
        });
    }
    Ok(())
}

/// Free `obj` and its payload; `deep` also releases container elements
///
/// # Safety
/// `obj` must be live with a valid tag, and no longer referenced.
pub(crate) unsafe fn destroy(obj: *mut WyccObj, tag: TypeTag, deep: bool) {
    let raw = (*obj).ptr;

    let children: Vec<*mut WyccObj> = match tag {
        TypeTag::Null => Vec::new(),
        TypeTag::Bool => {
            drop(Box::from_raw(raw as *mut bool));
            Vec::new()
        }
        TypeTag::Byte => {
            drop(Box::from_raw(raw as *mut u8));
            Vec::new()
        }
        TypeTag::Char => {
            drop(Box::from_raw(raw as *mut u32));
            Vec::new()
        }
        TypeTag::Int => {
            drop(Box::from_raw(raw as *mut i64));
            Vec::new()
        }
        TypeTag::String => {
            drop(CString::from_raw(raw as *mut _));
            Vec::new()
        }
        TypeTag::List | TypeTag::Set | TypeTag::Tuple => *Box::from_raw(raw as *mut Vec<*mut WyccObj>),
        TypeTag::Record => {
            let fields = *Box::from_raw(raw as *mut Fields);
            fields.into_values().collect()
        }
    };

    registry::unregister(obj as usize);
    log_free(tag.name(), obj as *const u8, deep);
    drop(Box::from_raw(obj));

    if deep {
        for child in children {
            // Errors here belong to the element, not the container
            if let Err(err) = release(child, true) {
                crate::errors::record(err);
            }
        }
    }
}
