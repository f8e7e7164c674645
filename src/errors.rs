//! Runtime errors - typed failures plus the C-visible error slot
//!
//! C entry points never unwind into generated code. A failing call stores
//! its error in a thread-local slot and returns a neutral value; the
//! generated code polls `wycc_last_error`.

use std::cell::RefCell;
use std::ffi::{c_char, c_int, CString};
use thiserror::Error;

use crate::logging::warn;

/// Error type for runtime operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A required pointer argument was null
    #[error("null pointer passed to {op}")]
    NullPointer { op: &'static str },

    /// Address is not a live object (never boxed, or already freed)
    #[error("unknown object at {address:#x}")]
    UnknownObject { address: usize },

    /// Release of an object whose count is already exhausted
    #[error("refcount underflow at {address:#x} (count {count})")]
    RefcountUnderflow { address: usize, count: c_int },

    /// One more reference would not fit in `cnt`
    #[error("refcount overflow at {address:#x}")]
    RefcountOverflow { address: usize },

    /// Insertion would make a container reachable from itself
    #[error("object at {address:#x} would contain itself")]
    CyclicReference { address: usize },

    /// The `typ` field holds no known tag
    #[error("invalid type tag {0}")]
    InvalidTag(c_int),

    /// Operation applied to the wrong kind of object
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Value is not a unicode scalar
    #[error("invalid char value {0:#x}")]
    InvalidChar(u32),

    /// Index outside `0..len` of a list or tuple
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// Record has no field with this name
    #[error("record has no field `{0}`")]
    UnknownField(String),

    /// Malformed configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Failed write to the debug sink or log file
    #[error("i/o error: {0}")]
    Io(String),
}

impl RuntimeError {
    /// Stable numeric code reported through `wycc_last_error`
    pub fn code(&self) -> c_int {
        match self {
            RuntimeError::NullPointer { .. } => 1,
            RuntimeError::UnknownObject { .. } => 2,
            RuntimeError::RefcountUnderflow { .. } => 3,
            RuntimeError::InvalidTag(_) => 4,
            RuntimeError::TypeMismatch { .. } => 5,
            RuntimeError::InvalidChar(_) => 6,
            RuntimeError::IndexOutOfBounds { .. } => 7,
            RuntimeError::Config(_) => 8,
            RuntimeError::Io(_) => 9,
            RuntimeError::RefcountOverflow { .. } => 10,
            RuntimeError::CyclicReference { .. } => 11,
            RuntimeError::UnknownField(_) => 12,
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Io(err.to_string())
    }
}

/// Result type alias for runtime operations
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

struct LastError {
    error: RuntimeError,
    message: CString,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<LastError>> = const { RefCell::new(None) };
}

/// Store `error` as this thread's last error
pub fn record(error: RuntimeError) {
    warn!(event = "runtime_error", code = error.code(), error = %error, "Runtime error recorded");

    // Messages are built from Display output, which never contains NUL.
    let message = CString::new(error.to_string()).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(LastError { error, message }));
}

/// Unwrap `result`, recording the error and substituting `fallback`
#[inline]
pub fn or_record<T>(result: RuntimeResult<T>, fallback: T) -> T {
    result.unwrap_or_else(|err| {
        record(err);
        fallback
    })
}

/// Last error on this thread, if any
pub fn last_error() -> Option<RuntimeError> {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map(|last| last.error.clone()))
}

/// Take and clear the last error on this thread
pub fn take_last_error() -> Option<RuntimeError> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take().map(|last| last.error))
}

/// Error code of the last failed call on this thread (0 if none)
#[no_mangle]
pub extern "C" fn wycc_last_error() -> c_int {
    LAST_ERROR.with(|slot| slot.borrow().as_ref().map_or(0, |last| last.error.code()))
}

/// Message of the last failed call, valid until the next error on this thread
#[no_mangle]
pub extern "C" fn wycc_last_error_message() -> *const c_char {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |last| last.message.as_ptr())
    })
}

/// Reset the error slot
#[no_mangle]
pub extern "C" fn wycc_clear_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_record_and_take() {
        wycc_clear_error();
        assert_eq!(wycc_last_error(), 0);
        assert!(wycc_last_error_message().is_null());

        record(RuntimeError::InvalidTag(42));
        assert_eq!(wycc_last_error(), 4);

        let msg = unsafe { CStr::from_ptr(wycc_last_error_message()) };
        assert_eq!(msg.to_str().unwrap(), "invalid type tag 42");

        assert_eq!(take_last_error(), Some(RuntimeError::InvalidTag(42)));
        assert_eq!(wycc_last_error(), 0);
    }

    #[test]
    fn test_or_record_fallback() {
        wycc_clear_error();
        let ok: RuntimeResult<i64> = Ok(7);
        assert_eq!(or_record(ok, 0), 7);
        assert_eq!(last_error(), None);

        let err: RuntimeResult<i64> = Err(RuntimeError::NullPointer { op: "test" });
        assert_eq!(or_record(err, -1), -1);
        assert_eq!(last_error(), Some(RuntimeError::NullPointer { op: "test" }));
    }

    #[test]
    fn test_error_slot_is_per_thread() {
        record(RuntimeError::InvalidChar(0xD800));
        let other = std::thread::spawn(|| wycc_last_error()).join().unwrap();
        assert_eq!(other, 0);
        assert_eq!(wycc_last_error(), 6);
        wycc_clear_error();
    }
}
