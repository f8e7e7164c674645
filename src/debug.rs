//! Debug output - the `wyil_debug_*` hooks
//!
//! Output goes to a process-wide sink (stdout unless configured otherwise).
//! A thread may capture its own output instead, which keeps tests and
//! embedders independent of the global sink.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::ffi::{c_char, CStr};
use std::io::{self, Write};

use crate::config::DebugTarget;
use crate::errors::{record, RuntimeError, RuntimeResult};
use crate::format::render_top;
use crate::logging::trace;
use crate::object::WyccObj;

/// Output target abstraction
pub trait Output: Send {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }
}

struct Stdout;

impl Output for Stdout {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

struct Stderr;

impl Output for Stderr {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stderr().lock().write_all(bytes)
    }
}

static SINK: Lazy<Mutex<Box<dyn Output>>> = Lazy::new(|| Mutex::new(Box::new(Stdout)));

thread_local! {
    static CAPTURE: RefCell<Option<Vec<u8>>> = const { RefCell::new(None) };
}

/// Route debug output to `target`
pub fn set_target(target: DebugTarget) {
    let sink: Box<dyn Output> = match target {
        DebugTarget::Stdout => Box::new(Stdout),
        DebugTarget::Stderr => Box::new(Stderr),
    };
    set_output(sink);
}

/// Install a custom sink
pub fn set_output(sink: Box<dyn Output>) {
    let mut current = SINK.lock();
    // Flush whatever the old sink buffered before dropping it
    if let Err(err) = current.flush() {
        record(err.into());
    }
    *current = sink;
}

/// Flush the global sink
pub fn flush() -> RuntimeResult<()> {
    SINK.lock().flush()?;
    Ok(())
}

/// Run `f`, returning everything this thread wrote to debug output
pub fn capture_output<F: FnOnce()>(f: F) -> String {
    let previous = CAPTURE.with(|slot| slot.borrow_mut().replace(Vec::new()));
    f();
    let captured = CAPTURE.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), previous));
    String::from_utf8_lossy(&captured.unwrap_or_default()).into_owned()
}

/// Write `bytes` verbatim to this thread's capture or the global sink
pub fn write(bytes: &[u8]) -> RuntimeResult<()> {
    let captured = CAPTURE.with(|slot| match slot.borrow_mut().as_mut() {
        Some(buffer) => {
            buffer.extend_from_slice(bytes);
            true
        }
        None => false,
    });
    if !captured {
        SINK.lock().write_bytes(bytes)?;
    }
    Ok(())
}

/// Write the top-level rendering of `obj`
///
/// # Safety
/// `obj` must satisfy the contract of `object::view`.
pub unsafe fn debug_obj(obj: *const WyccObj) -> RuntimeResult<()> {
    let text = render_top(obj)?;
    write(text.as_bytes())
}

/// Print `mesg` as-is (no newline is appended)
#[no_mangle]
pub unsafe extern "C" fn wyil_debug_str(mesg: *const c_char) {
    if mesg.is_null() {
        record(RuntimeError::NullPointer { op: "wyil_debug_str" });
        return;
    }
    let bytes = CStr::from_ptr(mesg).to_bytes();
    trace!(event = "debug_str", len = bytes.len());
    if let Err(err) = write(bytes) {
        record(err);
    }
}

/// Print the rendering of `ptr`; nothing is written if it is invalid
#[no_mangle]
pub unsafe extern "C" fn wyil_debug_obj(ptr: *mut WyccObj) {
    trace!(event = "debug_obj", address = ?ptr);
    if let Err(err) = debug_obj(ptr) {
        record(err);
    }
}
