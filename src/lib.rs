//! wycc - runtime support for Whiley programs compiled to C
//!
//! This crate is statically linked into the C code emitted for Whiley
//! programs. It provides the boxed object representation, reference
//! counting, boxing of literals and the `wyil_debug_*` output hooks.

pub mod builtins;
pub mod config;
pub mod debug;
pub mod errors;
pub mod format;
pub mod header;
pub mod logging;
pub mod object;

use once_cell::sync::OnceCell;
use std::ffi::c_int;

pub use config::{DebugTarget, RuntimeConfig};
pub use errors::{RuntimeError, RuntimeResult};
pub use object::{wycc_deref_box, wycc_incr_box, TypeTag, Value, WyccObj};

use logging::{log_leak, log_runtime_init, log_runtime_shutdown};

static CONFIG: OnceCell<RuntimeConfig> = OnceCell::new();

/// Initialize the runtime with an explicit configuration
///
/// Only the first call (from here or `wycc_main`) takes effect.
pub fn init_with_config(config: RuntimeConfig) -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| {
        logging::init(&config);
        log_runtime_init(&config);
        object::set_tracking(config.track_objects);
        debug::set_target(config.debug_target);
        config
    })
}

/// Active configuration, if the runtime was initialized
pub fn config() -> Option<&'static RuntimeConfig> {
    CONFIG.get()
}

/// Flush output and report objects still alive; returns the live count
pub fn shutdown() -> usize {
    if let Err(err) = debug::flush() {
        errors::record(err);
    }

    let live = object::stats().live;
    let leak_check = CONFIG.get().map_or(true, |config| config.leak_check);
    if leak_check && object::is_tracking() {
        for (address, tag) in object::live_objects() {
            // Registry entries are live objects, so their header is readable
            let count = unsafe { (*(address as *const WyccObj)).cnt };
            log_leak(tag.name(), address, count);
        }
    }

    log_runtime_shutdown(live);
    live
}

/// Process-wide runtime initialization (idempotent)
#[no_mangle]
pub extern "C" fn wycc_main() {
    if CONFIG.get().is_some() {
        return;
    }
    let (config, diagnostics) = RuntimeConfig::load();
    init_with_config(config);
    // Logged now that the subscriber exists; the last one stays visible
    // through `wycc_last_error`
    for diagnostic in diagnostics {
        errors::record(diagnostic);
    }
}

/// Runtime teardown; returns the number of objects still alive
#[no_mangle]
pub extern "C" fn wycc_shutdown() -> c_int {
    c_int::try_from(shutdown()).unwrap_or(c_int::MAX)
}
