//! Logging infrastructure - structured tracing throughout the runtime
//!
//! Uses `tracing` with a subscriber installed once by `wycc_main`. Output
//! defaults to stderr so it never mixes with `wyil_debug_*` output on
//! stdout.

use once_cell::sync::OnceCell;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::RuntimeConfig;

pub use tracing::{debug, error, info, trace, warn};

/// Keeps the file writer alive for the life of the process
static LOGGER: OnceCell<Option<WorkerGuard>> = OnceCell::new();

/// Parse a level name, falling back to WARN
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Initialize logging from `config` (later calls are no-ops)
pub fn init(config: &RuntimeConfig) {
    LOGGER.get_or_init(|| {
        let level = parse_level(&config.log_level);
        let filter = EnvFilter::try_from_env("WYCC_LOG")
            .unwrap_or_else(|_| EnvFilter::new(format!("wycc={}", level.as_str().to_lowercase())));

        let (writer, guard) = match &config.log_file {
            Some(path) => {
                let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
                let name = path.file_name().unwrap_or(path.as_os_str());
                let appender = tracing_appender::rolling::never(
                    dir.unwrap_or_else(|| std::path::Path::new(".")),
                    name,
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
            }
            None => (fmt::writer::BoxMakeWriter::new(io::stderr), None),
        };

        let layer = if config.log_json {
            fmt::layer().json().with_writer(writer).with_target(true).boxed()
        } else {
            fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_line_number(cfg!(debug_assertions))
                .boxed()
        };

        // Embedders may already own the global subscriber
        let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
        guard
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

/// Log a new box
#[inline]
pub fn log_box(typ: &'static str, address: *const u8) {
    trace!(event = "box", typ, address = ?address, "Object boxed");
}

/// Log a release that freed its object
#[inline]
pub fn log_free(typ: &'static str, address: *const u8, deep: bool) {
    trace!(event = "free", typ, address = ?address, deep, "Object freed");
}

/// Log an object still alive at shutdown
pub fn log_leak(typ: &'static str, address: usize, count: i32) {
    warn!(event = "leak", typ, address = ?(address as *const u8), count, "Object leaked");
}

/// Log runtime initialization
pub fn log_runtime_init(config: &RuntimeConfig) {
    info!(
        event = "runtime_init",
        track_objects = config.track_objects,
        debug_target = ?config.debug_target,
        "wycc runtime initializing"
    );
}

/// Log runtime shutdown
pub fn log_runtime_shutdown(live: usize) {
    info!(event = "runtime_shutdown", live_objects = live, "wycc runtime shutting down");
}
