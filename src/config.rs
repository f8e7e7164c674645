//! Runtime configuration - TOML file plus environment overrides
//!
//! Sources in increasing priority: built-in defaults, the file named by
//! `WYCC_CONFIG`, then individual `WYCC_*` variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::{RuntimeError, RuntimeResult};

/// Where `wyil_debug_*` output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugTarget {
    Stdout,
    Stderr,
}

impl DebugTarget {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "stdout" => Some(DebugTarget::Stdout),
            "stderr" => Some(DebugTarget::Stderr),
            _ => None,
        }
    }
}

/// Settings applied by `wycc_main`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// trace, debug, info, warn or error
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,
    /// Append logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// Keep a registry of live objects to catch bad releases
    pub track_objects: bool,
    /// Warn about objects still alive at shutdown
    pub leak_check: bool,
    pub debug_target: DebugTarget,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_json: false,
            log_file: None,
            track_objects: cfg!(debug_assertions),
            leak_check: true,
            debug_target: DebugTarget::Stdout,
        }
    }
}

impl RuntimeConfig {
    /// Load from `WYCC_CONFIG` and the environment
    ///
    /// A malformed file is skipped and environment overrides still apply.
    /// Problems are returned alongside the configuration, since logging is
    /// only set up from its result.
    pub fn load() -> (Self, Vec<RuntimeError>) {
        let mut diagnostics = Vec::new();
        let mut config = match std::env::var_os("WYCC_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path)).unwrap_or_else(|err| {
                diagnostics.push(err);
                Self::default()
            }),
            None => Self::default(),
        };
        diagnostics.extend(config.apply_env(|key| std::env::var(key).ok()));
        (config, diagnostics)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> RuntimeResult<Self> {
        toml::from_str(text).map_err(|err| RuntimeError::Config(err.to_string()))
    }

    /// Apply `WYCC_*` overrides using `lookup` to read variables
    ///
    /// Unparseable values leave the setting unchanged and are returned.
    pub fn apply_env<F>(&mut self, lookup: F) -> Vec<RuntimeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut diagnostics = Vec::new();
        let mut flag = |key: &str, current: &mut bool| {
            if let Some(val) = lookup(key) {
                match parse_flag(&val) {
                    Some(parsed) => *current = parsed,
                    None => diagnostics.push(invalid(key, &val)),
                }
            }
        };
        flag("WYCC_LOG_JSON", &mut self.log_json);
        flag("WYCC_TRACK_OBJECTS", &mut self.track_objects);
        flag("WYCC_LEAK_CHECK", &mut self.leak_check);

        if let Some(level) = lookup("WYCC_LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
        if let Some(path) = lookup("WYCC_LOG_FILE") {
            self.log_file = Some(PathBuf::from(path));
        }
        if let Some(val) = lookup("WYCC_DEBUG_TARGET") {
            match DebugTarget::parse(&val) {
                Some(target) => self.debug_target = target,
                None => diagnostics.push(invalid("WYCC_DEBUG_TARGET", &val)),
            }
        }
        diagnostics
    }
}

fn invalid(key: &str, value: &str) -> RuntimeError {
    RuntimeError::Config(format!("invalid value {value:?} for {key}"))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
