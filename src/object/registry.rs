//! Live-object registry and allocation statistics
//!
//! With tracking on every boxed address is recorded until it is freed, so
//! releasing a stale or foreign pointer is reported instead of corrupting
//! memory. Tracking should be switched before the first allocation.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::TypeTag;
use crate::errors::{RuntimeError, RuntimeResult};

static TRACKING: AtomicBool = AtomicBool::new(cfg!(debug_assertions));
static LIVE: Lazy<DashMap<usize, TypeTag>> = Lazy::new(DashMap::new);
static BOXED: AtomicUsize = AtomicUsize::new(0);
static FREED: AtomicUsize = AtomicUsize::new(0);

/// Allocation counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeStats {
    pub boxed: usize,
    pub freed: usize,
    pub live: usize,
}

/// Enable or disable the live-object registry
pub fn set_tracking(enabled: bool) {
    TRACKING.store(enabled, Ordering::Relaxed);
}

pub fn is_tracking() -> bool {
    TRACKING.load(Ordering::Relaxed)
}

pub(super) fn register(address: usize, tag: TypeTag) {
    BOXED.fetch_add(1, Ordering::Relaxed);
    if is_tracking() {
        LIVE.insert(address, tag);
    }
}

pub(super) fn unregister(address: usize) {
    FREED.fetch_add(1, Ordering::Relaxed);
    LIVE.remove(&address);
}

/// Reject addresses the registry does not know (no-op without tracking)
pub(super) fn check(address: usize) -> RuntimeResult<()> {
    if is_tracking() && !LIVE.contains_key(&address) {
        return Err(RuntimeError::UnknownObject { address });
    }
    Ok(())
}

/// Whether `address` is a tracked live object
pub fn is_live(address: usize) -> bool {
    LIVE.contains_key(&address)
}

/// Snapshot of tracked live objects
pub fn live_objects() -> Vec<(usize, TypeTag)> {
    let mut objects: Vec<_> = LIVE.iter().map(|entry| (*entry.key(), *entry.value())).collect();
    objects.sort_unstable_by_key(|(address, _)| *address);
    objects
}

/// Current counters
///
/// `live` is exact with tracking on; otherwise it is derived from the
/// boxed and freed totals.
pub fn stats() -> RuntimeStats {
    let boxed = BOXED.load(Ordering::Relaxed);
    let freed = FREED.load(Ordering::Relaxed);
    let live = if is_tracking() {
        LIVE.len()
    } else {
        boxed.saturating_sub(freed)
    };
    RuntimeStats { boxed, freed, live }
}
