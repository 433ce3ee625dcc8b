//! Global counters for allocations, merges and galloping, enabled by the `counters` feature

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter that can be shared between threads
#[derive(Debug)]
pub struct GlobalCounter(AtomicU64);

impl GlobalCounter {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn increase(&self, by: u64) {
        self.0.fetch_add(by, Ordering::Relaxed);
    }

    pub fn read(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero, returning the previous value
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }
}

impl Default for GlobalCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of elements merge buffers were allocated for
pub static ALLOC_COUNTER: GlobalCounter = GlobalCounter::new();
/// Number of elements in slices handed to the merging method
pub static MERGE_SLICE_COUNTER: GlobalCounter = GlobalCounter::new();
/// Number of elements copied into merge buffers
pub static MERGE_BUFFER_COUNTER: GlobalCounter = GlobalCounter::new();
/// Number of times the galloping shortcut trimmed a run before merging
pub static GALLOP_COUNTER: GlobalCounter = GlobalCounter::new();
