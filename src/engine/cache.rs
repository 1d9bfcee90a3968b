//! Per-batch memo table of standalone compressed sizes
//!
//! Every pair (i, j) needs the standalone sizes of items i and j, so each
//! size is measured once per batch and shared across all workers. Slots
//! start at 0, the "uncomputed" sentinel; a valid compressed size of
//! non-empty input is always greater than zero, so there is no ambiguity.
//!
//! Concurrent first-time lookups for the same index are allowed to race:
//! each racer computes the identical deterministic value and stores it
//! into the same fixed slot, so the cache always converges. The redundant
//! compression is cheaper than per-slot locking across the O(n²) fill,
//! which is why the slots are plain relaxed atomics and not mutexes.

use crate::common::error::NcdResult;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lazy memo table, one slot per item index
pub struct SizeCache {
    slots: Vec<AtomicUsize>,
}

impl SizeCache {
    /// Creates a cache with `len` uncomputed slots
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || AtomicUsize::new(0));
        Self { slots }
    }

    /// Returns the number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns whether the cache has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the memoized size for `index`, or runs `compute`, stores
    /// the result, and returns it
    ///
    /// Errors from `compute` are propagated without poisoning the slot,
    /// so a later retry is possible.
    pub fn get_or_compute<F>(&self, index: usize, compute: F) -> NcdResult<usize>
    where
        F: FnOnce() -> NcdResult<usize>,
    {
        let cached = self.slots[index].load(Ordering::Relaxed);
        if cached != 0 {
            return Ok(cached);
        }
        let size = compute()?;
        self.slots[index].store(size, Ordering::Relaxed);
        Ok(size)
    }

    /// Pre-warms a slot with an already-measured size
    pub fn put(&self, index: usize, size: usize) {
        self.slots[index].store(size, Ordering::Relaxed);
    }
}
