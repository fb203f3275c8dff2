//! One-way ready flags.
//!
//! Chunk phases publish their data, then set a [`Latch`]; readers poll the latch before
//! touching the data.

use std::sync::atomic::{AtomicBool, Ordering};

/// A one-way boolean flag shared between a worker and the threads polling it.
///
/// A latch starts open (`false`) and can only ever be set. Setting uses `Release`
/// ordering and reading uses `Acquire`, so everything the worker wrote before calling
/// [`Latch::set`] is visible to a thread that observes [`Latch::is_set`] returning `true`.
#[derive(Debug, Default)]
pub struct Latch {
    flag: AtomicBool,
}

impl Latch {
    /// Creates an unset latch.
    pub const fn new() -> Self {
        Latch {
            flag: AtomicBool::new(false),
        }
    }

    /// Sets the latch.
    ///
    /// # Returns
    /// `true` if this call flipped the latch, `false` if it was already set.
    pub fn set(&self) -> bool {
        !self.flag.swap(true, Ordering::AcqRel)
    }

    /// Returns whether the latch has been set.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
