//! Lock-free snapshot publication between priority levels.
//!
//! The control plane recomputes multi-field parameter sets at a low rate;
//! the audio callback reads them every frame. [`SnapshotCell`] guarantees
//! the reader sees either the fully-old or fully-new value set, never a
//! partially-written struct: the writer fills the inactive slot of a double
//! buffer, then flips a single atomic index.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`publish()`](SnapshotCell::publish) (the
//!   control-rate writer).
//! - Only ONE context may call [`read()`](SnapshotCell::read) (the
//!   audio-rate reader). It may preempt the writer at any point.
//! - The writer must not publish twice within one reader copy. Publications
//!   are hundreds of milliseconds apart while a frame copy is microseconds,
//!   so the slot the reader is copying is never the one being rewritten.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU8, Ordering};

/// Double-buffered value cell with a single-word active-slot index.
pub struct SnapshotCell<T> {
    slots: [UnsafeCell<T>; 2],
    /// Index of the slot readers should copy (0 or 1).
    active: AtomicU8,
}

// SAFETY: T: Copy + Send values cross the writer/reader contexts by value.
// The active index is only advanced by the writer after the inactive slot
// is fully written (Release), and the reader only dereferences the slot the
// Acquire load names, so it never observes a half-written T under the
// single-writer/single-reader rate contract above.
unsafe impl<T: Copy + Send> Sync for SnapshotCell<T> {}

impl<T: Copy> SnapshotCell<T> {
    /// Create a cell with both slots holding `initial`.
    pub const fn new(initial: T) -> Self {
        SnapshotCell {
            slots: [UnsafeCell::new(initial), UnsafeCell::new(initial)],
            active: AtomicU8::new(0),
        }
    }

    /// Publish a new snapshot (writer side).
    ///
    /// Writes into the inactive slot, then flips the active index.
    pub fn publish(&self, value: T) {
        let inactive = 1 - self.active.load(Ordering::Relaxed);
        // SAFETY: We are the sole writer and `inactive` is not the slot the
        // reader's index names, so we have exclusive access to it.
        unsafe {
            *self.slots[inactive as usize].get() = value;
        }
        // Release ordering makes the slot contents visible before the flip.
        self.active.store(inactive, Ordering::Release);
    }

    /// Copy out the current snapshot (reader side). Wait-free.
    pub fn read(&self) -> T {
        let active = self.active.load(Ordering::Acquire);
        // SAFETY: The writer never writes the slot `active` names; by the
        // rate contract it will not flip and rewrite it mid-copy either.
        unsafe { *self.slots[active as usize].get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug)]
    struct Pair {
        a: u32,
        b: u32,
    }

    #[test]
    fn read_returns_initial_value() {
        let cell = SnapshotCell::new(Pair { a: 1, b: 2 });
        assert_eq!(cell.read(), Pair { a: 1, b: 2 });
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let cell = SnapshotCell::new(Pair { a: 0, b: 0 });

        cell.publish(Pair { a: 10, b: 20 });
        assert_eq!(cell.read(), Pair { a: 10, b: 20 });

        // Alternates slots; every read still sees a complete value.
        cell.publish(Pair { a: 30, b: 40 });
        assert_eq!(cell.read(), Pair { a: 30, b: 40 });
        cell.publish(Pair { a: 50, b: 60 });
        assert_eq!(cell.read(), Pair { a: 50, b: 60 });
    }

    #[test]
    fn reads_are_stable_between_publications() {
        let cell = SnapshotCell::new(0u64);
        cell.publish(7);
        assert_eq!(cell.read(), 7);
        assert_eq!(cell.read(), 7);
    }
}
