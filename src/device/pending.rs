//! Pending-work flag register shared between interrupts and the scheduler.
//!
//! One atomic byte. Interrupt handlers raise flags with a single `fetch_or`,
//! the scheduler clears them with a single `fetch_and`, so a set can never be
//! lost to a concurrent clear of a different flag.

use portable_atomic::{AtomicU8, Ordering};

/// A response must be generated and transmitted.
pub const RESPONSE_DUE: u8 = 0x01;

/// Flag register for deferred work.
#[derive(Debug)]
pub struct PendingWork {
    flags: AtomicU8,
}

impl PendingWork {
    /// Create an empty flag register.
    pub const fn new() -> Self {
        Self {
            flags: AtomicU8::new(0),
        }
    }

    /// Raise `flag` (interrupt context).
    ///
    /// Returns true if the flag was already set.
    pub fn raise(&self, flag: u8) -> bool {
        self.flags.fetch_or(flag, Ordering::AcqRel) & flag != 0
    }

    /// Clear `flag` once its work is finished (background context).
    ///
    /// Returns true if the flag was set.
    pub fn clear(&self, flag: u8) -> bool {
        self.flags.fetch_and(!flag, Ordering::AcqRel) & flag != 0
    }

    /// Whether `flag` is currently raised.
    pub fn is_raised(&self, flag: u8) -> bool {
        self.flags.load(Ordering::Acquire) & flag != 0
    }

    /// Whether no work is pending.
    pub fn is_empty(&self) -> bool {
        self.flags.load(Ordering::Acquire) == 0
    }

    /// Snapshot of all flags.
    pub fn bits(&self) -> u8 {
        self.flags.load(Ordering::Acquire)
    }
}

impl Default for PendingWork {
    fn default() -> Self {
        Self::new()
    }
}
