//! Sample history ring buffer.

/// Fixed-capacity ring of temperature samples.
///
/// `append()` overwrites the slot at the write cursor and advances the
/// cursor modulo `N`. No fill count is tracked: slots that were never
/// written read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleHistory<const N: usize> {
    samples: [i16; N],
    cursor: usize,
}

impl<const N: usize> SampleHistory<N> {
    /// Create a zero-filled history with the cursor at slot 0.
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            cursor: 0,
        }
    }

    /// Store a sample at the cursor and advance it.
    pub fn append(&mut self, sample: i16) {
        if N == 0 {
            return;
        }
        self.samples[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % N;
    }

    /// Move the write cursor back to slot 0 (hourly window restart).
    ///
    /// Stored samples are kept and get overwritten by later appends.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    /// Copy of all slots in storage order.
    pub fn snapshot(&self) -> [i16; N] {
        self.samples
    }

    /// Slot the next sample is written to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Iterate over the slots in storage order.
    pub fn iter(&self) -> core::slice::Iter<'_, i16> {
        self.samples.iter()
    }
}

impl<const N: usize> Default for SampleHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}
