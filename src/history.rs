//! Fixed-capacity ring of recent readings.
//!
//! Feeds the running average reported by `/status`. Once full, each new
//! reading overwrites the oldest one. No heap.

/// Ring buffer of the last `N` readings.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const N: usize> {
    slots: [u16; N],
    write_index: usize,
    filled_count: usize,
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> HistoryBuffer<N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "history capacity must be non-zero") };
        Self {
            slots: [0; N],
            write_index: 0,
            filled_count: 0,
        }
    }

    /// Store a reading, overwriting the oldest once full.
    pub fn record(&mut self, value: u16) {
        self.slots[self.write_index] = value;
        self.write_index = (self.write_index + 1) % N;
        if self.filled_count < N {
            self.filled_count += 1;
        }
    }

    /// Floor mean of the stored readings; 0 when empty.
    pub fn average(&self) -> u16 {
        if self.filled_count == 0 {
            return 0;
        }
        let sum: u32 = self.iter().map(u32::from).sum();
        (sum / self.filled_count as u32) as u16
    }

    /// Most recently recorded reading.
    pub fn latest(&self) -> Option<u16> {
        if self.filled_count == 0 {
            return None;
        }
        Some(self.slots[(self.write_index + N - 1) % N])
    }

    pub fn len(&self) -> usize {
        self.filled_count
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Stored readings, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        let start = if self.filled_count < N { 0 } else { self.write_index };
        (0..self.filled_count).map(move |i| self.slots[(start + i) % N])
    }
}
