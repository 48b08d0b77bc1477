//! Growable byte buffer for incremental message framing.
//!
//! Accumulates raw stream chunks and cuts complete newline-terminated
//! messages off the front. Valid data always starts at offset 0: extraction
//! shifts the remainder down rather than keeping a read cursor, so capacity
//! is never leaked to stale head bytes.
//!
//! Capacity grows by doubling from a floor of 32 bytes and never shrinks.
//! That trades memory for amortized O(1) appends and avoids reallocation
//! churn on steady-state traffic.

use bytes::Bytes;

/// Message delimiter. Messages are cut delimiter-inclusive.
pub const DELIMITER: u8 = b'\n';

/// Minimum backing capacity once the buffer holds any data.
const CAPACITY_FLOOR: usize = 32;

/// Unconsumed bytes received but not yet parsed into a message.
#[derive(Debug, Default)]
pub struct DynBuf {
    /// Backing storage; only `data[..len]` is valid.
    data: Vec<u8>,
    /// Logical length of valid data.
    len: usize,
}

impl DynBuf {
    /// Create an empty buffer with no backing storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical length of valid data.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether any unconsumed bytes remain.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current backing capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The valid bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Append a chunk after the current valid data, growing if needed.
    pub fn push(&mut self, chunk: &[u8]) {
        let new_len = self.len + chunk.len();
        if self.data.len() < new_len {
            // Double from the floor until the chunk fits, then copy the
            // valid bytes into the grown storage at offset 0.
            let mut cap = self.data.len().max(CAPACITY_FLOOR);
            while cap < new_len {
                cap *= 2;
            }
            let mut grown = vec![0u8; cap];
            grown[..self.len].copy_from_slice(&self.data[..self.len]);
            self.data = grown;
        }
        self.data[self.len..new_len].copy_from_slice(chunk);
        self.len = new_len;
    }

    /// Cut the first complete message off the front, delimiter included.
    ///
    /// Returns `None` when no delimiter is present in the valid data. Safe
    /// to call in a loop until it reports `None`; a single chunk may carry
    /// several complete messages.
    pub fn cut_message(&mut self) -> Option<Bytes> {
        let idx = self.data[..self.len]
            .iter()
            .position(|&b| b == DELIMITER)?;
        let msg = Bytes::copy_from_slice(&self.data[..=idx]);
        self.pop_front(idx + 1);
        Some(msg)
    }

    /// Remove `count` bytes from the front, shifting the remainder to
    /// offset 0.
    fn pop_front(&mut self, count: usize) {
        self.data.copy_within(count..self.len, 0);
        self.len -= count;
    }
}
