//! Ticket Bitmap
//!
//! Fixed-size bitset over whitelist tickets `1..=N`. A set bit means the
//! ticket is still available. Bits are only ever cleared.

use serde::{Deserialize, Serialize};

/// Bits per storage word.
const WORD_BITS: u64 = 64;

/// Once-only ticket tracker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBitmap {
    /// Storage words; ticket `t` lives at bit `t - 1`.
    words: Vec<u64>,
    /// Number of tickets (N).
    capacity: u64,
}

impl TicketBitmap {
    /// Create a bitmap with tickets `1..=capacity` all available.
    ///
    /// None if the word count does not fit in `usize` on this target.
    /// Callers bound `capacity` first; see `MAX_WHITELIST_SIZE`.
    pub fn new(capacity: u64) -> Option<Self> {
        let full_words = usize::try_from(capacity / WORD_BITS).ok()?;
        let tail_bits = capacity % WORD_BITS;

        let mut words = vec![u64::MAX; full_words];
        if tail_bits > 0 {
            words.push((1u64 << tail_bits) - 1);
        }

        Some(Self { words, capacity })
    }

    /// Does the storage length match the capacity? False only for
    /// hand-built or corrupted snapshots.
    pub fn is_consistent(&self) -> bool {
        let expected = self.capacity / WORD_BITS + u64::from(self.capacity % WORD_BITS != 0);
        usize::try_from(expected).map_or(false, |n| n == self.words.len())
    }

    /// Number of tickets the bitmap was created with.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Is `ticket` still available?
    ///
    /// Tickets outside `1..=N` have no slot and are never available.
    #[inline]
    pub fn is_available(&self, ticket: u64) -> bool {
        match Self::slot(ticket, self.capacity) {
            Some((word, bit)) => self.words[word] & (1u64 << bit) != 0,
            None => false,
        }
    }

    /// Clear the slot for `ticket`.
    ///
    /// Returns `false` if the ticket was already consumed or has no slot;
    /// the bitmap is unchanged in that case.
    pub fn consume(&mut self, ticket: u64) -> bool {
        let Some((word, bit)) = Self::slot(ticket, self.capacity) else {
            return false;
        };

        let mask = 1u64 << bit;
        if self.words[word] & mask == 0 {
            return false;
        }

        self.words[word] &= !mask;
        true
    }

    /// Number of tickets not yet consumed.
    pub fn remaining(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Number of tickets consumed so far.
    pub fn consumed(&self) -> u64 {
        self.capacity - self.remaining()
    }

    fn slot(ticket: u64, capacity: u64) -> Option<(usize, u64)> {
        if ticket == 0 || ticket > capacity {
            return None;
        }
        let index = ticket - 1;
        let word = usize::try_from(index / WORD_BITS).ok()?;
        Some((word, index % WORD_BITS))
    }
}
