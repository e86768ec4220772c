use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use memmap::Mmap;

use crate::types::{SymbolNumber, TransitionTableIndex, NO_SYMBOL, TRANSITION_TABLE_RECORD_SIZE};

/// The transition table: a dense vector of `(input_symbol, output_symbol,
/// target)` triples (§3 `Transition`, §4.4 `find_transitions`/
/// `try_epsilon_transitions`).
#[derive(Clone)]
pub struct TransitionTable {
    buf: Arc<Mmap>,
    start: usize,
    len: u32,
}

impl std::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionTable")
            .field("len", &self.len)
            .finish()
    }
}

impl TransitionTable {
    pub fn new(buf: Arc<Mmap>, start: usize, len: u32) -> TransitionTable {
        TransitionTable { buf, start, len }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn record(&self, i: u32) -> Option<&[u8]> {
        if i >= self.len {
            return None;
        }
        let offset = self.start + i as usize * TRANSITION_TABLE_RECORD_SIZE;
        Some(&self.buf[offset..offset + TRANSITION_TABLE_RECORD_SIZE])
    }

    #[inline]
    pub fn input_symbol(&self, i: u32) -> Option<SymbolNumber> {
        self.record(i).map(|r| LittleEndian::read_u16(&r[0..2]))
    }

    #[inline]
    pub fn output_symbol(&self, i: u32) -> Option<SymbolNumber> {
        self.record(i).map(|r| LittleEndian::read_u16(&r[2..4]))
    }

    #[inline]
    pub fn target(&self, i: u32) -> Option<TransitionTableIndex> {
        self.record(i).map(|r| LittleEndian::read_u32(&r[4..8]))
    }

    /// A final transition: both symbols absent and `target == 1` (§3).
    #[inline]
    pub fn is_final(&self, i: u32) -> bool {
        matches!(
            (self.input_symbol(i), self.output_symbol(i), self.target(i)),
            (Some(NO_SYMBOL), Some(NO_SYMBOL), Some(1))
        )
    }
}
