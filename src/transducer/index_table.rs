use std::sync::Arc;

use byteorder::{ByteOrder, LittleEndian};
use memmap::Mmap;

use crate::types::{
    SymbolNumber, TransitionTableIndex, INDEX_TABLE_RECORD_SIZE, NO_SYMBOL, NO_TABLE_INDEX,
};

/// The index table: a dense vector of `(input_symbol, target)` pairs,
/// addressed directly by state-relative offset (§3 `TransitionIndex`,
/// §4.4 `find_index`/`try_epsilon_indices`).
///
/// Records are read lazily out of the backing mmap rather than decoded
/// up front, since a real transducer's index table can run to millions of
/// records and this table is read far more often than it is (re)loaded.
#[derive(Clone)]
pub struct IndexTable {
    buf: Arc<Mmap>,
    start: usize,
    len: u32,
}

impl std::fmt::Debug for IndexTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexTable").field("len", &self.len).finish()
    }
}

impl IndexTable {
    pub fn new(buf: Arc<Mmap>, start: usize, len: u32) -> IndexTable {
        IndexTable { buf, start, len }
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
        let offset = self.start + i as usize * INDEX_TABLE_RECORD_SIZE;
        Some(&self.buf[offset..offset + INDEX_TABLE_RECORD_SIZE])
    }

    #[inline]
    pub fn input_symbol(&self, i: u32) -> Option<SymbolNumber> {
        self.record(i).map(|r| LittleEndian::read_u16(&r[0..2]))
    }

    #[inline]
    pub fn target(&self, i: u32) -> Option<TransitionTableIndex> {
        self.record(i).map(|r| LittleEndian::read_u32(&r[2..6]))
    }

    #[inline]
    pub fn is_final(&self, i: u32) -> bool {
        match (self.input_symbol(i), self.target(i)) {
            (Some(NO_SYMBOL), Some(target)) => target != NO_TABLE_INDEX,
            _ => false,
        }
    }
}
