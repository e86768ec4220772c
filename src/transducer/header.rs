use byteorder::{ByteOrder, LittleEndian};

use crate::error::Error;
use crate::types::{SymbolNumber, HEADER_SIZE};

const HFST3_MAGIC: &[u8; 5] = b"HFST\0";

/// One of the nine boolean properties recorded in the fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFlag {
    Weighted,
    Deterministic,
    InputDeterministic,
    Minimized,
    Cyclic,
    HasEpsilonEpsilonTransitions,
    HasInputEpsilonTransitions,
    HasInputEpsilonCycles,
    HasUnweightedInputEpsilonCycles,
}

/// The fixed 56-byte transducer header, plus whatever HFST3 preamble
/// preceded it on disk.
#[derive(Debug)]
pub struct TransducerHeader {
    input_symbol_count: SymbolNumber,
    symbol_count: SymbolNumber,
    index_table_size: u32,
    target_table_size: u32,
    number_of_states: u32,
    number_of_transitions: u32,
    weighted: bool,
    deterministic: bool,
    input_deterministic: bool,
    minimized: bool,
    cyclic: bool,
    has_epsilon_epsilon_transitions: bool,
    has_input_epsilon_transitions: bool,
    has_input_epsilon_cycles: bool,
    has_unweighted_input_epsilon_cycles: bool,
    len: usize,
}

impl TransducerHeader {
    /// Parse the header out of `buf`, starting at byte 0. Returns the parsed
    /// header; `header.len()` gives the number of bytes it and any HFST3
    /// preamble occupied, i.e. the offset the alphabet begins at.
    pub fn new(buf: &[u8]) -> Result<TransducerHeader, Error> {
        if buf.len() < 5 {
            return Err(Error::Malformed("file shorter than HFST3 magic".into()));
        }

        let (fixed_start, preamble_len) = if &buf[0..5] == HFST3_MAGIC {
            if buf.len() < 7 {
                return Err(Error::Malformed("truncated HFST3 preamble length".into()));
            }
            let remaining = LittleEndian::read_u16(&buf[5..7]) as usize;
            let preamble_end = 7 + remaining;
            if buf.len() < preamble_end {
                return Err(Error::Malformed("truncated HFST3 preamble".into()));
            }
            (preamble_end, preamble_end)
        } else {
            (0, 0)
        };

        if buf.len() < fixed_start + HEADER_SIZE {
            return Err(Error::Malformed("truncated transducer header".into()));
        }

        let h = &buf[fixed_start..fixed_start + HEADER_SIZE];
        let flag = |offset: usize| LittleEndian::read_u32(&h[offset..offset + 4]) != 0;

        let header = TransducerHeader {
            input_symbol_count: LittleEndian::read_u16(&h[0..2]),
            symbol_count: LittleEndian::read_u16(&h[2..4]),
            index_table_size: LittleEndian::read_u32(&h[4..8]),
            target_table_size: LittleEndian::read_u32(&h[8..12]),
            number_of_states: LittleEndian::read_u32(&h[12..16]),
            number_of_transitions: LittleEndian::read_u32(&h[16..20]),
            weighted: flag(20),
            deterministic: flag(24),
            input_deterministic: flag(28),
            minimized: flag(32),
            cyclic: flag(36),
            has_epsilon_epsilon_transitions: flag(40),
            has_input_epsilon_transitions: flag(44),
            has_input_epsilon_cycles: flag(48),
            has_unweighted_input_epsilon_cycles: flag(52),
            len: preamble_len + HEADER_SIZE,
        };

        if header.weighted {
            return Err(Error::UnsupportedWeighted);
        }

        Ok(header)
    }

    /// Number of bytes this header (plus any HFST3 preamble) occupied.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn input_symbol_count(&self) -> SymbolNumber {
        self.input_symbol_count
    }

    #[inline]
    pub fn symbol_count(&self) -> SymbolNumber {
        self.symbol_count
    }

    #[inline]
    pub fn index_table_size(&self) -> u32 {
        self.index_table_size
    }

    #[inline]
    pub fn target_table_size(&self) -> u32 {
        self.target_table_size
    }

    #[inline]
    pub fn number_of_states(&self) -> u32 {
        self.number_of_states
    }

    #[inline]
    pub fn number_of_transitions(&self) -> u32 {
        self.number_of_transitions
    }

    #[inline]
    pub fn has_flag(&self, flag: HeaderFlag) -> bool {
        match flag {
            HeaderFlag::Weighted => self.weighted,
            HeaderFlag::Deterministic => self.deterministic,
            HeaderFlag::InputDeterministic => self.input_deterministic,
            HeaderFlag::Minimized => self.minimized,
            HeaderFlag::Cyclic => self.cyclic,
            HeaderFlag::HasEpsilonEpsilonTransitions => self.has_epsilon_epsilon_transitions,
            HeaderFlag::HasInputEpsilonTransitions => self.has_input_epsilon_transitions,
            HeaderFlag::HasInputEpsilonCycles => self.has_input_epsilon_cycles,
            HeaderFlag::HasUnweightedInputEpsilonCycles => {
                self.has_unweighted_input_epsilon_cycles
            }
        }
    }
}
