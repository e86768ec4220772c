//! Shared numeric aliases and the index-table/transition-table bias.

/// Index into an alphabet, widened in memory from the on-disk `u16`.
pub type SymbolNumber = u16;

/// Index into the index table or transition table, widened from the on-disk
/// `u32`. Whether a given value addresses the index table or the transition
/// table is decided by comparison against [`TRANSITION_TABLE_START`].
pub type TransitionTableIndex = u32;

/// Sentinel meaning "no symbol here" (input or output side of a transition).
pub const NO_SYMBOL: SymbolNumber = 0xFFFF;

/// The empty-symbol arc.
pub const EPSILON: SymbolNumber = 0;

/// Sentinel meaning "no table index here".
pub const NO_TABLE_INDEX: TransitionTableIndex = 0xFFFF_FFFF;

/// Values at or above this bias address the transition table, offset by
/// this amount. Values below it address the index table directly.
pub const TRANSITION_TABLE_START: TransitionTableIndex = 0x8000_0000;

/// On-disk byte width of one `TransitionIndex` record (`u16` + `u32`).
pub const INDEX_TABLE_RECORD_SIZE: usize = 6;

/// On-disk byte width of one `Transition` record (`u16` + `u16` + `u32`).
pub const TRANSITION_TABLE_RECORD_SIZE: usize = 8;

/// Fixed byte width of the transducer header (after any HFST3 preamble).
pub const HEADER_SIZE: usize = 56;
