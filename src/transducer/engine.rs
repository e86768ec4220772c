//! The recursive backtracking search over the index/transition tables
//! (§4.4). Mutually recursive routines mirror the spec's naming:
//! `get_analyses`, `try_epsilon_indices`/`try_epsilon_transitions`,
//! `find_index`/`find_transitions`.

use smol_str::SmolStr;

use super::alphabet::Alphabet;
use super::flag_state::FlagDiacriticState;
use super::index_table::IndexTable;
use super::transition_table::TransitionTable;
use crate::types::{SymbolNumber, TransitionTableIndex, EPSILON, NO_SYMBOL, TRANSITION_TABLE_START};

/// Per-call search state: the tokenized input, an input cursor, a mutable
/// output buffer, a flag-diacritic stack, and the accumulated analyses.
/// Never shared across calls and never stored on the transducer (§5).
pub(crate) struct SearchState<'a> {
    alphabet: &'a Alphabet,
    index_table: &'a IndexTable,
    transition_table: &'a TransitionTable,
    input: Vec<SymbolNumber>,
    input_pos: usize,
    output: Vec<SymbolNumber>,
    flags: FlagDiacriticState,
    results: Vec<Vec<SmolStr>>,
}

impl<'a> SearchState<'a> {
    pub(crate) fn new(
        alphabet: &'a Alphabet,
        index_table: &'a IndexTable,
        transition_table: &'a TransitionTable,
        input: Vec<SymbolNumber>,
    ) -> SearchState<'a> {
        SearchState {
            alphabet,
            index_table,
            transition_table,
            input,
            input_pos: 0,
            output: Vec::new(),
            flags: FlagDiacriticState::new(),
            results: Vec::new(),
        }
    }

    /// Run the search from the index table's root (index 0) and return
    /// every accepting analysis found.
    pub(crate) fn run(mut self) -> Vec<Vec<SmolStr>> {
        self.get_analyses(0);
        self.results
    }

    #[inline]
    fn current_input(&self) -> SymbolNumber {
        self.input[self.input_pos]
    }

    /// The symbol most recently consumed by the cursor advance in
    /// `get_analyses`, used by `find_index`/`find_transitions` to know what
    /// they are matching against.
    #[inline]
    fn consumed_input(&self) -> SymbolNumber {
        self.input[self.input_pos - 1]
    }

    fn note_analysis(&mut self) {
        let symbols = self
            .output
            .iter()
            .filter_map(|&sym| self.alphabet.symbol(sym))
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        self.results.push(symbols);
    }

    fn get_analyses(&mut self, idx: TransitionTableIndex) {
        if idx >= TRANSITION_TABLE_START {
            let t = idx - TRANSITION_TABLE_START;
            self.try_epsilon_transitions(t + 1);
            if self.current_input() == NO_SYMBOL {
                if self.transition_table.is_final(t) {
                    self.note_analysis();
                }
                return;
            }
            self.input_pos += 1;
            self.find_transitions(t + 1);
            self.input_pos -= 1;
        } else {
            self.try_epsilon_indices(idx + 1);
            if self.current_input() == NO_SYMBOL {
                if self.index_table.is_final(idx) {
                    self.note_analysis();
                }
                return;
            }
            self.input_pos += 1;
            self.find_index(idx + 1);
            self.input_pos -= 1;
        }
    }

    fn try_epsilon_indices(&mut self, i: TransitionTableIndex) {
        if self.index_table.input_symbol(i) != Some(EPSILON) {
            return;
        }
        if let Some(target) = self.index_table.target(i) {
            if let Some(t) = target.checked_sub(TRANSITION_TABLE_START) {
                self.try_epsilon_transitions(t);
            }
            // A target that doesn't clear the bias points back into the
            // index table, which a well-formed file never does (§9); treat
            // it as a dead end rather than panicking.
        }
    }

    fn try_epsilon_transitions(&mut self, mut t: TransitionTableIndex) {
        loop {
            match self.transition_table.input_symbol(t) {
                Some(EPSILON) => {
                    self.step_transition(t);
                    t += 1;
                }
                Some(sym) if self.alphabet.is_flag(sym) => {
                    let op = self
                        .alphabet
                        .operation(sym)
                        .expect("is_flag implies an operation is registered")
                        .clone();
                    if self.flags.push(&op) {
                        self.step_transition(t);
                        self.flags.pop();
                    }
                    t += 1;
                }
                _ => return,
            }
        }
    }

    fn find_index(&mut self, i: TransitionTableIndex) {
        let c = self.consumed_input();
        let slot = i + TransitionTableIndex::from(c);
        if self.index_table.input_symbol(slot) != Some(c) {
            return;
        }
        if let Some(target) = self.index_table.target(slot) {
            if let Some(t) = target.checked_sub(TRANSITION_TABLE_START) {
                self.find_transitions(t);
            }
        }
    }

    fn find_transitions(&mut self, mut t: TransitionTableIndex) {
        let c = self.consumed_input();
        loop {
            match self.transition_table.input_symbol(t) {
                Some(sym) if sym == c => {
                    self.step_transition(t);
                    t += 1;
                }
                _ => return,
            }
        }
    }

    /// Append the transition's output symbol, recurse into its target, and
    /// undo the append on the way back out.
    #[inline]
    fn step_transition(&mut self, t: TransitionTableIndex) {
        let out_sym = self
            .transition_table
            .output_symbol(t)
            .expect("caller already confirmed this record exists");
        let target = self
            .transition_table
            .target(t)
            .expect("caller already confirmed this record exists");
        self.output.push(out_sym);
        self.get_analyses(target);
        self.output.pop();
    }
}
