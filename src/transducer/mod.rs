//! Loading and applying HFST optimized-lookup transducers (§1, §4, §5).

pub mod alphabet;
mod engine;
mod flag_state;
pub mod header;
pub mod index_table;
pub mod transition_table;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use memmap::Mmap;
use smol_str::SmolStr;

use crate::error::Error;
use crate::tokenizer::LetterTrie;
use crate::types::{
    SymbolNumber, INDEX_TABLE_RECORD_SIZE, NO_SYMBOL, TRANSITION_TABLE_RECORD_SIZE,
};

use alphabet::Alphabet;
use engine::SearchState;
use header::TransducerHeader;
use index_table::IndexTable;
use transition_table::TransitionTable;

/// A loaded HFST optimized-lookup transducer, ready to apply to input
/// strings (§5). Immutable once loaded; `apply`/`apply_bulk` take `&self`
/// and are safe to call concurrently.
#[derive(Debug)]
pub struct Transducer {
    header: TransducerHeader,
    alphabet: Alphabet,
    index_table: IndexTable,
    transition_table: TransitionTable,
    trie: LetterTrie,
}

impl Transducer {
    /// Memory-map `path` and parse it as an HFST optimized-lookup
    /// transducer (§4.1). The mapping is kept alive for the lifetime of the
    /// returned `Transducer`; table reads are lazy against it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Transducer, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let buf = Arc::new(mmap);

        let header = TransducerHeader::new(&buf)?;

        let alphabet_start = header.len();
        let (alphabet, alphabet_len) =
            Alphabet::new(&buf[alphabet_start..], header.symbol_count())?;

        let index_start = alphabet_start + alphabet_len;
        let index_len = header.index_table_size();
        let index_end = index_start + index_len as usize * INDEX_TABLE_RECORD_SIZE;
        if buf.len() < index_end {
            return Err(Error::Malformed("truncated index table".into()));
        }
        let index_table = IndexTable::new(Arc::clone(&buf), index_start, index_len);

        let transition_len = header.target_table_size();
        let transition_end = index_end + transition_len as usize * TRANSITION_TABLE_RECORD_SIZE;
        if buf.len() < transition_end {
            return Err(Error::Malformed("truncated transition table".into()));
        }
        let transition_table = TransitionTable::new(Arc::clone(&buf), index_end, transition_len);

        let trie = LetterTrie::build(&alphabet);

        log::debug!(
            "loaded transducer: {} symbols, {} index records, {} transitions, {} states",
            header.symbol_count(),
            index_len,
            transition_len,
            header.number_of_states(),
        );

        Ok(Transducer {
            header,
            alphabet,
            index_table,
            transition_table,
            trie,
        })
    }

    /// The parsed header, for inspecting transducer metadata (symbol
    /// counts, state/transition counts, structural flags).
    #[inline]
    pub fn header(&self) -> &TransducerHeader {
        &self.header
    }

    /// Apply the transducer to a single input string (§4.5).
    ///
    /// Returns the empty set if `input` cannot be fully tokenized against
    /// the transducer's alphabet, or if tokenization succeeds but no path
    /// through the transducer accepts it — both are ordinary outcomes, not
    /// errors.
    ///
    /// When `concat` is `true`, runs of single-character output symbols are
    /// merged into single strings (§4.5); multi-character symbols (tags
    /// like `+N` or flag diacritics, which are already empty) are kept as
    /// separate entries either way.
    pub fn apply(&self, input: &str, concat: bool) -> HashSet<Vec<SmolStr>> {
        log::debug!("apply: {} chars", input.chars().count());
        let mut result = HashSet::new();
        let tokenized = match self.tokenize(input) {
            Some(t) => t,
            None => return result,
        };

        let analyses = SearchState::new(
            &self.alphabet,
            &self.index_table,
            &self.transition_table,
            tokenized,
        )
        .run();

        for analysis in analyses {
            let symbols = if concat { concatenate(&analysis) } else { analysis };
            result.insert(symbols);
        }
        result
    }

    /// Apply the transducer to many inputs at once (§4.5). Duplicate inputs
    /// are only analyzed once.
    pub fn apply_bulk<'a, I>(&self, inputs: I, concat: bool) -> HashMap<String, HashSet<Vec<SmolStr>>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        log::debug!("apply_bulk starting");
        let mut results = HashMap::new();
        for input in inputs {
            if results.contains_key(input) {
                continue;
            }
            let analyses = self.apply(input, concat);
            results.insert(input.to_string(), analyses);
        }
        results
    }

    /// Tokenize `input` into symbol numbers terminated by `NO_SYMBOL`, or
    /// `None` if the letter trie cannot consume the whole string (§4.2).
    fn tokenize(&self, input: &str) -> Option<Vec<SymbolNumber>> {
        if input.is_empty() {
            return None;
        }
        let chars: Vec<char> = input.chars().collect();
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let sym = self.trie.find(&chars, &mut pos);
            if sym == NO_SYMBOL {
                return None;
            }
            tokens.push(sym);
        }
        tokens.push(NO_SYMBOL);
        Some(tokens)
    }
}

/// Merge adjacent single-character output symbols into one string apiece,
/// leaving multi-character symbols (tags, compound boundaries) untouched
/// (§4.5).
fn concatenate(symbols: &[SmolStr]) -> Vec<SmolStr> {
    let mut out = Vec::with_capacity(symbols.len());
    let mut run = String::new();

    for symbol in symbols {
        if symbol.chars().count() == 1 {
            run.push_str(symbol);
        } else {
            if !run.is_empty() {
                out.push(SmolStr::new(&run));
                run.clear();
            }
            out.push(symbol.clone());
        }
    }
    if !run.is_empty() {
        out.push(SmolStr::new(&run));
    }
    out
}
