//! End-to-end tests against hand-built optimized-lookup binaries, covering
//! the scenarios a basic analyzer has to get right: plain concatenation,
//! epsilon/tag continuations, unmatched input, and bulk application.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use byteorder::{ByteOrder, LittleEndian};

use hfstol::types::{
    HEADER_SIZE, INDEX_TABLE_RECORD_SIZE, NO_SYMBOL, NO_TABLE_INDEX, TRANSITION_TABLE_RECORD_SIZE,
    TRANSITION_TABLE_START,
};
use hfstol::Transducer;

/// A from-scratch optimized-lookup binary, assembled one table at a time.
struct Builder {
    alphabet: Vec<&'static str>,
    index_table: Vec<(u16, u32)>,
    transition_table: Vec<(u16, u16, u32)>,
}

impl Builder {
    fn new(alphabet: Vec<&'static str>) -> Builder {
        Builder {
            alphabet,
            index_table: Vec::new(),
            transition_table: Vec::new(),
        }
    }

    /// Pad the index table up to `len` records (used to leave room for
    /// perfect-hash slots between a state's final-check record and its
    /// addressed arcs).
    fn pad_index(&mut self, len: usize) {
        while self.index_table.len() < len {
            self.index_table.push((NO_SYMBOL, NO_TABLE_INDEX));
        }
    }

    fn set_index(&mut self, i: usize, symbol: u16, target: u32) {
        self.pad_index(i + 1);
        self.index_table[i] = (symbol, target);
    }

    fn pad_transitions(&mut self, len: usize) {
        while self.transition_table.len() < len {
            self.transition_table.push((NO_SYMBOL, NO_SYMBOL, 0));
        }
    }

    fn set_transition(&mut self, i: usize, input: u16, output: u16, target: u32) {
        self.pad_transitions(i + 1);
        self.transition_table[i] = (input, output, target);
    }

    fn build(&self) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.alphabet.len() as u16);
        LittleEndian::write_u16(&mut buf[2..4], self.alphabet.len() as u16);
        LittleEndian::write_u32(&mut buf[4..8], self.index_table.len() as u32);
        LittleEndian::write_u32(&mut buf[8..12], self.transition_table.len() as u32);
        // number_of_states / number_of_transitions are informational only.
        LittleEndian::write_u32(&mut buf[12..16], 0);
        LittleEndian::write_u32(&mut buf[16..20], 0);

        for symbol in &self.alphabet {
            buf.extend_from_slice(symbol.as_bytes());
            buf.push(0);
        }

        for (symbol, target) in &self.index_table {
            let mut rec = [0u8; INDEX_TABLE_RECORD_SIZE];
            LittleEndian::write_u16(&mut rec[0..2], *symbol);
            LittleEndian::write_u32(&mut rec[2..6], *target);
            buf.extend_from_slice(&rec);
        }

        for (input, output, target) in &self.transition_table {
            let mut rec = [0u8; TRANSITION_TABLE_RECORD_SIZE];
            LittleEndian::write_u16(&mut rec[0..2], *input);
            LittleEndian::write_u16(&mut rec[2..4], *output);
            LittleEndian::write_u32(&mut rec[4..8], *target);
            buf.extend_from_slice(&rec);
        }

        buf
    }
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp(bytes: &[u8]) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!("hfstol-apply-test-{}-{}.bin", std::process::id(), n));
    fs::write(&path, bytes).unwrap();
    path
}

/// Accepts exactly "a", analyzing it as "a" + the tag "+N".
///
/// Layout: root (index table) --'a'--> transition-table state 10 (not yet
/// final) --epsilon/"+N"--> transition-table state 20 (final).
fn single_arc_with_tag() -> Vec<u8> {
    let mut b = Builder::new(vec!["", "a", "+N"]);

    // Root: index_table[0] is root's own final-check record (not final).
    b.set_index(0, NO_SYMBOL, NO_TABLE_INDEX);
    // index_table[1]: no epsilon continuation out of root.
    b.set_index(1, NO_SYMBOL, 0);
    // index_table[2] = index_table[1 + 'a']: perfect-hash slot for 'a'.
    b.set_index(2, 1, TRANSITION_TABLE_START);

    // Transition table index 0: root's only arc, 'a' -> 'a', to state 10.
    b.set_transition(0, 1, 1, TRANSITION_TABLE_START + 10);
    b.set_transition(1, NO_SYMBOL, NO_SYMBOL, 0); // end of root's arc list

    // State 10: final-check record (not final; must still emit the tag).
    b.set_transition(10, NO_SYMBOL, NO_SYMBOL, 0);
    // State 10's arc list: epsilon emitting "+N", to state 20.
    b.set_transition(11, 0, 2, TRANSITION_TABLE_START + 20);
    b.set_transition(12, NO_SYMBOL, NO_SYMBOL, 0);

    // State 20: final-check record, final.
    b.set_transition(20, NO_SYMBOL, NO_SYMBOL, 1);
    b.set_transition(21, NO_SYMBOL, NO_SYMBOL, 0);

    b.build()
}

#[test]
fn analyzes_single_arc_through_epsilon_tag() {
    let path = write_temp(&single_arc_with_tag());
    let transducer = Transducer::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let result = transducer.apply("a", false);
    assert_eq!(result.len(), 1);
    let analysis: Vec<String> = result.into_iter().next().unwrap().into_iter().map(|s| s.to_string()).collect();
    assert_eq!(analysis, vec!["a".to_string(), "+N".to_string()]);

    let concatenated = transducer.apply("a", true);
    let analysis: Vec<String> = concatenated
        .into_iter()
        .next()
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(analysis, vec!["a".to_string(), "+N".to_string()]);
}

#[test]
fn unmatched_input_yields_empty_result() {
    let path = write_temp(&single_arc_with_tag());
    let transducer = Transducer::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert!(transducer.apply("b", false).is_empty());
    assert!(transducer.apply("abcdefg", false).is_empty());
    assert!(transducer.apply("", false).is_empty());
}

/// Accepts "ab", analyzing it as the concatenated run "ab" + the tag "+N"
/// (exercising multi-symbol concatenation, not just a single character).
fn two_arc_run_with_tag() -> Vec<u8> {
    let mut b = Builder::new(vec!["", "a", "b", "+N"]);

    b.set_index(0, NO_SYMBOL, NO_TABLE_INDEX);
    b.set_index(1, NO_SYMBOL, 0);
    b.set_index(2, 1, TRANSITION_TABLE_START); // 1 + 'a'(1) = 2

    b.set_transition(0, 1, 1, TRANSITION_TABLE_START + 10); // 'a':'a' -> state 10
    b.set_transition(1, NO_SYMBOL, NO_SYMBOL, 0);

    // State 10: not final, single arc on 'b'.
    b.set_transition(10, NO_SYMBOL, NO_SYMBOL, 0);
    b.set_transition(11, 2, 2, TRANSITION_TABLE_START + 20); // 'b':'b' -> state 20
    b.set_transition(12, NO_SYMBOL, NO_SYMBOL, 0);

    // State 20: not final, epsilon emitting "+N" -> state 30.
    b.set_transition(20, NO_SYMBOL, NO_SYMBOL, 0);
    b.set_transition(21, 0, 3, TRANSITION_TABLE_START + 30);
    b.set_transition(22, NO_SYMBOL, NO_SYMBOL, 0);

    // State 30: final.
    b.set_transition(30, NO_SYMBOL, NO_SYMBOL, 1);
    b.set_transition(31, NO_SYMBOL, NO_SYMBOL, 0);

    b.build()
}

#[test]
fn concatenation_merges_multi_character_run() {
    let path = write_temp(&two_arc_run_with_tag());
    let transducer = Transducer::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let unconcatenated: Vec<String> = transducer
        .apply("ab", false)
        .into_iter()
        .next()
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(unconcatenated, vec!["a".to_string(), "b".to_string(), "+N".to_string()]);

    let concatenated: Vec<String> = transducer
        .apply("ab", true)
        .into_iter()
        .next()
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(concatenated, vec!["ab".to_string(), "+N".to_string()]);
}

#[test]
fn apply_bulk_deduplicates_repeated_inputs() {
    let path = write_temp(&two_arc_run_with_tag());
    let transducer = Transducer::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let results = transducer.apply_bulk(vec!["ab", "ab", "nomatch"], true);
    assert_eq!(results.len(), 2);
    assert!(!results["ab"].is_empty());
    assert!(results["nomatch"].is_empty());
}

/// Accepts "x", with two competing flag-diacritic continuations from the
/// same state: `@P.FOO.BAR@` (always succeeds) leading to acceptance, and
/// `@R.FOO.BAR@` (fails, since nothing set FOO on that independent branch)
/// leading nowhere. Exercises the engine's flag-diacritic arm, not just the
/// standalone `FlagDiacriticState` unit tests.
fn flag_diacritic_branch() -> Vec<u8> {
    let mut b = Builder::new(vec!["", "x", "@P.FOO.BAR@", "@R.FOO.BAR@"]);

    b.set_index(0, NO_SYMBOL, NO_TABLE_INDEX);
    b.set_index(1, NO_SYMBOL, 0);
    b.set_index(2, 1, TRANSITION_TABLE_START); // 1 + 'x'(1) = 2

    b.set_transition(0, 1, 1, TRANSITION_TABLE_START + 10); // 'x':'x' -> state 10
    b.set_transition(1, NO_SYMBOL, NO_SYMBOL, 0);

    // State 10: not final. Two flag arcs, tried independently.
    b.set_transition(10, NO_SYMBOL, NO_SYMBOL, 0);
    b.set_transition(11, 2, 2, TRANSITION_TABLE_START + 20); // @P.FOO.BAR@ -> state 20
    b.set_transition(12, 3, 3, TRANSITION_TABLE_START + 40); // @R.FOO.BAR@ -> (never reached)
    b.set_transition(13, NO_SYMBOL, NO_SYMBOL, 0);

    // State 20: final.
    b.set_transition(20, NO_SYMBOL, NO_SYMBOL, 1);
    b.set_transition(21, NO_SYMBOL, NO_SYMBOL, 0);

    b.build()
}

#[test]
fn flag_diacritic_require_fails_without_prior_positive_set() {
    let path = write_temp(&flag_diacritic_branch());
    let transducer = Transducer::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let result = transducer.apply("x", false);
    // Only the @P.FOO.BAR@ branch reaches an accepting state; @R.FOO.BAR@
    // fails its push (FOO isn't set on that independent branch) and
    // contributes nothing.
    assert_eq!(result.len(), 1);
    let analysis: Vec<String> = result.into_iter().next().unwrap().into_iter().map(|s| s.to_string()).collect();
    assert_eq!(analysis, vec!["x".to_string()]);
}

#[test]
fn rejects_weighted_transducer() {
    let mut buf = vec![0u8; HEADER_SIZE];
    LittleEndian::write_u16(&mut buf[0..2], 1);
    LittleEndian::write_u16(&mut buf[2..4], 1);
    LittleEndian::write_u32(&mut buf[20..24], 1); // weighted flag
    buf.extend_from_slice(b"\0");

    let path = write_temp(&buf);
    let err = Transducer::load(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(matches!(err, hfstol::Error::UnsupportedWeighted));
}
