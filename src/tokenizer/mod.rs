//! Longest-match letter trie: converts an input character stream into a
//! sequence of symbol numbers (§4.2).

use hashbrown::HashMap;

use crate::transducer::alphabet::Alphabet;
use crate::types::{SymbolNumber, NO_SYMBOL};

#[derive(Default, Debug)]
struct Node {
    symbols: HashMap<char, SymbolNumber>,
    children: HashMap<char, Node>,
}

impl Node {
    fn insert(&mut self, chars: &[char], symbol: SymbolNumber) {
        match chars {
            [] => {}
            [only] => {
                self.symbols.insert(*only, symbol);
            }
            [first, rest @ ..] => {
                self.children.entry(*first).or_default().insert(rest, symbol);
            }
        }
    }

    /// Longest match starting at `chars[*pos]`. On success, `*pos` is
    /// advanced past the match; on failure it is left unchanged.
    fn find(&self, chars: &[char], pos: &mut usize) -> SymbolNumber {
        if *pos >= chars.len() {
            return NO_SYMBOL;
        }
        let c = chars[*pos];
        *pos += 1;

        let via_child = self
            .children
            .get(&c)
            .map(|child| child.find(chars, pos))
            .filter(|&sym| sym != NO_SYMBOL);

        if let Some(sym) = via_child {
            return sym;
        }

        match self.symbols.get(&c) {
            Some(&sym) => sym,
            None => {
                *pos -= 1;
                NO_SYMBOL
            }
        }
    }
}

/// Maps a string prefix to the longest symbol number registered in the
/// alphabet, advancing a cursor over the match (§3 `LetterTrie`).
#[derive(Default, Debug)]
pub struct LetterTrie {
    root: Node,
}

impl LetterTrie {
    /// Build the trie from every non-empty alphabet entry (flag diacritic
    /// slots are stored as the empty string and are skipped, per §4.2).
    pub fn build(alphabet: &Alphabet) -> LetterTrie {
        let mut root = Node::default();
        for (n, symbol) in alphabet.key_table().iter().enumerate().skip(1) {
            if symbol.is_empty() {
                continue;
            }
            let chars: Vec<char> = symbol.chars().collect();
            root.insert(&chars, n as SymbolNumber);
        }
        LetterTrie { root }
    }

    /// Find the longest match in `chars` starting at `*pos`, advancing
    /// `*pos` past it. Returns `NO_SYMBOL` (and leaves `*pos` unchanged) if
    /// nothing matches.
    pub fn find(&self, chars: &[char], pos: &mut usize) -> SymbolNumber {
        self.root.find(chars, pos)
    }
}
