use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::error::Error;
use crate::types::SymbolNumber;

/// One of the six flag diacritic operations (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDiacriticOperator {
    /// Positive set.
    P,
    /// Negative set.
    N,
    /// Require.
    R,
    /// Disallow.
    D,
    /// Clear.
    C,
    /// Unify.
    U,
}

impl FlagDiacriticOperator {
    fn from_char(c: char) -> Option<FlagDiacriticOperator> {
        match c {
            'P' => Some(FlagDiacriticOperator::P),
            'N' => Some(FlagDiacriticOperator::N),
            'R' => Some(FlagDiacriticOperator::R),
            'D' => Some(FlagDiacriticOperator::D),
            'C' => Some(FlagDiacriticOperator::C),
            'U' => Some(FlagDiacriticOperator::U),
            _ => None,
        }
    }
}

/// A parsed `@X.FEAT.VAL@` (or `@X.FEAT@`) alphabet symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDiacriticOperation {
    pub operation: FlagDiacriticOperator,
    pub feature: SmolStr,
    pub value: SmolStr,
}

/// Symbol number to flag-diacritic-operation mapping.
pub type OperationsMap = HashMap<SymbolNumber, FlagDiacriticOperation>;

/// The alphabet: a symbol-number-indexed list of strings, plus the flag
/// diacritic operations recognized among them (§3, §4.1 step 4).
#[derive(Debug)]
pub struct Alphabet {
    key_table: Vec<SmolStr>,
    operations: OperationsMap,
}

/// Recognize `@X.FEAT.VAL@` / `@X.FEAT@`; anything else returns `None` and is
/// kept in the key table verbatim.
fn parse_flag_diacritic(symbol: &str) -> Option<FlagDiacriticOperation> {
    let chars: Vec<char> = symbol.chars().collect();
    if chars.len() <= 4 || chars[0] != '@' || *chars.last().unwrap() != '@' || chars[2] != '.' {
        return None;
    }
    let operation = FlagDiacriticOperator::from_char(chars[1])?;

    let inner = &symbol[1..symbol.len() - 1];
    let parts: Vec<&str> = inner.split('.').collect();
    match parts.len() {
        2 => Some(FlagDiacriticOperation {
            operation,
            feature: parts[1].into(),
            value: "".into(),
        }),
        3 => Some(FlagDiacriticOperation {
            operation,
            feature: parts[1].into(),
            value: parts[2].into(),
        }),
        _ => None,
    }
}

impl Alphabet {
    /// Parse `symbol_count` NUL-terminated UTF-8 symbol strings out of `buf`,
    /// starting at byte 0. Returns the alphabet and the number of bytes
    /// consumed.
    pub fn new(buf: &[u8], symbol_count: SymbolNumber) -> Result<(Alphabet, usize), Error> {
        let mut key_table = Vec::with_capacity(symbol_count as usize);
        let mut operations = OperationsMap::new();
        let mut offset = 0usize;

        for i in 0..symbol_count {
            let start = offset;
            while buf.get(offset).copied() != Some(0) {
                offset += 1;
                if offset > buf.len() {
                    return Err(Error::Malformed("truncated alphabet".into()));
                }
            }
            let symbol = std::str::from_utf8(&buf[start..offset])
                .map_err(|_| Error::Malformed(format!("invalid UTF-8 in alphabet symbol {}", i)))?;

            match parse_flag_diacritic(symbol) {
                Some(op) => {
                    operations.insert(i, op);
                    key_table.push(SmolStr::new(""));
                }
                None => key_table.push(SmolStr::new(symbol)),
            }

            offset += 1; // skip the NUL
        }

        key_table[0] = SmolStr::new("");

        Ok((
            Alphabet {
                key_table,
                operations,
            },
            offset,
        ))
    }

    #[inline]
    pub fn key_table(&self) -> &[SmolStr] {
        &self.key_table
    }

    #[inline]
    pub fn symbol(&self, n: SymbolNumber) -> Option<&SmolStr> {
        self.key_table.get(n as usize)
    }

    #[inline]
    pub fn operations(&self) -> &OperationsMap {
        &self.operations
    }

    #[inline]
    pub fn operation(&self, n: SymbolNumber) -> Option<&FlagDiacriticOperation> {
        self.operations.get(&n)
    }

    #[inline]
    pub fn is_flag(&self, n: SymbolNumber) -> bool {
        self.operations.contains_key(&n)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.key_table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.key_table.is_empty()
    }
}
