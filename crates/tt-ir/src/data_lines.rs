//! Per-track data lines keyed by a single-character code.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Raw data-line strings of a track.
///
/// Each code holds at most one line; inserting under an existing code
/// replaces it. Iteration order is not part of the contract: processors look
/// up the codes they understand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataLines {
    lines: BTreeMap<char, String>,
}

impl DataLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `code`, returning the line it replaced.
    pub fn insert(&mut self, code: char, value: &str) -> Option<String> {
        self.lines.insert(code, String::from(value))
    }

    pub fn get(&self, code: char) -> Option<&str> {
        self.lines.get(&code).map(String::as_str)
    }

    pub fn contains(&self, code: char) -> bool {
        self.lines.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All `(code, line)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.lines.iter().map(|(c, s)| (*c, s.as_str()))
    }
}
