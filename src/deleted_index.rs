//! A long-substring multi-pattern recognizer over the literal text of
//! recently-removed comments, used to detect restorations.
//! Grounded on the Aho-Corasick automaton family; `aho_corasick`'s
//! `LeftmostLongest` match kind gives exactly the "longest non-overlapping
//! matches, scanned left to right" contract the classifier needs, so no
//! custom trie walk is required on top of it.

use aho_corasick::{AhoCorasick, MatchKind};

/// `(action_id, indentation)` — the value recorded for a removed comment.
pub type DeletedValue = (String, i64);

#[derive(Clone)]
pub struct DeletedIndex {
    patterns: Vec<String>,
    values: Vec<DeletedValue>,
    automaton: Option<AhoCorasick>,
}

impl DeletedIndex {
    pub fn new() -> Self {
        Self { patterns: Vec::new(), values: Vec::new(), automaton: None }
    }

    /// Register a removed comment's literal text. The automaton is rebuilt
    /// lazily on the next `findall_long` call.
    pub fn add(&mut self, text: impl Into<String>, value: DeletedValue) {
        self.patterns.push(text.into());
        self.values.push(value);
        self.automaton = None;
    }

    /// Keep only entries whose value satisfies `keep`; used to bound the
    /// index by the configured retention window.
    pub fn retain(&mut self, mut keep: impl FnMut(&DeletedValue) -> bool) {
        let mut patterns = Vec::new();
        let mut values = Vec::new();
        for (p, v) in self.patterns.drain(..).zip(self.values.drain(..)) {
            if keep(&v) {
                patterns.push(p);
                values.push(v);
            }
        }
        self.patterns = patterns;
        self.values = values;
        self.automaton = None;
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn ensure_built(&mut self) {
        if self.automaton.is_none() && !self.patterns.is_empty() {
            self.automaton = AhoCorasick::builder()
                .match_kind(MatchKind::LeftmostLongest)
                .build(&self.patterns)
                .ok();
        }
    }

    /// Longest, non-overlapping matches of any registered pattern in
    /// `text`, scanned left to right. Returns `(start_byte, end_byte,
    /// value)` triples.
    pub fn findall_long(&mut self, text: &str) -> Vec<(usize, usize, DeletedValue)> {
        self.ensure_built();
        let Some(automaton) = &self.automaton else {
            return Vec::new();
        };
        automaton
            .find_iter(text)
            .map(|m| (m.start(), m.end(), self.values[m.pattern().as_usize()].clone()))
            .collect()
    }
}

impl Default for DeletedIndex {
    fn default() -> Self {
        Self::new()
    }
}
