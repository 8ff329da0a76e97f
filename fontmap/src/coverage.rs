// Copyright 2026 the Fontmap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Memoized per-face character coverage.

use hashbrown::HashMap;
use icu_normalizer::properties::{CanonicalDecompositionBorrowed, Decomposed};

/// How well a face covers a character.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub enum CoverageLevel {
    /// The character is not covered.
    #[default]
    None,
    /// The character is covered with a substitute form.
    Approximate,
    /// The character is covered, directly or through all of the components
    /// of its canonical decomposition.
    Exact,
}

/// Memo of the characters a face does and does not cover.
///
/// The face itself is the authority on coverage; this structure only caches
/// its answers. Characters the face cannot map directly are checked through
/// their canonical decomposition, one level deep: a precomposed character
/// counts as covered when the face maps both its base and its combining
/// mark.
#[derive(Clone, Default, Debug)]
pub struct Coverage {
    covered: CodepointSet,
    uncovered: CodepointSet,
}

impl Coverage {
    /// Creates an empty coverage memo.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized level for `ch`, if any.
    pub fn lookup(&self, ch: char) -> Option<CoverageLevel> {
        if self.covered.contains(ch) {
            Some(CoverageLevel::Exact)
        } else if self.uncovered.contains(ch) {
            Some(CoverageLevel::None)
        } else {
            None
        }
    }

    /// Returns the coverage level for `ch`, consulting `has_char` and the
    /// canonical decomposition of `ch` only when the answer is not yet
    /// memoized.
    pub fn get(&mut self, ch: char, has_char: impl Fn(char) -> bool) -> CoverageLevel {
        if let Some(level) = self.lookup(ch) {
            return level;
        }
        let level = if has_char(ch) {
            CoverageLevel::Exact
        } else {
            let covers = |c: char| self.covered.contains(c) || has_char(c);
            let exact = match CanonicalDecompositionBorrowed::new().decompose(ch) {
                Decomposed::Default => false,
                Decomposed::Singleton(c) => covers(c),
                Decomposed::Expansion(base, mark) => covers(base) && covers(mark),
            };
            if exact {
                CoverageLevel::Exact
            } else {
                CoverageLevel::None
            }
        };
        self.set(ch, level);
        level
    }

    /// Records the coverage level for `ch`.
    ///
    /// Any level other than [`CoverageLevel::None`] is recorded as covered.
    pub fn set(&mut self, ch: char, level: CoverageLevel) {
        if level == CoverageLevel::None {
            self.covered.remove(ch);
            self.uncovered.insert(ch);
        } else {
            self.uncovered.remove(ch);
            self.covered.insert(ch);
        }
    }

    /// Returns the number of memoized characters.
    pub fn len(&self) -> usize {
        self.covered.len() + self.uncovered.len()
    }

    /// Returns true if nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

const PAGE_BITS: u32 = 8;
const WORDS_PER_PAGE: usize = (1 << PAGE_BITS) / 64;

/// Sparse two level bit set over Unicode scalar values.
#[derive(Clone, Default, Debug)]
struct CodepointSet {
    pages: HashMap<u32, [u64; WORDS_PER_PAGE]>,
    len: usize,
}

impl CodepointSet {
    fn split(ch: char) -> (u32, usize, u64) {
        let cp = u32::from(ch);
        let low = (cp & ((1 << PAGE_BITS) - 1)) as usize;
        (cp >> PAGE_BITS, low / 64, 1 << (low % 64))
    }

    fn contains(&self, ch: char) -> bool {
        let (page, word, bit) = Self::split(ch);
        self.pages
            .get(&page)
            .is_some_and(|words| words[word] & bit != 0)
    }

    fn insert(&mut self, ch: char) {
        let (page, word, bit) = Self::split(ch);
        let words = self.pages.entry(page).or_default();
        if words[word] & bit == 0 {
            words[word] |= bit;
            self.len += 1;
        }
    }

    fn remove(&mut self, ch: char) {
        let (page, word, bit) = Self::split(ch);
        let Some(words) = self.pages.get_mut(&page) else {
            return;
        };
        if words[word] & bit != 0 {
            words[word] &= !bit;
            self.len -= 1;
            if words.iter().all(|w| *w == 0) {
                self.pages.remove(&page);
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::{Coverage, CoverageLevel};
    use core::cell::Cell;

    #[test]
    fn memo_hit_skips_queries() {
        let queries = Cell::new(0);
        let has_char = |c: char| {
            queries.set(queries.get() + 1);
            c.is_ascii()
        };
        let mut coverage = Coverage::new();
        assert_eq!(coverage.get('a', has_char), CoverageLevel::Exact);
        assert_eq!(coverage.get('\u{4E2D}', has_char), CoverageLevel::None);
        let before = queries.get();
        assert_eq!(coverage.get('a', has_char), CoverageLevel::Exact);
        assert_eq!(coverage.get('\u{4E2D}', has_char), CoverageLevel::None);
        assert_eq!(queries.get(), before, "second lookups are memo hits");
    }

    #[test]
    fn decomposition_counts_as_exact() {
        // 'é' decomposes to 'e' + U+0301.
        let mut coverage = Coverage::new();
        let level = coverage.get('\u{E9}', |c| c == 'e' || c == '\u{301}');
        assert_eq!(level, CoverageLevel::Exact);

        let mut coverage = Coverage::new();
        let level = coverage.get('\u{E9}', |c| c == 'e');
        assert_eq!(level, CoverageLevel::None, "missing combining mark");
    }

    #[test]
    fn set_moves_between_sets() {
        let mut coverage = Coverage::new();
        coverage.set('x', CoverageLevel::None);
        assert_eq!(coverage.lookup('x'), Some(CoverageLevel::None));
        coverage.set('x', CoverageLevel::Approximate);
        assert_eq!(coverage.lookup('x'), Some(CoverageLevel::Exact));
        assert_eq!(coverage.len(), 1, "a character lives in one set");
    }

    #[test]
    fn copies_are_independent() {
        let mut coverage = Coverage::new();
        coverage.set('a', CoverageLevel::Exact);
        let mut copy = coverage.clone();
        copy.set('b', CoverageLevel::Exact);
        assert_eq!(coverage.lookup('b'), None, "original unchanged");
        assert_eq!(copy.lookup('a'), Some(CoverageLevel::Exact));
    }
}
