//! Find in document
//!
//! Linear search over a document body that ignores case and diacritics, so
//! "cafe" finds "Café" whether the accent is precomposed or a combining mark.
//! Match positions are byte ranges into the searched text and always cover
//! whole characters, including any trailing combining marks.

use std::ops::Range;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

/// One folded char and the byte offset of the source char it came from
type FoldedUnit = (usize, char);

/// All non-overlapping matches of `query` in `content`, left to right
pub fn find_matches(content: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = fold(query).into_iter().map(|(_, c)| c).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack = fold(content);
    let source_end = |index: usize| {
        haystack
            .get(index)
            .map(|(offset, _)| *offset)
            .unwrap_or(content.len())
    };

    let mut matches = Vec::new();
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        let end = i + needle.len();
        let hit = haystack[i..end]
            .iter()
            .zip(&needle)
            .all(|((_, a), b)| a == b)
            && starts_char(&haystack, i)
            && starts_char(&haystack, end);

        if hit {
            matches.push(haystack[i].0..source_end(end));
            i = end;
        } else {
            i += 1;
        }
    }

    matches
}

/// Canonically decompose `text`, drop combining marks and lowercase the rest.
///
/// Every folded char keeps the byte offset of the char it was derived from.
fn fold(text: &str) -> Vec<FoldedUnit> {
    let mut units = Vec::with_capacity(text.len());
    for (offset, c) in text.char_indices() {
        decompose_canonical(c, |part| {
            if !is_combining_mark(part) {
                units.extend(part.to_lowercase().map(|lower| (offset, lower)));
            }
        });
    }
    units
}

/// Whether `units[index]` is the first unit of its source char. The end of
/// the sequence counts as a boundary.
fn starts_char(units: &[FoldedUnit], index: usize) -> bool {
    match (index.checked_sub(1), units.get(index)) {
        (Some(prev), Some((offset, _))) => units[prev].0 != *offset,
        _ => true,
    }
}

/// Search bar state for the open document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    matches: Vec<Range<usize>>,
    /// 1-based index of the highlighted match, 0 when there is none
    current: usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute matches for `query` in `content`.
    ///
    /// Keeps the current position when it is still valid, otherwise moves
    /// to the first match.
    pub fn update(&mut self, content: &str, query: &str) {
        self.query = query.to_string();
        self.matches = find_matches(content, query);

        if self.matches.is_empty() {
            self.current = 0;
        } else if self.current == 0 || self.current > self.matches.len() {
            self.current = 1;
        }

        tracing::debug!(
            "Search for {:?} found {} matches",
            self.query,
            self.matches.len()
        );
    }

    /// Advance to the next match, wrapping to the first
    pub fn next(&mut self) -> Option<Range<usize>> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current % self.matches.len()) + 1;
        self.current_range()
    }

    /// Step back to the previous match, wrapping to the last
    pub fn previous(&mut self) -> Option<Range<usize>> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }
        self.current = ((self.current + total - 2) % total) + 1;
        self.current_range()
    }

    pub fn current_range(&self) -> Option<Range<usize>> {
        self.current
            .checked_sub(1)
            .and_then(|index| self.matches.get(index).cloned())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.matches.len()
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// "n of m", or `None` when nothing matched
    pub fn status(&self) -> Option<String> {
        if self.query.is_empty() || self.matches.is_empty() {
            return None;
        }
        Some(format!("{} of {}", self.current, self.matches.len()))
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
