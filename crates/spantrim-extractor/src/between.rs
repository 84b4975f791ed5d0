//! Pattern matching for `between` conditions
//!
//! Patterns run over the utterance padded with one space on each side, so a
//! rule can anchor on whitespace at the very start or end of the text.
//! Offsets are shifted back by one into the unpadded utterance; a match that
//! consumes the leading pad therefore starts at -1.

use regex::{Matches, Regex};

use spantrim_core::{Condition, Edge, SpanStrategy};

use crate::offsets::CharMap;
use crate::skip::retain_unskipped;

/// Confidence of every `between` match
pub const BETWEEN_ACCURACY: f64 = 1.0;

/// Lazy left-to-right sequence of non-overlapping, non-empty matches
///
/// Empty matches are skipped and the underlying search always advances, so
/// the sequence terminates for any pattern.
pub struct BetweenMatches<'r, 't> {
    matches: Matches<'r, 't>,
    padded: CharMap<'t>,
    entity: &'r str,
}

impl<'r, 't> BetweenMatches<'r, 't> {
    /// Scan `padded`, which must be the utterance wrapped in single spaces
    pub fn new(regex: &'r Regex, padded: &'t str, entity: &'r str) -> Self {
        Self {
            matches: regex.find_iter(padded),
            padded: CharMap::new(padded),
            entity,
        }
    }
}

impl Iterator for BetweenMatches<'_, '_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        loop {
            let found = self.matches.next()?;
            if found.as_str().is_empty() {
                continue;
            }

            let start = self.padded.to_char(found.start()) as i64 - 1;
            return Some(Edge::new(
                SpanStrategy::Between.as_str(),
                start,
                found.as_str(),
                BETWEEN_ACCURACY,
                self.entity,
            ));
        }
    }
}

/// Pad an utterance for `between` matching
pub fn pad(utterance: &str) -> String {
    format!(" {utterance} ")
}

/// Every match of the condition's pattern, minus skip-listed texts
///
/// A condition without a pattern matches nothing.
pub fn match_between(utterance: &str, condition: &Condition, entity: &str) -> Vec<Edge> {
    let Some(pattern) = condition.regex.as_ref() else {
        return Vec::new();
    };

    let padded = pad(utterance);
    let edges: Vec<Edge> = BetweenMatches::new(pattern.regex(), &padded, entity).collect();
    retain_unskipped(edges, condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spantrim_core::Pattern;

    const ENTITY: &str = "extract-trim";

    fn between(pattern: &str) -> Condition {
        Condition::between(Pattern::new(pattern).unwrap())
    }

    #[test]
    fn test_exhaustive_scan() {
        let edges = match_between("a 1 b 2 c", &between(r"\d"), ENTITY);

        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].start, edges[0].end, edges[0].len), (2, 2, 1));
        assert_eq!((edges[1].start, edges[1].end), (6, 6));
        assert_eq!(edges[1].source_text, "2");
        assert!(edges
            .iter()
            .all(|e| e.accuracy == BETWEEN_ACCURACY && e.edge_type == "between"));
    }

    #[test]
    fn test_idempotent() {
        let condition = between(r"\d");
        let first = match_between("a 1 b 2 c", &condition, ENTITY);
        let second = match_between("a 1 b 2 c", &condition, ENTITY);
        assert_eq!(first, second);
    }

    #[test]
    fn test_pattern_on_padding() {
        let edges = match_between("from madrid to paris", &between(r" from (\w+) "), ENTITY);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].start, -1);
        assert_eq!(edges[0].source_text, " from madrid ");
        assert_eq!(edges[0].end, edges[0].start + edges[0].len as i64 - 1);
    }

    #[test]
    fn test_case_insensitive_literal() {
        let edges = match_between("Book A Flight", &between("/a flight/i"), ENTITY);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_text, "A Flight");
        assert_eq!(edges[0].start, 5);
    }

    #[test]
    fn test_zero_width_matches_terminate() {
        let edges = match_between("abc", &between("x*"), ENTITY);
        assert!(edges.is_empty());

        let edges = match_between("axxb", &between("x*"), ENTITY);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_text, "xx");
    }

    #[test]
    fn test_skip_list_applies() {
        let condition = between(r"\d").with_skip(["2"]);
        let edges = match_between("a 1 b 2 c", &condition, ENTITY);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source_text, "1");
    }

    #[test]
    fn test_missing_pattern() {
        let condition = Condition::positional(SpanStrategy::Between, ["x"]);
        assert!(match_between("x y", &condition, ENTITY).is_empty());
    }
}
