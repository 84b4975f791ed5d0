//! Anchor word location
//!
//! A word matches only as a whole token: each side is a space or an end of the
//! utterance. The flanking spaces become part of the anchor.

use regex::RegexBuilder;

use spantrim_core::{AnchorPosition, Result, TrimError};

use crate::offsets::CharMap;

/// Find every non-overlapping occurrence of `word`, left to right
///
/// Positions are half-open character ranges into `utterance`. An empty word
/// never matches.
pub fn find_word(
    utterance: &str,
    word: &str,
    case_sensitive: bool,
    no_spaces: bool,
) -> Result<Vec<AnchorPosition>> {
    find_in(&CharMap::new(utterance), word, case_sensitive, no_spaces)
}

pub(crate) fn find_in(
    utterance: &CharMap<'_>,
    word: &str,
    case_sensitive: bool,
    no_spaces: bool,
) -> Result<Vec<AnchorPosition>> {
    if word.is_empty() {
        return Ok(Vec::new());
    }

    let literal = regex::escape(word);
    let pattern = if no_spaces {
        literal
    } else {
        format!("(?:^| ){literal}(?: |$)")
    };

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| TrimError::InvalidPattern {
            pattern,
            reason: e.to_string(),
        })?;

    Ok(regex
        .find_iter(utterance.text())
        .map(|m| AnchorPosition::new(utterance.to_char(m.start()), utterance.to_char(m.end())))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, positions: &[AnchorPosition]) -> Vec<String> {
        let map = CharMap::new(text);
        positions
            .iter()
            .map(|p| map.slice(p.start, p.end).to_string())
            .collect()
    }

    #[test]
    fn test_word_in_middle_takes_both_spaces() {
        let text = "the quick brown fox";
        let found = find_word(text, "quick", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(3, 10)]);
        assert_eq!(spans(text, &found), vec![" quick "]);
    }

    #[test]
    fn test_word_at_edges() {
        let found = find_word("from here to there", "from", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(0, 5)]);

        let found = find_word("go there", "there", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(2, 8)]);
    }

    #[test]
    fn test_requires_a_space() {
        assert!(find_word("quickly", "quick", false, false).unwrap().is_empty());
        assert_eq!(
            find_word("quickly", "quick", false, true).unwrap(),
            vec![AnchorPosition::new(0, 5)]
        );
    }

    #[test]
    fn test_no_anchor_inside_words() {
        assert!(find_word("the quickly brown", "quick", false, false).unwrap().is_empty());
        assert!(find_word("a brown quick", "own", false, false).unwrap().is_empty());

        let text = "vado a Roma a piedi";
        let found = find_word(text, "a", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(4, 7), AnchorPosition::new(11, 14)]);
        assert_eq!(spans(text, &found), vec![" a ", " a "]);
    }

    #[test]
    fn test_whole_utterance_is_one_word() {
        assert_eq!(
            find_word("quick", "quick", false, false).unwrap(),
            vec![AnchorPosition::new(0, 5)]
        );
    }

    #[test]
    fn test_case_sensitivity() {
        let text = "call John now";
        assert_eq!(find_word(text, "john", false, false).unwrap().len(), 1);
        assert!(find_word(text, "john", true, false).unwrap().is_empty());
        assert_eq!(find_word(text, "John", true, false).unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_occurrences() {
        let text = "a to b to c";
        let found = find_word(text, "to", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(1, 5), AnchorPosition::new(6, 10)]);
    }

    #[test]
    fn test_literal_matching() {
        let found = find_word("cost is 5.00 usd", "5.00", false, false).unwrap();
        assert_eq!(found.len(), 1);
        assert!(find_word("cost is 5x00 usd", "5.00", false, false).unwrap().is_empty());
    }

    #[test]
    fn test_character_offsets() {
        let text = "출장비 from 서울";
        let found = find_word(text, "from", false, false).unwrap();
        assert_eq!(found, vec![AnchorPosition::new(3, 9)]);
    }

    #[test]
    fn test_empty_word() {
        assert!(find_word("anything", "", false, true).unwrap().is_empty());
    }
}
