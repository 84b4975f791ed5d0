//! Character offset bookkeeping
//!
//! Regex matches report byte offsets; edges are expressed in characters.

/// Byte/character offset table for one text
#[derive(Debug, Clone)]
pub struct CharMap<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()` as a sentinel
    boundaries: Vec<usize>,
}

impl<'a> CharMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Character index of a byte offset on a char boundary
    pub fn to_char(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    /// Text between two character indices (half-open); empty when reversed
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        let from = self.to_byte(start);
        let to = self.to_byte(end);
        if from >= to {
            ""
        } else {
            &self.text[from..to]
        }
    }

    fn to_byte(&self, ch: usize) -> usize {
        self.boundaries[ch.min(self.char_len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        let map = CharMap::new("hello");
        assert_eq!(map.char_len(), 5);
        assert_eq!(map.to_char(3), 3);
        assert_eq!(map.slice(1, 4), "ell");
    }

    #[test]
    fn test_multibyte() {
        let map = CharMap::new("연차 15일");
        assert_eq!(map.char_len(), 6);
        // '연' and '차' are three bytes each
        assert_eq!(map.to_char(6), 2);
        assert_eq!(map.slice(3, 6), "15일");
    }

    #[test]
    fn test_slice_out_of_range() {
        let map = CharMap::new("abc");
        assert_eq!(map.slice(2, 1), "");
        assert_eq!(map.slice(1, 99), "bc");
        assert_eq!(map.slice(5, 9), "");
    }
}
