//! Whitespace-aware text splitter.

use serde::{Deserialize, Serialize};

/// Split `text` into pieces of at most `max_chars` characters.
///
/// While the remainder is longer than the limit, the split point is the last
/// newline inside the first `max_chars` characters, else the last space, else
/// a hard cut at `max_chars`. The delimiter stays at the start of the next
/// piece, so concatenating the pieces gives back `text` exactly.
///
/// Lengths are counted in chars. An empty input yields a single empty piece.
pub fn split_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut rest = text;

    // `nth(max_chars)` is Some only while the remainder exceeds the limit
    while let Some((window_end, _)) = rest.char_indices().nth(max_chars) {
        let window = &rest[..window_end];
        let split_at = last_break(window, '\n')
            .or_else(|| last_break(window, ' '))
            .unwrap_or(window_end);

        let (head, tail) = rest.split_at(split_at);
        pieces.push(head);
        rest = tail;
    }

    pieces.push(rest);
    pieces
}

/// Last position of `delimiter` in `window`, ignoring offset 0 which would
/// produce an empty piece and never advance.
fn last_break(window: &str, delimiter: char) -> Option<usize> {
    window.rfind(delimiter).filter(|&i| i > 0)
}

/// A piece of a larger document with its position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position of this chunk (1-based)
    pub index: usize,

    /// Number of chunks the document was split into
    pub total: usize,

    /// The chunk text
    pub content: String,
}

impl TextChunk {
    /// Length of the chunk in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Check if the chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Splitter bound to a fixed per-chunk character limit.
///
/// Used with different limits for report sections, translation input and
/// speech synthesis requests.
#[derive(Debug, Clone, Copy)]
pub struct BoundarySplitter {
    max_chars: usize,
}

impl BoundarySplitter {
    /// Create a splitter with the given character limit.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    /// The configured character limit.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into borrowed pieces.
    pub fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_text(text, self.max_chars)
    }

    /// Split text into numbered chunks.
    pub fn chunks(&self, text: &str) -> Vec<TextChunk> {
        let pieces = self.split(text);
        let total = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(i, content)| TextChunk {
                index: i + 1,
                total,
                content: content.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    fn assert_round_trip(text: &str, max_chars: usize) -> Vec<&str> {
        let pieces = split_text(text, max_chars);
        assert_eq!(pieces.concat(), text);
        for piece in &pieces {
            assert!(char_len(piece) <= max_chars.max(1), "piece too long: {piece:?}");
        }
        pieces
    }

    #[test]
    fn test_empty_text_yields_single_empty_chunk() {
        assert_eq!(split_text("", 10), vec![""]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_text("Hello, world!", 100), vec!["Hello, world!"]);
        assert_eq!(split_text("exactly10!", 10), vec!["exactly10!"]);
    }

    #[test]
    fn test_prefers_newline_over_space() {
        let text = "alpha beta\ngamma delta epsilon";
        let pieces = assert_round_trip(text, 16);
        assert_eq!(pieces[0], "alpha beta");
        assert!(pieces[1].starts_with('\n'));
    }

    #[test]
    fn test_falls_back_to_space() {
        let pieces = assert_round_trip("one two three four", 10);
        assert_eq!(pieces, vec!["one two", " three", " four"]);
    }

    #[test]
    fn test_hard_cut_without_whitespace() {
        let pieces = assert_round_trip("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(pieces, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_leading_delimiter_does_not_stall() {
        let text = format!("\n{}", "x".repeat(25));
        let pieces = assert_round_trip(&text, 10);
        assert_eq!(pieces[0], "\nxxxxxxxxx");
        assert!(pieces.iter().all(|p| !p.is_empty()));
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let text = "नमस्ते दुनिया ".repeat(20);
        let pieces = assert_round_trip(&text, 15);
        assert!(pieces.len() > 1);
    }

    #[test]
    fn test_zero_limit_is_treated_as_one() {
        let pieces = split_text("abc", 0);
        assert_eq!(pieces, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_round_trip_mixed_documents() {
        let report = "Hemoglobin 10.2 g/dL (low)\nWBC 11,000 /uL\n\nImpression: mild anemia. ".repeat(40);
        for limit in [1, 7, 50, 100, 333, 5000] {
            assert_round_trip(&report, limit);
        }
    }

    #[test]
    fn test_chunks_are_numbered() {
        let splitter = BoundarySplitter::new(10);
        let chunks = splitter.chunks("one two three four");
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].index, 1);
        assert!(chunks.iter().all(|c| c.total == 3));
        assert_eq!(chunks[2].content, " four");
        assert_eq!(chunks[2].char_len(), 5);
    }
}
