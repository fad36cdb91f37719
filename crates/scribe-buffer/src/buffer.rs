//! Core text buffer implementation using rope data structure.
//!
//! ## Why Rope?
//!
//! A rope keeps insertions and deletions at O(log n) no matter where the
//! cursor is, and converts between character, byte and line offsets without
//! rescanning the document. The buffer layers the line/column `Position`
//! model on top of those conversions.
//!
//! ## Line Terminators
//!
//! Everything entering the buffer goes through [`normalize_line_endings`],
//! so the rope only ever contains `\n`. Loading CRLF content and serializing
//! it again yields LF; that is the one lossy transform the buffer performs.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::{BufferError, BufferResult, Position, TextRange};

/// Rewrites `\r\n` and lone `\r` as `\n`.
///
/// Returns the input unchanged (borrowed) when it holds no carriage return.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// A text buffer addressed by line and column.
///
/// There is always at least one line: an empty document is a single empty
/// line. Every operation taking a [`Position`] validates it and fails with
/// [`BufferError::OutOfRange`] rather than clamping.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` and `Sync`, but it performs no locking. Shared
/// borrows (searching, reading) may overlap; mutation needs `&mut self`.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding our text content
    rope: Rope,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use scribe_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.line_count(), 1);
    /// ```
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Replaces all content. Always succeeds.
    pub fn load(&mut self, content: &str) {
        self.rope = Rope::from_str(&normalize_line_endings(content));
    }

    /// Returns the content with lines joined by `\n`.
    pub fn serialize(&self) -> String {
        self.rope.to_string()
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// # Learning: Cow (Clone-on-Write)
    ///
    /// When the rope fits in a single chunk this borrows; larger documents
    /// spanning several chunks allocate.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns the content of a line, without its terminator.
    pub fn line(&self, line: usize) -> BufferResult<String> {
        let len = self.line_length(line)?;
        Ok(self.rope.line(line - 1).slice(..len).to_string())
    }

    /// Returns the text in `range` without modifying the buffer.
    pub fn read(&self, range: TextRange) -> BufferResult<String> {
        let chars = self.char_range(range)?;
        Ok(self.rope.slice(chars).to_string())
    }

    // ==================== Measurements ====================

    /// Returns true if the buffer holds no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Returns the number of characters, counting each `\n`.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines (at least 1).
    ///
    /// A buffer ending with `\n` counts the empty line after it.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Returns the length of a line in characters, excluding its terminator.
    pub fn line_length(&self, line: usize) -> BufferResult<usize> {
        if line == 0 || line > self.line_count() {
            return Err(BufferError::OutOfRange { line, column: 0 });
        }

        let slice = self.rope.line(line - 1);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            Ok(len - 1)
        } else {
            Ok(len)
        }
    }

    /// Returns the position after the last character.
    pub fn end_position(&self) -> Position {
        self.position_of_char(self.rope.len_chars())
    }

    /// Returns the range covering the whole document.
    pub fn full_range(&self) -> TextRange {
        TextRange::new(Position::START, self.end_position())
    }

    /// Returns the nearest valid position to `pos`.
    ///
    /// The buffer itself never clamps; this is for callers turning raw UI
    /// coordinates into positions before handing them to an operation.
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.clamp(1, self.line_count());
        let len = self.line_length(line).unwrap_or(0);
        Position::new(line, pos.column.min(len))
    }

    /// Returns true if `pos` addresses an existing slot.
    pub fn contains(&self, pos: Position) -> bool {
        self.char_index(pos).is_ok()
    }

    // ==================== Mutations ====================

    /// Inserts text at a position.
    ///
    /// Line terminators inside `text` split the line. Returns the position
    /// immediately after the inserted text.
    ///
    /// # Learning: `&mut self`
    ///
    /// The borrow checker guarantees nobody holds a `&TextBuffer` (a running
    /// search, for instance) while the content changes underneath them.
    pub fn insert(&mut self, pos: Position, text: &str) -> BufferResult<Position> {
        let char_idx = self.char_index(pos)?;
        let text = normalize_line_endings(text);

        self.rope.insert(char_idx, &text);
        Ok(pos.advanced_by(&text))
    }

    /// Removes the text in `range` and returns it.
    ///
    /// Ranges spanning a line boundary merge the lines on either side.
    pub fn delete(&mut self, range: TextRange) -> BufferResult<String> {
        let chars = self.char_range(range)?;
        let removed = self.rope.slice(chars.clone()).to_string();
        self.rope.remove(chars);
        Ok(removed)
    }

    // ==================== Position Conversion ====================

    /// Converts a position to a character index.
    ///
    /// # Learning: Bounds Checking
    ///
    /// We validate input before operations to maintain invariants.
    /// This prevents panics inside the rope and gives the caller a
    /// meaningful error instead.
    pub fn char_index(&self, pos: Position) -> BufferResult<usize> {
        let out_of_range = || BufferError::OutOfRange {
            line: pos.line,
            column: pos.column,
        };

        let len = self.line_length(pos.line).map_err(|_| out_of_range())?;
        if pos.column > len {
            return Err(out_of_range());
        }

        Ok(self.rope.line_to_char(pos.line - 1) + pos.column)
    }

    /// Validates a range and converts it to character indices.
    ///
    /// Endpoints are checked before ordering, so a range with an endpoint
    /// outside the buffer reports `OutOfRange` even if it is also reversed.
    fn char_range(&self, range: TextRange) -> BufferResult<Range<usize>> {
        let start = self.char_index(range.start)?;
        let end = self.char_index(range.end)?;
        if start > end {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(start..end)
    }

    /// Converts a character index (at most `len_chars`) to a position.
    pub(crate) fn position_of_char(&self, char_idx: usize) -> Position {
        let line = self.rope.char_to_line(char_idx);
        let column = char_idx - self.rope.line_to_char(line);
        Position::new(line + 1, column)
    }

    /// Converts a byte offset into `text()` to a position.
    pub(crate) fn position_of_byte(&self, byte_idx: usize) -> Position {
        self.position_of_char(self.rope.byte_to_char(byte_idx))
    }

    /// Converts a position to a byte offset into `text()`.
    pub(crate) fn byte_index(&self, pos: Position) -> BufferResult<usize> {
        let char_idx = self.char_index(pos)?;
        Ok(self.rope.char_to_byte(char_idx))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load(s);
        buffer
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position::new(line, column)
    }

    fn range(a: (usize, usize), b: (usize, usize)) -> TextRange {
        TextRange::new(pos(a.0, a.1), pos(b.0, b.1))
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_length(1).unwrap(), 0);
        assert_eq!(buffer.end_position(), Position::START);
    }

    #[test]
    fn test_load_normalizes_terminators() {
        let buffer = TextBuffer::from("a\r\nb\rc\n");
        assert_eq!(buffer.serialize(), "a\nb\nc\n");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line(4).unwrap(), "");
    }

    #[test]
    fn test_line_access() {
        let buffer = TextBuffer::from("Line 1\nLine 2\nLine 3");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(1).unwrap(), "Line 1");
        assert_eq!(buffer.line(3).unwrap(), "Line 3");
        assert!(matches!(
            buffer.line(0),
            Err(BufferError::OutOfRange { line: 0, .. })
        ));
        assert!(buffer.line(4).is_err());
    }

    #[test]
    fn test_insert_returns_cursor_after_text() {
        let mut buffer = TextBuffer::from("Hello");
        let cursor = buffer.insert(pos(1, 5), ", World!").unwrap();
        assert_eq!(cursor, pos(1, 13));
        assert_eq!(buffer.serialize(), "Hello, World!");
    }

    #[test]
    fn test_insert_splits_lines() {
        let mut buffer = TextBuffer::from("abcd");
        let cursor = buffer.insert(pos(1, 2), "X\r\nY").unwrap();
        assert_eq!(buffer.serialize(), "abX\nYcd");
        assert_eq!(cursor, pos(2, 1));
        assert_eq!(buffer.line_count(), 2);
    }

    #[test]
    fn test_insert_at_line_end_is_valid() {
        let mut buffer = TextBuffer::from("ab\ncd");
        buffer.insert(pos(1, 2), "!").unwrap();
        assert_eq!(buffer.serialize(), "ab!\ncd");
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut buffer = TextBuffer::from("ab\ncd");
        let err = buffer.insert(pos(1, 3), "x").unwrap_err();
        assert!(matches!(err, BufferError::OutOfRange { line: 1, column: 3 }));
        assert!(buffer.insert(pos(3, 0), "x").is_err());
        assert!(buffer.insert(pos(0, 0), "x").is_err());
        assert_eq!(buffer.serialize(), "ab\ncd");
    }

    #[test]
    fn test_delete_merges_lines() {
        let mut buffer = TextBuffer::from("hello\nworld");
        let removed = buffer.delete(range((1, 3), (2, 2))).unwrap();
        assert_eq!(removed, "lo\nwo");
        assert_eq!(buffer.serialize(), "helrld");
        assert_eq!(buffer.line_count(), 1);
    }

    #[test]
    fn test_delete_reversed_range() {
        let mut buffer = TextBuffer::from("hello world");
        let err = buffer.delete(range((1, 5), (1, 2))).unwrap_err();
        assert!(matches!(err, BufferError::InvalidRange { .. }));
        assert_eq!(buffer.serialize(), "hello world");
    }

    #[test]
    fn test_delete_out_of_range_wins_over_reversed() {
        let mut buffer = TextBuffer::from("abc");
        let err = buffer.delete(range((1, 9), (1, 0))).unwrap_err();
        assert!(matches!(err, BufferError::OutOfRange { .. }));
    }

    #[test]
    fn test_read_does_not_mutate() {
        let buffer = TextBuffer::from("one\ntwo\nthree");
        assert_eq!(buffer.read(range((1, 1), (3, 2))).unwrap(), "ne\ntwo\nth");
        assert_eq!(buffer.read(range((2, 1), (2, 1))).unwrap(), "");
        assert_eq!(buffer.serialize(), "one\ntwo\nthree");
    }

    #[test]
    fn test_columns_count_characters() {
        let mut buffer = TextBuffer::from("héllo wörld");
        assert_eq!(buffer.line_length(1).unwrap(), 11);
        let removed = buffer.delete(range((1, 1), (1, 2))).unwrap();
        assert_eq!(removed, "é");
        assert_eq!(buffer.serialize(), "hllo wörld");
    }

    #[test]
    fn test_clamp() {
        let buffer = TextBuffer::from("ab\ncdef");
        assert_eq!(buffer.clamp(pos(9, 9)), pos(2, 4));
        assert_eq!(buffer.clamp(pos(0, 5)), pos(1, 2));
        assert_eq!(buffer.clamp(pos(2, 1)), pos(2, 1));
    }

    #[test]
    fn test_full_range() {
        let buffer = TextBuffer::from("ab\ncdef\n");
        let all = buffer.full_range();
        assert_eq!(all.end, pos(3, 0));
        assert_eq!(buffer.read(all).unwrap(), "ab\ncdef\n");
    }

    #[test]
    fn test_unicode_line_separator_is_not_a_break() {
        let buffer = TextBuffer::from("a\u{2028}b");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_length(1).unwrap(), 3);
    }
}
