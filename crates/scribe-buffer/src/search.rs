//! Literal substring search.
//!
//! The buffer is scanned as one logical text stream with lines joined by
//! `\n`, so a query containing `\n` can match across a line boundary.
//! Matches never overlap: scanning resumes at the end of the previous one.
//!
//! Search holds no state between calls. The returned [`Matches`] iterator
//! borrows the buffer, so the borrow checker rules out an edit while a
//! search is in flight.

use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::{BufferError, BufferResult, Position, TextBuffer, TextRange, normalize_line_endings};

/// Lazy iterator over the matches of a literal query, in document order.
///
/// Restart a search by calling [`find_all`] again.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    buffer: &'a TextBuffer,
    haystack: Cow<'a, str>,
    needle: Cow<'a, str>,
    /// Byte offset where scanning resumes
    offset: usize,
}

impl<'a> Matches<'a> {
    fn starting_at(buffer: &'a TextBuffer, query: &'a str, offset: usize) -> Self {
        Self {
            buffer,
            haystack: buffer.text(),
            needle: normalize_line_endings(query),
            offset,
        }
    }
}

impl Iterator for Matches<'_> {
    type Item = TextRange;

    fn next(&mut self) -> Option<TextRange> {
        if self.needle.is_empty() || self.offset >= self.haystack.len() {
            return None;
        }

        let found = self.haystack[self.offset..].find(&*self.needle)?;
        let start = self.offset + found;
        let end = start + self.needle.len();
        self.offset = end;

        Some(TextRange::new(
            self.buffer.position_of_byte(start),
            self.buffer.position_of_byte(end),
        ))
    }
}

impl FusedIterator for Matches<'_> {}

/// Finds every non-overlapping occurrence of `query`.
///
/// An empty query never matches. Line endings in the query are normalized
/// the same way inserted text is, so `"a\r\nb"` finds `"a\nb"`.
///
/// # Example
/// ```
/// use scribe_buffer::{find_all, Position, TextBuffer};
///
/// let buffer = TextBuffer::from("hello world\nsay hello");
/// let starts: Vec<Position> = find_all(&buffer, "hello").map(|m| m.start).collect();
/// assert_eq!(starts, vec![Position::new(1, 0), Position::new(2, 4)]);
/// ```
pub fn find_all<'a>(buffer: &'a TextBuffer, query: &'a str) -> Matches<'a> {
    Matches::starting_at(buffer, query, 0)
}

/// Finds the first occurrence of `query` starting at or after `from`.
///
/// Fails with `OutOfRange` if `from` is not a valid position and with
/// `NotFound` if nothing matches before the end of the document.
pub fn find_first_from(
    buffer: &TextBuffer,
    query: &str,
    from: Position,
) -> BufferResult<TextRange> {
    let offset = buffer.byte_index(from)?;
    Matches::starting_at(buffer, query, offset)
        .next()
        .ok_or(BufferError::NotFound)
}
