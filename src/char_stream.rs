// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::ops::Range;
use crate::error::StreamError;

/// Handle returned by [CharStream::mark], to be given back to [CharStream::release].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Marker(pub(crate) usize);

/// Addressable sequence of characters read by the lexer.
///
/// Indices are character indices, starting at 0. `la(1)` is the next character to be consumed,
/// `None` meaning the end of the stream.
pub trait CharStream {
    /// Index of the next character.
    fn index(&self) -> usize;

    /// Total number of characters, if known.
    fn size(&self) -> Option<usize>;

    /// Looks ahead `i` characters (`i >= 1`) without consuming them.
    fn la(&mut self, i: usize) -> Option<char>;

    /// Consumes the next character. Does nothing at the end of the stream.
    fn consume(&mut self);

    /// Guarantees that the characters from the current index stay available to [seek](CharStream::seek)
    /// and [text](CharStream::text) until the marker is released.
    fn mark(&mut self) -> Marker;

    /// Releases a marker. Markers must be released in the reverse order of their acquisition.
    fn release(&mut self, marker: Marker);

    fn seek(&mut self, index: usize) -> Result<(), StreamError>;

    /// Text of the characters in `range`, clamped to the characters still available.
    fn text(&self, range: Range<usize>) -> String;

    fn source_name(&self) -> &str;
}

pub const UNKNOWN_SOURCE_NAME: &str = "<unknown>";

// ---------------------------------------------------------------------------------------------

/// Character stream with the whole input in memory. Markers are free and seeking is possible
/// anywhere in the input.
#[derive(Clone, Debug)]
pub struct InputStream {
    data: Vec<char>,
    p: usize,
    name: String,
}

impl InputStream {
    pub fn new(text: &str) -> Self {
        InputStream { data: text.chars().collect(), p: 0, name: UNKNOWN_SOURCE_NAME.to_string() }
    }

    pub fn with_name<T: Into<String>>(text: &str, name: T) -> Self {
        InputStream { name: name.into(), ..InputStream::new(text) }
    }
}

impl From<&str> for InputStream {
    fn from(text: &str) -> Self {
        InputStream::new(text)
    }
}

impl CharStream for InputStream {
    fn index(&self) -> usize {
        self.p
    }

    fn size(&self) -> Option<usize> {
        Some(self.data.len())
    }

    fn la(&mut self, i: usize) -> Option<char> {
        debug_assert!(i >= 1, "la({i}) is undefined");
        (self.p + i).checked_sub(1).and_then(|n| self.data.get(n)).copied()
    }

    fn consume(&mut self) {
        if self.p < self.data.len() {
            self.p += 1;
        }
    }

    fn mark(&mut self) -> Marker {
        Marker(0)
    }

    fn release(&mut self, _marker: Marker) {}

    fn seek(&mut self, index: usize) -> Result<(), StreamError> {
        self.p = index.min(self.data.len());
        Ok(())
    }

    fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.data.len());
        if range.start >= end {
            return String::new();
        }
        self.data[range.start..end].iter().collect()
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod input_stream {
    use super::*;

    #[test]
    fn lookahead_consume() {
        let mut input = InputStream::new("aé\n");
        assert_eq!(input.size(), Some(3));
        assert_eq!((input.index(), input.la(1), input.la(2), input.la(3), input.la(4)), (0, Some('a'), Some('é'), Some('\n'), None));
        input.consume();
        assert_eq!((input.index(), input.la(1)), (1, Some('é')));
        input.consume();
        input.consume();
        assert_eq!((input.index(), input.la(1)), (3, None));
        input.consume();
        assert_eq!(input.index(), 3, "consume at end of stream must not move");
    }

    #[test]
    fn seek_and_text() {
        let mut input = InputStream::with_name("hello", "greeting");
        assert_eq!(input.source_name(), "greeting");
        input.seek(3).unwrap();
        assert_eq!(input.la(1), Some('l'));
        input.seek(10).unwrap();
        assert_eq!(input.index(), 5);
        input.seek(0).unwrap();
        assert_eq!(input.la(1), Some('h'));
        assert_eq!(input.text(1..4), "ell");
        assert_eq!(input.text(3..9), "lo");
        assert_eq!(input.text(4..2), "");
        let marker = input.mark();
        input.release(marker);
    }
}
