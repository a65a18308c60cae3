// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::io::{BufReader, Read};
use std::ops::Range;
use crate::char_stream::{CharStream, Marker, UNKNOWN_SOURCE_NAME};
use crate::error::StreamError;

// Valid codepoint values:
//
// 000000 - 00007f: 1 byte
// 000080 - 0007ff: 2 bytes
// 000800 - 00d7ff: 3 bytes
// --------------------------
// 00d800 - 00dfff: forbidden
// --------------------------
// 00e000 - 00ffff: 3 bytes
// 010000 - 10ffff: 4 bytes

/// Determines the number of bytes required to encode a UTF-8 character from its first byte,
/// or 0 if the byte can't start a character.
#[inline]
pub fn utf8_len(byte: u8) -> usize {
    match byte {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub enum ReaderStatus {
    #[default]
    Reading,
    Error(StreamError),
    Closed
}

/// Unbuffered character stream decoding UTF-8 from a [Read] source.
///
/// Only the characters that may still be needed are kept: the consumed characters are dropped
/// as soon as no [marker](CharStream::mark) is outstanding. The lexer holds a marker for the
/// duration of each token, so the text of the current token is always available.
pub struct ReaderStream<R> {
    reader: BufReader<R>,
    /// offset of the next byte to decode
    offset: u64,
    status: ReaderStatus,
    /// buffered characters; `data[0]` has the stream index `buffer_start`
    data: Vec<char>,
    buffer_start: usize,
    /// position of the next character in `data`
    p: usize,
    num_markers: usize,
    name: String,
}

impl<R: Read> ReaderStream<R> {
    pub fn new(source: R) -> Self {
        ReaderStream {
            reader: BufReader::new(source),
            offset: 0,
            status: ReaderStatus::Reading,
            data: Vec::new(),
            buffer_start: 0,
            p: 0,
            num_markers: 0,
            name: UNKNOWN_SOURCE_NAME.to_string(),
        }
    }

    pub fn with_name<T: Into<String>>(source: R, name: T) -> Self {
        ReaderStream { name: name.into(), ..ReaderStream::new(source) }
    }

    pub fn is_reading(&self) -> bool {
        matches!(self.status, ReaderStatus::Reading)
    }

    pub fn status(&self) -> &ReaderStatus {
        &self.status
    }

    /// Number of characters currently held in memory.
    pub fn buffered(&self) -> usize {
        self.data.len()
    }

    /// Makes sure `n` characters are buffered from the current position, unless the source ends first.
    fn fill(&mut self, n: usize) {
        while self.data.len() < self.p + n {
            match self.read_char() {
                Some(c) => self.data.push(c),
                None => break,
            }
        }
    }

    fn read_char(&mut self) -> Option<char> {
        if !self.is_reading() {
            return None;
        }
        let mut buffer = [0; 4];
        match self.reader.read(&mut buffer[0..1]) {
            Ok(0) => {
                self.status = ReaderStatus::Closed;
                None
            }
            Ok(_) => {
                let len = utf8_len(buffer[0]);
                if len == 0 {
                    self.status = ReaderStatus::Error(StreamError::Utf8 { offset: self.offset });
                    return None;
                }
                if len > 1 {
                    if let Err(e) = self.reader.read_exact(&mut buffer[1..len]) {
                        self.status = ReaderStatus::Error(StreamError::Io(e.to_string()));
                        return None;
                    }
                }
                match std::str::from_utf8(&buffer[..len]).ok().and_then(|s| s.chars().next()) {
                    Some(c) => {
                        self.offset += len as u64;
                        Some(c)
                    }
                    None => {
                        self.status = ReaderStatus::Error(StreamError::Utf8 { offset: self.offset });
                        None
                    }
                }
            }
            Err(e) => {
                self.status = ReaderStatus::Error(StreamError::Io(e.to_string()));
                None
            }
        }
    }

    /// Drops the consumed characters when nobody needs them anymore.
    fn trim(&mut self) {
        if self.num_markers == 0 && self.p > 0 {
            self.data.drain(..self.p);
            self.buffer_start += self.p;
            self.p = 0;
        }
    }
}

impl<R: Read> CharStream for ReaderStream<R> {
    fn index(&self) -> usize {
        self.buffer_start + self.p
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn la(&mut self, i: usize) -> Option<char> {
        debug_assert!(i >= 1, "la({i}) is undefined");
        self.fill(i);
        self.data.get(self.p + i - 1).copied()
    }

    fn consume(&mut self) {
        self.fill(1);
        if self.p < self.data.len() {
            self.p += 1;
            self.trim();
        }
    }

    fn mark(&mut self) -> Marker {
        self.num_markers += 1;
        Marker(self.num_markers)
    }

    fn release(&mut self, marker: Marker) {
        if marker.0 != self.num_markers || self.num_markers == 0 {
            log::error!("{} (marker {}, {} outstanding)", StreamError::InvalidMarker, marker.0, self.num_markers);
            return;
        }
        self.num_markers -= 1;
        self.trim();
    }

    fn seek(&mut self, index: usize) -> Result<(), StreamError> {
        if index < self.buffer_start {
            return Err(StreamError::SeekOutOfBuffer { index, buffer_start: self.buffer_start });
        }
        if index <= self.buffer_start + self.data.len() {
            self.p = index - self.buffer_start;
            self.trim();
        } else {
            while self.index() < index && self.la(1).is_some() {
                self.consume();
            }
        }
        Ok(())
    }

    fn text(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.buffer_start + self.data.len());
        let start = range.start.max(self.buffer_start);
        if start >= end {
            return String::new();
        }
        self.data[start - self.buffer_start..end - self.buffer_start].iter().collect()
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------------------------
