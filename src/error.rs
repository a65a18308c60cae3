// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use crate::{CaretCol, CaretLine, ModeId};

// ---------------------------------------------------------------------------------------------
// Stream errors

#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum StreamError {
    #[error("can't seek to index {index}, the buffer starts at index {buffer_start}")]
    SeekOutOfBuffer { index: usize, buffer_start: usize },
    #[error("UTF-8 encoding error at byte offset {offset}")]
    Utf8 { offset: u64 },
    #[error("I/O error: {0}")]
    Io(String),
    #[error("released a marker that isn't the last one acquired")]
    InvalidMarker,
}

// ---------------------------------------------------------------------------------------------
// Fatal lexer errors

/// Errors that abort the current lexer operation. They signal a programming defect (no input,
/// unbalanced mode handling in the lexer actions) or a failing stream, never bad input.
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum LexerError {
    #[error("no stream attached")]
    NoStreamAttached,
    #[error("pop from empty mode stack (current mode = {mode})")]
    EmptyModeStack { mode: ModeId },
    #[error("unknown mode {mode}")]
    UnknownMode { mode: ModeId },
    #[error(transparent)]
    Stream(#[from] StreamError),
}

// ---------------------------------------------------------------------------------------------
// Recoverable recognition errors

/// Location and context of a recognition failure.
#[derive(Clone, PartialEq, Debug)]
pub struct LexerErrorInfo {
    /// stream index where the failing match started
    pub index: usize,
    pub line: CaretLine,
    pub col: CaretCol,
    /// lookahead character when the recognizer got stuck (`None` at end of stream)
    pub curr_char: Option<char>,
    pub mode: ModeId,
    /// text scanned before getting stuck
    pub text: String,
}

/// Recognition failures. The lexer reports them and recovers; they never abort tokenization.
#[derive(Clone, PartialEq, Debug)]
pub enum RecognitionError {
    /// No rule of the current mode matches the input at this position.
    NoViableAlt { info: LexerErrorInfo },
    /// A semantic predicate evaluated by the surrounding logic failed.
    FailedPredicate { predicate: String, info: LexerErrorInfo },
}

impl RecognitionError {
    pub fn info(&self) -> &LexerErrorInfo {
        match self {
            RecognitionError::NoViableAlt { info }
            | RecognitionError::FailedPredicate { info, .. } => info,
        }
    }
}

impl Display for RecognitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionError::NoViableAlt { info: LexerErrorInfo { index, line, col, curr_char, mode, .. } } => {
                write!(f, "no viable alternative in mode {mode}, line {line}, col {col}")?;
                if let Some(c) = curr_char {
                    write!(f, ", chr = '{}'", c.escape_debug())?;
                }
                write!(f, " (stream index = {index})")
            }
            RecognitionError::FailedPredicate { predicate, info: LexerErrorInfo { index, line, col, .. } } =>
                write!(f, "failed predicate {{{predicate}}}, line {line}, col {col} (stream index = {index})"),
        }
    }
}

impl std::error::Error for RecognitionError {}
