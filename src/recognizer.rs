// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::char_stream::CharStream;
use crate::error::{LexerError, LexerErrorInfo};
use crate::lexer::LexerState;
use crate::token::TokenType;
use crate::{CaretCol, CaretLine, ModeId};

/// Result of a match attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    /// A rule matched; the stream is positioned after the matched characters.
    Matched(TokenType),
    /// No rule of the mode can match at this position.
    NoViableAlt(LexerErrorInfo),
}

/// Recognition engine: decides, for a mode and a stream position, which token type matches and
/// how many characters it consumes.
///
/// The engine runs the lexer actions attached to the matched rule by calling the action methods
/// of the [LexerState] (`skip`, `more`, `set_channel`, `push_mode`, ...). It keeps track of the
/// line and column of the next character as it consumes them.
pub trait Recognizer<T> {
    /// Matches the next token in `mode`. At the end of the stream, with nothing consumed, the
    /// engine returns `Matched(TokenType::Type(TOKEN_EOF))`.
    ///
    /// An `Err` is fatal; an unrecognized input is a `NoViableAlt` outcome.
    fn match_token(&mut self, input: &mut dyn CharStream, mode: ModeId, state: &mut LexerState<T>) -> Result<MatchOutcome, LexerError>;

    /// Consumes one character, updating the line and column.
    fn consume(&mut self, input: &mut dyn CharStream);

    fn line(&self) -> CaretLine;

    fn set_line(&mut self, line: CaretLine);

    fn column(&self) -> CaretCol;

    fn set_column(&mut self, column: CaretCol);

    /// Text of the current match, from its start to the current stream index.
    fn text(&self, input: &dyn CharStream) -> String;

    /// Forgets the position tracking, as if nothing had been read.
    fn reset(&mut self);
}
