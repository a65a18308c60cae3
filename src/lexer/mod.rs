// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

mod state;

use std::rc::Rc;
use crate::char_stream::{CharStream, UNKNOWN_SOURCE_NAME};
use crate::error::{LexerError, LexerErrorInfo, RecognitionError};
use crate::listener::{ErrorListener, ErrorListenerDispatch};
use crate::recognizer::{MatchOutcome, Recognizer};
use crate::token::{CommonToken, CommonTokenFactory, Source, Token, TokenFactory, TokenType};
use crate::{CaretCol, CaretLine, ChannelId, ModeId, TokenId, DEFAULT_CHANNEL, TOKEN_EOF};

pub use state::{LexerState, TokenCandidate, TokenStart};

// ---------------------------------------------------------------------------------------------
// Options

#[derive(Clone, PartialEq, Debug)]
pub struct LexerOptions {
    /// When [Lexer::recover_from] skips a character, it goes through the recognizer so that the
    /// line and column follow (`true`), or it consumes directly from the stream, leaving the
    /// position tracking behind (`false`).
    pub recover_tracks_position: bool,
}

impl LexerOptions {
    pub fn new() -> Self {
        LexerOptions::default()
    }

    pub fn with_recover_tracks_position(mut self, value: bool) -> Self {
        self.recover_tracks_position = value;
        self
    }
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions { recover_tracks_position: true }
    }
}

// ---------------------------------------------------------------------------------------------
// Error display

/// Readable form of the text in error messages; control characters are escaped.
pub fn error_display(text: &str) -> String {
    text.chars().map(|c| match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        _ => c.to_string(),
    }).collect()
}

/// Quoted form of a character in error messages, `'<EOF>'` for the end of the stream.
pub fn char_error_display(c: Option<char>) -> String {
    match c {
        Some(c) => format!("'{}'", error_display(c.encode_utf8(&mut [0; 4]))),
        None => "'<EOF>'".to_string(),
    }
}

// ---------------------------------------------------------------------------------------------
// Lexer

/// Token production driver.
///
/// The lexer asks its [Recognizer] to match the input in the current mode, one match at a time,
/// and assembles the matches into tokens built by a [TokenFactory]:
/// * a `Skip` match is discarded and the lexer starts a new token after it,
/// * a `More` match is kept and extended by the next match,
/// * a `Type(t)` match completes a token of type `t`.
///
/// Unrecognized input is reported to the [error listeners](ErrorListener) and skipped, one
/// character at a time; it never stops the tokenization. Once the end of the stream is reached,
/// every call to [next_token](Lexer::next_token) returns an EOF token.
///
/// ## Example
/// ```ignore
/// let mut lexer = Lexer::new(build_recognizer());
/// lexer.attach_stream(InputStream::new("a = 10;"));
/// for token in lexer.tokens().keep_default_channel() {
///     println!("{token}");
/// }
/// ```
pub struct Lexer<S, R, F: TokenFactory = CommonTokenFactory> {
    input: Option<S>,
    source: Rc<Source>,
    attachments: u32,
    recognizer: R,
    factory: F,
    listeners: ErrorListenerDispatch,
    state: LexerState<F::Token>,
    options: LexerOptions,
    error: Option<LexerError>,
}

impl<S: CharStream, R: Recognizer<CommonToken>> Lexer<S, R, CommonTokenFactory> {
    pub fn new(recognizer: R) -> Self {
        Lexer::with_factory(recognizer, CommonTokenFactory)
    }
}

impl<S: CharStream, R: Recognizer<F::Token>, F: TokenFactory> Lexer<S, R, F> {
    pub fn with_factory(recognizer: R, factory: F) -> Self {
        Lexer {
            input: None,
            source: Rc::new(Source { name: UNKNOWN_SOURCE_NAME.to_string(), attachment: 0 }),
            attachments: 0,
            recognizer,
            factory,
            listeners: ErrorListenerDispatch::with_console(),
            state: LexerState::new(),
            options: LexerOptions::default(),
            error: None,
        }
    }

    pub fn with_options(mut self, options: LexerOptions) -> Self {
        self.options = options;
        self
    }

    // ---- input

    /// Attaches a new stream and resets the lexer. Returns the stream previously attached.
    pub fn attach_stream(&mut self, input: S) -> Option<S> {
        self.attachments += 1;
        self.source = Rc::new(Source { name: input.source_name().to_string(), attachment: self.attachments });
        self.state.reset();
        self.recognizer.reset();
        self.error = None;
        self.input.replace(input)
    }

    pub fn detach_stream(&mut self) -> Option<S> {
        self.input.take()
    }

    pub fn stream(&self) -> Option<&S> {
        self.input.as_ref()
    }

    pub fn source(&self) -> &Rc<Source> {
        &self.source
    }

    pub fn source_name(&self) -> &str {
        &self.source.name
    }

    /// Rewinds the stream and brings the lexer back to its initial state.
    pub fn reset(&mut self) -> Result<(), LexerError> {
        if let Some(input) = self.input.as_mut() {
            input.seek(0)?;
        }
        self.state.reset();
        self.recognizer.reset();
        self.error = None;
        Ok(())
    }

    // ---- token production

    // next_token flow:
    //
    //      if no input: error
    //      mark the stream (released on exit)
    //      loop
    //          if hit_eof
    //              return EOF token
    //          new candidate at current position, default channel
    //          do
    //              type = unset
    //              match in current mode (no viable alt -> report, skip 1 char, Skip)
    //              if LA(1) == EOF: hit_eof = true
    //              if type unset: type = match result
    //          while type == More
    //          if type == Skip: restart loop
    //          return emitted token, or build one with the factory
    //
    /// Produces the next token. Unrecognized input isn't an error at this level; an `Err` is fatal
    /// and is also kept in [error()](Lexer::error).
    pub fn next_token(&mut self) -> Result<F::Token, LexerError> {
        self.error = None;
        // keeps the current token text in unbuffered streams
        let Some(marker) = self.input.as_mut().map(|input| input.mark()) else {
            return Err(self.fail(LexerError::NoStreamAttached));
        };
        let result = self.produce_token();
        if let Some(input) = self.input.as_mut() {
            input.release(marker);
        }
        result.map_err(|e| self.fail(e))
    }

    fn fail(&mut self, error: LexerError) -> LexerError {
        self.error = Some(error.clone());
        error
    }

    fn produce_token(&mut self) -> Result<F::Token, LexerError> {
        loop {
            if self.state.hit_eof {
                return self.emit_eof();
            }
            let start = self.begin_candidate()?;
            if let TokenType::Type(token_type) = self.assemble_candidate()? {
                let token = match self.state.token.take() {
                    Some(token) => token,
                    None if token_type == TOKEN_EOF => return self.emit_eof(),
                    None => self.build_token(start, token_type)?,
                };
                return Ok(self.record(token));
            }
            // skipped: starts again with a new candidate
        }
    }

    fn begin_candidate(&mut self) -> Result<TokenStart, LexerError> {
        let input = self.input.as_ref().ok_or(LexerError::NoStreamAttached)?;
        let start = TokenStart { index: input.index(), line: self.recognizer.line(), col: self.recognizer.column() };
        self.state.token = None;
        self.state.candidate = TokenCandidate::begin(start);
        Ok(start)
    }

    /// Matches until the candidate is complete. Returns `Skip` if the candidate is discarded,
    /// otherwise its token type.
    fn assemble_candidate(&mut self) -> Result<TokenType, LexerError> {
        loop {
            self.state.candidate.token_type = None;
            let mode = self.state.mode;
            let input = self.input.as_mut().ok_or(LexerError::NoStreamAttached)?;
            let outcome = match (self.recognizer.match_token(input, mode, &mut self.state)?, self.state.candidate.start) {
                (MatchOutcome::Matched(TokenType::Type(TOKEN_EOF)), Some(start)) if start.index < input.index() => {
                    // the stream ends in the middle of a `more` sequence: the pending text is
                    // reported and dropped instead of being carried by the EOF token, which
                    // always stays empty
                    let text = input.text(start.index..input.index());
                    MatchOutcome::NoViableAlt(LexerErrorInfo { index: start.index, line: start.line, col: start.col, curr_char: None, mode, text })
                }
                (outcome, _) => outcome,
            };
            let matched = match outcome {
                MatchOutcome::Matched(token_type) => token_type,
                MatchOutcome::NoViableAlt(info) => {
                    let error = RecognitionError::NoViableAlt { info };
                    self.notify_listeners(&error);
                    self.recover(&error);
                    TokenType::Skip
                }
            };
            let input = self.input.as_mut().ok_or(LexerError::NoStreamAttached)?;
            if input.la(1).is_none() {
                self.state.hit_eof = true;
            }
            let token_type = *self.state.candidate.token_type.get_or_insert(matched);
            log::trace!("mode {mode}: matched {matched} -> {token_type}, index {}", input.index());
            if !token_type.is_more() {
                return Ok(token_type);
            }
        }
    }

    fn build_token(&self, start: TokenStart, token_type: TokenId) -> Result<F::Token, LexerError> {
        let input = self.input.as_ref().ok_or(LexerError::NoStreamAttached)?;
        let index = input.index();
        let text = match &self.state.candidate.text {
            Some(text) => text.clone(),
            None => input.text(start.index..index),
        };
        Ok(self.factory.create(&self.source, token_type, text, self.state.candidate.channel,
                               start.index, index as isize - 1, start.line, start.col))
    }

    /// Builds the zero-length EOF token, placed right after the last token if there was one.
    fn emit_eof(&mut self) -> Result<F::Token, LexerError> {
        let input = self.input.as_ref().ok_or(LexerError::NoStreamAttached)?;
        let index = input.index();
        let column = match &self.state.last_token {
            Some(token) => token.column() + token.len() as CaretCol,
            None => self.recognizer.column(),
        };
        let eof = self.factory.create(&self.source, TOKEN_EOF, String::new(), DEFAULT_CHANNEL,
                                      index, index as isize - 1, self.recognizer.line(), column);
        Ok(self.record(eof))
    }

    fn record(&mut self, token: F::Token) -> F::Token {
        log::trace!("emit {token:?}");
        self.state.token = Some(token.clone());
        self.state.last_token = Some(token.clone());
        token
    }

    /// Emits a token built by the caller; the lexer returns it instead of building its own.
    pub fn emit(&mut self, token: F::Token) {
        self.state.emit(token);
    }

    /// Returns all the remaining tokens, excluding the final EOF.
    pub fn all_tokens(&mut self) -> Result<Vec<F::Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.is_eof() {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    /// Iterator on the remaining tokens, excluding the final EOF. The iteration stops at the first
    /// fatal error, which is then available with [error()](Lexer::error).
    pub fn tokens(&mut self) -> Tokens<'_, S, R, F> {
        Tokens { lexer: self, done: false }
    }

    // ---- error reporting & recovery

    /// Reports a recognition error to the listeners, with the text scanned since the start of the
    /// current token.
    pub fn notify_listeners(&mut self, error: &RecognitionError) {
        let Some(input) = self.input.as_mut() else { return };
        let index = input.index();
        let start = self.state.candidate.start.unwrap_or(TokenStart {
            index,
            line: self.recognizer.line(),
            col: self.recognizer.column(),
        });
        let text = input.text(start.index..index + 1);
        let display = if text.is_empty() && input.la(1).is_none() { "<EOF>".to_string() } else { error_display(&text) };
        let msg = format!("token recognition error at: '{display}'");
        self.listeners.syntax_error(&self.source, start.line, start.col, &msg, error);
    }

    /// Skips the offending character after a failed match, unless the stream is at its end.
    fn recover(&mut self, error: &RecognitionError) {
        if let Some(input) = self.input.as_mut() {
            if input.la(1).is_some() {
                log::debug!("recovering from {error}: skipping {}", char_error_display(input.la(1)));
                self.recognizer.consume(input);
            }
        }
    }

    /// Recovers from a recognition error raised outside the lexer's own matching, by consuming
    /// one character. See [LexerOptions::recover_tracks_position].
    pub fn recover_from(&mut self, error: &RecognitionError) {
        if let Some(input) = self.input.as_mut() {
            log::debug!("recovering from {error}");
            if self.options.recover_tracks_position {
                if input.la(1).is_some() {
                    self.recognizer.consume(input);
                }
            } else {
                input.consume();
            }
        }
    }

    pub fn add_error_listener<L: ErrorListener + 'static>(&mut self, listener: L) {
        self.listeners.add(listener);
    }

    pub fn remove_error_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn error_listeners(&self) -> &ErrorListenerDispatch {
        &self.listeners
    }

    /// Last fatal error, cleared at each call to [next_token](Lexer::next_token).
    pub fn error(&self) -> Option<&LexerError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    // ---- lexer actions & accessors

    pub fn skip(&mut self) {
        self.state.skip();
    }

    pub fn more(&mut self) {
        self.state.more();
    }

    pub fn mode(&self) -> ModeId {
        self.state.mode()
    }

    pub fn set_mode(&mut self, mode: ModeId) {
        self.state.set_mode(mode);
    }

    pub fn push_mode(&mut self, mode: ModeId) {
        self.state.push_mode(mode);
    }

    pub fn pop_mode(&mut self) -> Result<ModeId, LexerError> {
        self.state.pop_mode()
    }

    pub fn mode_stack(&self) -> &[ModeId] {
        self.state.mode_stack()
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.state.token_type()
    }

    pub fn set_type(&mut self, token_type: TokenType) {
        self.state.set_type(token_type);
    }

    pub fn channel(&self) -> ChannelId {
        self.state.channel()
    }

    pub fn set_channel(&mut self, channel: ChannelId) {
        self.state.set_channel(channel);
    }

    /// Text of the current match, or the text set with [set_text](Lexer::set_text).
    pub fn text(&self) -> String {
        match (&self.state.candidate.text, self.input.as_ref()) {
            (Some(text), _) => text.clone(),
            (None, Some(input)) => self.recognizer.text(input),
            (None, None) => String::new(),
        }
    }

    pub fn set_text<T: Into<String>>(&mut self, text: T) {
        self.state.set_text(text);
    }

    /// Last token produced by the current or previous call to [next_token](Lexer::next_token).
    pub fn token(&self) -> Option<&F::Token> {
        self.state.token()
    }

    pub fn line(&self) -> CaretLine {
        self.recognizer.line()
    }

    pub fn set_line(&mut self, line: CaretLine) {
        self.recognizer.set_line(line);
    }

    pub fn column(&self) -> CaretCol {
        self.recognizer.column()
    }

    pub fn set_column(&mut self, column: CaretCol) {
        self.recognizer.set_column(column);
    }

    /// Index of the next character in the stream.
    pub fn char_index(&self) -> usize {
        self.input.as_ref().map_or(0, |input| input.index())
    }

    pub fn hit_eof(&self) -> bool {
        self.state.hit_eof()
    }

    pub fn state(&self) -> &LexerState<F::Token> {
        &self.state
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LexerOptions) {
        self.options = options;
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    pub fn recognizer_mut(&mut self) -> &mut R {
        &mut self.recognizer
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

// ---------------------------------------------------------------------------------------------

pub struct Tokens<'a, S, R, F: TokenFactory> {
    lexer: &'a mut Lexer<S, R, F>,
    done: bool,
}

impl<S: CharStream, R: Recognizer<F::Token>, F: TokenFactory> Iterator for Tokens<'_, S, R, F> {
    type Item = F::Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next_token() {
            Ok(token) if !token.is_eof() => Some(token),
            _ => {
                self.done = true;
                None
            }
        }
    }
}
