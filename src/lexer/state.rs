// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::error::LexerError;
use crate::token::TokenType;
use crate::{CaretCol, CaretLine, ChannelId, ModeId, DEFAULT_CHANNEL, DEFAULT_MODE};

/// Position where a token candidate begins.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TokenStart {
    pub index: usize,
    pub line: CaretLine,
    pub col: CaretCol,
}

/// Token being assembled by the lexer. The start position is fixed for the whole assembly,
/// including the `more` iterations.
#[derive(Clone, PartialEq, Debug)]
pub struct TokenCandidate {
    /// `None` until the current match (or one of its actions) decides the type
    pub(crate) token_type: Option<TokenType>,
    pub(crate) channel: ChannelId,
    /// `None` after a reset, before the first candidate
    pub(crate) start: Option<TokenStart>,
    /// replaces the text taken from the stream when set
    pub(crate) text: Option<String>,
}

impl TokenCandidate {
    pub(crate) fn begin(start: TokenStart) -> Self {
        TokenCandidate { start: Some(start), ..TokenCandidate::default() }
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.token_type
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    pub fn start(&self) -> Option<TokenStart> {
        self.start
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Default for TokenCandidate {
    fn default() -> Self {
        TokenCandidate { token_type: None, channel: DEFAULT_CHANNEL, start: None, text: None }
    }
}

// ---------------------------------------------------------------------------------------------

/// Session state of a lexer, shared with the recognizer during each match.
///
/// The [recognizer](crate::recognizer::Recognizer) receives it during each match to run the
/// lexer actions: `skip`, `more`, `set_type`, `set_channel`, `set_text`, `set_mode`,
/// `push_mode`, `pop_mode`, and `emit`.
#[derive(Clone, Debug)]
pub struct LexerState<T> {
    pub(crate) mode: ModeId,
    pub(crate) mode_stack: Vec<ModeId>,
    pub(crate) candidate: TokenCandidate,
    /// set once the end of the stream has been seen; only EOF tokens are produced after that
    pub(crate) hit_eof: bool,
    /// token of the current call, if one was emitted
    pub(crate) token: Option<T>,
    /// last token returned by the lexer, to place the EOF token after it
    pub(crate) last_token: Option<T>,
}

impl<T> LexerState<T> {
    pub fn new() -> Self {
        LexerState {
            mode: DEFAULT_MODE,
            mode_stack: Vec::new(),
            candidate: TokenCandidate::default(),
            hit_eof: false,
            token: None,
            last_token: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = LexerState::new();
    }

    // ---- token type & channel

    /// Discards the current match: no token is produced and its text is dropped.
    pub fn skip(&mut self) {
        self.candidate.token_type = Some(TokenType::Skip);
    }

    /// Keeps the text of the current match for the next one, which extends the same token.
    pub fn more(&mut self) {
        self.candidate.token_type = Some(TokenType::More);
    }

    pub fn set_type(&mut self, token_type: TokenType) {
        self.candidate.token_type = Some(token_type);
    }

    pub fn token_type(&self) -> Option<TokenType> {
        self.candidate.token_type
    }

    pub fn set_channel(&mut self, channel: ChannelId) {
        self.candidate.channel = channel;
    }

    pub fn channel(&self) -> ChannelId {
        self.candidate.channel
    }

    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.candidate.text = Some(text.into());
    }

    pub fn candidate(&self) -> &TokenCandidate {
        &self.candidate
    }

    // ---- modes

    pub fn mode(&self) -> ModeId {
        self.mode
    }

    /// Switches to mode `mode`. The mode isn't validated here; an unknown mode is detected by
    /// the recognizer at the next match.
    pub fn set_mode(&mut self, mode: ModeId) {
        self.mode = mode;
    }

    pub fn push_mode(&mut self, mode: ModeId) {
        log::debug!("push_mode {mode} (from {})", self.mode);
        self.mode_stack.push(self.mode);
        self.mode = mode;
    }

    /// Restores the mode active before the last [push_mode](LexerState::push_mode) and returns it.
    pub fn pop_mode(&mut self) -> Result<ModeId, LexerError> {
        let mode = self.mode_stack.pop().ok_or(LexerError::EmptyModeStack { mode: self.mode })?;
        log::debug!("pop_mode back to {mode}");
        self.mode = mode;
        Ok(mode)
    }

    /// Previously active modes, the most recent last.
    pub fn mode_stack(&self) -> &[ModeId] {
        &self.mode_stack
    }

    // ---- tokens

    /// Emits a token built by the caller instead of letting the lexer build it with its factory.
    pub fn emit(&mut self, token: T) {
        self.token = Some(token);
    }

    pub fn token(&self) -> Option<&T> {
        self.token.as_ref()
    }

    pub fn hit_eof(&self) -> bool {
        self.hit_eof
    }
}

impl<T> Default for LexerState<T> {
    fn default() -> Self {
        LexerState::new()
    }
}
