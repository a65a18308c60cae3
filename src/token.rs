// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::{CaretCol, CaretLine, ChannelId, TokenId, DEFAULT_CHANNEL, TOKEN_EOF};

// ---------------------------------------------------------------------------------------------
// Token type of a candidate

/// Outcome of a match, as seen by the token production loop.
///
/// * `Skip` => doesn't return a token, drops the current text
/// * `More` => doesn't return a token, keeps the current text for the next match
/// * `Type(t)` => returns a token of type `t`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    Skip,
    More,
    Type(TokenId),
}

impl TokenType {
    pub fn is_skip(&self) -> bool { self == &TokenType::Skip }
    pub fn is_more(&self) -> bool { self == &TokenType::More }

    pub fn get_token(&self) -> Option<TokenId> {
        if let TokenType::Type(token) = self {
            Some(*token)
        } else {
            None
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenType::Skip => write!(f, "skip"),
            TokenType::More => write!(f, "more"),
            TokenType::Type(TOKEN_EOF) => write!(f, "EOF"),
            TokenType::Type(t) => write!(f, "{t}"),
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Sources

/// Identity of the stream the tokens come from. One instance is created each time a stream is
/// attached to a lexer, and shared by all the tokens built from that stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    /// sequence number of the attachment, to tell apart two streams with the same name
    pub attachment: u32,
}

// ---------------------------------------------------------------------------------------------
// Tokens

pub trait Token: Clone + Debug {
    fn token_type(&self) -> TokenId;
    fn channel(&self) -> ChannelId;
    fn text(&self) -> &str;
    /// Index of the first character.
    fn start_index(&self) -> usize;
    /// Index of the last character; `start_index() - 1` if the token is empty.
    fn stop_index(&self) -> isize;
    fn line(&self) -> CaretLine;
    fn column(&self) -> CaretCol;
    fn source(&self) -> &Rc<Source>;

    fn is_eof(&self) -> bool {
        self.token_type() == TOKEN_EOF
    }

    /// Number of characters covered by the token.
    fn len(&self) -> usize {
        (self.stop_index() + 1 - self.start_index() as isize).max(0) as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommonToken {
    pub token_type: TokenId,
    pub channel: ChannelId,
    pub text: String,
    pub start: usize,
    pub stop: isize,
    pub line: CaretLine,
    pub column: CaretCol,
    pub source: Rc<Source>,
}

impl Token for CommonToken {
    fn token_type(&self) -> TokenId { self.token_type }
    fn channel(&self) -> ChannelId { self.channel }
    fn text(&self) -> &str { &self.text }
    fn start_index(&self) -> usize { self.start }
    fn stop_index(&self) -> isize { self.stop }
    fn line(&self) -> CaretLine { self.line }
    fn column(&self) -> CaretCol { self.column }
    fn source(&self) -> &Rc<Source> { &self.source }
}

impl Display for CommonToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = if self.is_eof() { "<EOF>".to_string() } else { self.text.escape_debug().to_string() };
        write!(f, "[@{}:{}='{text}',<{}>", self.start, self.stop, TokenType::Type(self.token_type))?;
        if self.channel != DEFAULT_CHANNEL {
            write!(f, ",channel={}", self.channel)?;
        }
        write!(f, ",{}:{}]", self.line, self.column)
    }
}

/// Builds the tokens emitted by the lexer.
pub trait TokenFactory {
    type Token: Token;

    #[allow(clippy::too_many_arguments)]
    fn create(
        &self,
        source: &Rc<Source>,
        token_type: TokenId,
        text: String,
        channel: ChannelId,
        start: usize,
        stop: isize,
        line: CaretLine,
        column: CaretCol,
    ) -> Self::Token;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CommonTokenFactory;

impl TokenFactory for CommonTokenFactory {
    type Token = CommonToken;

    fn create(
        &self,
        source: &Rc<Source>,
        token_type: TokenId,
        text: String,
        channel: ChannelId,
        start: usize,
        stop: isize,
        line: CaretLine,
        column: CaretCol,
    ) -> CommonToken {
        CommonToken { token_type, channel, text, start, stop, line, column, source: Rc::clone(source) }
    }
}

// ---------------------------------------------------------------------------------------------
// Channel adapters

pub struct TokenSplit<I, F> {
    iter: I,
    ch: ChannelId,
    f: F
}

pub trait TokenSpliterator<T: Token>: Iterator<Item = T> {
    /// Splits the token iterator based on the channel ID:
    /// * the tokens of `channel` are output by the returned iterator, suitable for the parser
    /// * the tokens of the other channels are consumed by the closure `f`
    ///
    /// ## Example
    /// ```ignore
    /// let tokens = lexer.tokens().split_channels(DEFAULT_CHANNEL, |t| println!("discarded: {t}"));
    /// ```
    fn split_channels<F>(self, channel: ChannelId, f: F) -> TokenSplit<Self, F>
    where Self: Sized,
          F: FnMut(T)
    {
        TokenSplit { iter: self, ch: channel, f }
    }

    /// Keeps the tokens of `channel` and discards the others.
    fn keep_channel(self, channel: ChannelId) -> TokenSplit<Self, fn(T)>
    where Self: Sized
    {
        TokenSplit { iter: self, ch: channel, f: |_| {} }
    }

    /// Keeps the tokens of the default channel and discards the others.
    fn keep_default_channel(self) -> TokenSplit<Self, fn(T)>
    where Self: Sized
    {
        self.keep_channel(DEFAULT_CHANNEL)
    }
}

impl<T, I, F> Iterator for TokenSplit<I, F>
    where T: Token,
          I: Iterator<Item = T>,
          F: FnMut(T)
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        for token in self.iter.by_ref() {
            if token.channel() == self.ch {
                return Some(token);
            }
            (self.f)(token);
        }
        None
    }
}

impl<T: Token, I: Iterator<Item = T>> TokenSpliterator<T> for I {}
