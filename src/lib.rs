// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Token-production driver for generated lexers.
//!
//! The [`Lexer`](lexer::Lexer) pulls characters from a [`CharStream`](char_stream::CharStream)
//! through a [`Recognizer`](recognizer::Recognizer), which classifies the next run of characters,
//! and turns the classifications into a well-formed, EOF-terminated sequence of tokens built by a
//! [`TokenFactory`](token::TokenFactory). Unrecognized input is reported to the
//! [error listeners](listener::ErrorListener) and skipped one character at a time.

pub mod error;
pub mod log;
pub mod char_stream;
pub mod char_reader;
pub mod token;
pub mod listener;
pub mod recognizer;
pub mod segmap;
pub mod dfa;
pub mod lexer;

/// ID of a lexer token
pub type TokenId = u16;
/// ID of a token channel
pub type ChannelId = u16;
/// ID of a lexical mode
pub type ModeId = u16;

pub type CaretLine = u64;
pub type CaretCol = u64;

/// Mode active when the lexer starts or is reset.
pub const DEFAULT_MODE: ModeId = 0;
/// Channel of the tokens meant for the parser.
pub const DEFAULT_CHANNEL: ChannelId = 0;
/// Conventional channel for the tokens the parser should ignore (comments, etc.).
pub const HIDDEN_CHANNEL: ChannelId = 1;
/// Token type reserved for the end-of-input sentinel.
pub const TOKEN_EOF: TokenId = TokenId::MAX;

pub trait CollectJoin {
    fn join(&mut self, separator: &str) -> String
        where Self: Iterator,
              <Self as Iterator>::Item: ToString
    {
        self.map(|x| x.to_string()).collect::<Vec<_>>().join(separator)
    }

    fn to_vec(self) -> Vec<<Self as Iterator>::Item>
        where Self: Iterator + Sized
    {
        self.collect::<Vec<_>>()
    }
}

impl<I: Iterator> CollectJoin for I {}
