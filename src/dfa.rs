// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Table-driven recognizer: a DFA per lexical mode, with the lexer actions attached to its
//! accepting states.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use crate::char_stream::CharStream;
use crate::error::{LexerError, LexerErrorInfo};
use crate::lexer::LexerState;
use crate::recognizer::{MatchOutcome, Recognizer};
use crate::segmap::{char_to_group, GroupId, SegMap};
use crate::token::TokenType;
use crate::{CaretCol, CaretLine, ChannelId, ModeId, TokenId, DEFAULT_CHANNEL, TOKEN_EOF};

pub type StateId = usize;

/// Terminal instructions attached to an accepting state.
///
/// Possible actions:
/// * skip           => doesn't return token, drops current string
/// * more           => doesn't return token, keeps current string for next rule
/// * mode(n)        => switches to mode `n`
/// * push(n)        => pushes mode and switches to mode `n`
/// * pop            => pops next mode from the stack
/// * channel #      => defines output channel
///
/// `pop` is applied first, then the mode change, so that a rule can leave a mode and push another.
#[derive(Clone, Debug, PartialEq, Default, Eq)]
pub struct Terminal {
    pub action: ActionOption,
    pub channel: ChannelId,
    pub mode: ModeOption,
    pub pop: bool,
}

impl Terminal {
    pub fn token(token: TokenId) -> Self {
        Terminal { action: ActionOption::Token(token), ..Terminal::default() }
    }

    #[inline]
    pub fn is_only_skip(&self) -> bool {
        self.action.is_skip() && self.mode.is_none() && !self.pop
    }

    #[inline]
    pub fn get_token(&self) -> Option<TokenId> {
        self.action.get_token()
    }

    /// Applies the terminal's actions to the lexer state, returning the type of the match.
    fn apply<T>(&self, state: &mut LexerState<T>) -> Result<TokenType, LexerError> {
        if self.pop {
            state.pop_mode()?;
        }
        match self.mode {
            ModeOption::None => {}
            ModeOption::Mode(m) => state.set_mode(m),
            ModeOption::Push(m) => state.push_mode(m),
        }
        if self.channel != DEFAULT_CHANNEL {
            state.set_channel(self.channel);
        }
        Ok(self.action.token_type())
    }
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.action)?;
        if self.channel != DEFAULT_CHANNEL { write!(f, ",ch {}", self.channel)?; }
        match self.mode {
            ModeOption::None => {}
            ModeOption::Mode(m) => write!(f, ",mode({m})")?,
            ModeOption::Push(m) => write!(f, ",push({m})")?,
        }
        if self.pop { write!(f, ",pop")?; }
        write!(f, ">")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Eq)]
pub enum ActionOption {
    #[default] Skip,
    Token(TokenId),
    More
}

impl ActionOption {
    pub fn is_skip(&self) -> bool { self == &ActionOption::Skip }

    pub fn get_token(&self) -> Option<TokenId> {
        if let ActionOption::Token(token) = self {
            Some(*token)
        } else {
            None
        }
    }

    pub fn token_type(&self) -> TokenType {
        match self {
            ActionOption::Skip => TokenType::Skip,
            ActionOption::Token(t) => TokenType::Type(*t),
            ActionOption::More => TokenType::More,
        }
    }
}

impl Display for ActionOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionOption::Skip => write!(f, "skip"),
            ActionOption::Token(t) => write!(f, "end:{t}"),
            ActionOption::More => write!(f, "more")
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Eq)]
pub enum ModeOption {
    #[default]
    None,
    Mode(ModeId),
    Push(ModeId)
}

impl ModeOption {
    pub fn is_none(&self) -> bool {
        self == &ModeOption::None
    }
}

// ---------------------------------------------------------------------------------------------

/// Transition tables of the recognizer.
///
/// The characters are first mapped to groups, then each state has one transition per group:
/// `state_table[nbr_groups * state + group]`. The states are ordered so that
/// * `state < first_end_state` is a non-accepting state,
/// * `first_end_state <= state < nbr_states` is an accepting state, whose terminal is
///   `terminal_table[state - first_end_state]`,
/// * `state >= nbr_states` means there's no transition.
#[derive(Clone, Debug)]
pub struct DfaTables<'a> {
    pub nbr_groups: u32,
    pub first_end_state: StateId,
    pub nbr_states: StateId,
    pub ascii_to_group: &'a [GroupId],
    pub utf8_to_group: HashMap<char, GroupId>,
    pub seg_to_group: SegMap<GroupId>,
    pub state_table: &'a [StateId],
    pub terminal_table: &'a [Terminal],
    /// start state of each mode
    pub mode_states: &'a [StateId],
}

/// Recognizer walking the DFA of the current mode as long as a transition exists for the next
/// character (maximal munch, without backtracking), then applying the terminal of the state it
/// stops in.
#[derive(Clone, Debug)]
pub struct DfaRecognizer<'a> {
    tables: DfaTables<'a>,
    line: CaretLine,
    col: CaretCol,
    tab_width: u8,
    start_index: usize,
}

impl<'a> DfaRecognizer<'a> {
    pub fn new(tables: DfaTables<'a>) -> Self {
        DfaRecognizer { tables, line: 1, col: 1, tab_width: 4, start_index: 0 }
    }

    pub fn set_tab_width(&mut self, width: u8) {
        self.tab_width = width.max(1);
    }

    pub fn get_tab_width(&self) -> u8 {
        self.tab_width
    }

    /// Stream index where the current match started.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    fn next_state(&self, state: StateId, c: Option<char>) -> StateId {
        let t = &self.tables;
        c.and_then(|c| char_to_group(t.ascii_to_group, &t.utf8_to_group, &t.seg_to_group, c))
            .filter(|&group| group < t.nbr_groups)
            .and_then(|group| t.state_table.get(t.nbr_groups as usize * state + group as usize).copied())
            .unwrap_or(t.nbr_states)
    }

    fn terminal(&self, state: StateId) -> Option<&Terminal> {
        let t = &self.tables;
        if t.first_end_state <= state && state < t.nbr_states {
            t.terminal_table.get(state - t.first_end_state)
        } else {
            None
        }
    }

    pub fn update_pos(&mut self, c: char) {
        match c {
            '\t' => {
                //            ↓       ↓    (if self.tab_width = 8)
                //    1234567890123456789
                // 1) ..↑                  col = 3
                //    ..→→→→→→↑            col = 3 - 2%8 + 8 = 3 - 2 + 8 = 9
                self.col = self.col - (self.col - 1) % self.tab_width as CaretCol + self.tab_width as CaretCol;
            }
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            '\r' => {}
            _ => self.col += 1,
        }
    }
}

impl<T> Recognizer<T> for DfaRecognizer<'_> {
    // match_token flow:
    //
    //      state = start state of mode
    //      loop
    //          next_state from LA(1)
    //          if next_state valid
    //              consume, state = next_state
    //          else if state accepting
    //              apply pop, mode/push, channel
    //              return action
    //          else if EOF and nothing consumed
    //              return EOF
    //          else
    //              return no viable alt
    //
    fn match_token(&mut self, input: &mut dyn CharStream, mode: ModeId, state: &mut LexerState<T>) -> Result<MatchOutcome, LexerError> {
        let mut dfa_state = *self.tables.mode_states.get(mode as usize).ok_or(LexerError::UnknownMode { mode })?;
        self.start_index = input.index();
        let (line, col) = (self.line, self.col);
        loop {
            let c_opt = input.la(1);
            let new_state = self.next_state(dfa_state, c_opt);
            if new_state < self.tables.nbr_states {
                Recognizer::<T>::consume(self, input);
                dfa_state = new_state;
                continue;
            }
            if let Some(terminal) = self.terminal(dfa_state) {
                log::trace!("mode {mode}: state {dfa_state} {terminal}");
                return Ok(MatchOutcome::Matched(terminal.apply(state)?));
            }
            if c_opt.is_none() && input.index() == self.start_index {
                return Ok(MatchOutcome::Matched(TokenType::Type(TOKEN_EOF)));
            }
            let info = LexerErrorInfo {
                index: self.start_index,
                line,
                col,
                curr_char: c_opt,
                mode,
                text: input.text(self.start_index..input.index()),
            };
            return Ok(MatchOutcome::NoViableAlt(info));
        }
    }

    fn consume(&mut self, input: &mut dyn CharStream) {
        if let Some(c) = input.la(1) {
            input.consume();
            self.update_pos(c);
        }
    }

    fn line(&self) -> CaretLine {
        self.line
    }

    fn set_line(&mut self, line: CaretLine) {
        self.line = line;
    }

    fn column(&self) -> CaretCol {
        self.col
    }

    fn set_column(&mut self, column: CaretCol) {
        self.col = column;
    }

    fn text(&self, input: &dyn CharStream) -> String {
        input.text(self.start_index..input.index())
    }

    fn reset(&mut self) {
        self.line = 1;
        self.col = 1;
        self.start_index = 0;
    }
}
