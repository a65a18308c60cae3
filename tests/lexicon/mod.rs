// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Small lexicon used by the integration tests:
//!
//! ```text
//! lexicon Demo;
//! channels { HIDDEN }
//!
//! Id          : [a-z] [a-z0-9]*;
//! Num         : [0-9]+;
//! Ws          : [ \t]+                -> skip;
//! Nl          : [\n\r]+               -> channel(HIDDEN);
//! Quote       : '"'                   -> more, push(STRING);
//!
//! mode STRING;
//! Str         : [a-z0-9 \t\n\r]* '"'  -> pop;
//! ```
//!
//! The non-ASCII letters 'é' and 'α'-'ω' are in [a-z] as well.

#![allow(dead_code)]

use std::collections::HashMap;
use lexdriver::char_stream::CharStream;
use lexdriver::dfa::{ActionOption, DfaRecognizer, DfaTables, ModeOption, StateId, Terminal};
use lexdriver::lexer::Lexer;
use lexdriver::segmap::{GroupId, Seg, SegMap};
use lexdriver::{TokenId, HIDDEN_CHANNEL};

pub const ID: TokenId = 1;
pub const NUM: TokenId = 2;
pub const STR: TokenId = 3;
pub const NL: TokenId = 4;

pub const MODE_STRING: u16 = 1;

const NBR_GROUPS: u32 = 5;
const FIRST_END_STATE: StateId = 3;
const NBR_STATES: StateId = 9;

static ASCII_TO_GROUP: [GroupId; 128] = [
      5,   5,   5,   5,   5,   5,   5,   5,   5,   2,   4,   5,   5,   4,   5,   5,   // 0-15
      5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   // 16-31
      2,   5,   3,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   // 32-47
      1,   1,   1,   1,   1,   1,   1,   1,   1,   1,   5,   5,   5,   5,   5,   5,   // 48-63
      5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   // 64-79
      5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   5,   // 80-95
      5,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   // 96-111
      0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   5,   5,   5,   5,   5,   // 112-127
];

static STATE_TABLE: [StateId; 45] = [
    //  a-z  0-9  ws   "    nl
        3,   4,   5,   6,   8,  // 0: mode 0 start
        2,   2,   2,   7,   2,  // 1: mode STRING start
        2,   2,   2,   7,   2,  // 2: string body
        3,   3,   9,   9,   9,  // 3 <end:1>
        9,   4,   9,   9,   9,  // 4 <end:2>
        9,   9,   5,   9,   9,  // 5 <skip>
        9,   9,   9,   9,   9,  // 6 <more,push(1)>
        9,   9,   9,   9,   9,  // 7 <end:3,pop>
        9,   9,   9,   9,   8,  // 8 <end:4,ch 1>
];

static TERMINAL_TABLE: [Terminal; 6] = [
    Terminal { action: ActionOption::Token(ID), channel: 0, mode: ModeOption::None, pop: false },
    Terminal { action: ActionOption::Token(NUM), channel: 0, mode: ModeOption::None, pop: false },
    Terminal { action: ActionOption::Skip, channel: 0, mode: ModeOption::None, pop: false },
    Terminal { action: ActionOption::More, channel: 0, mode: ModeOption::Push(MODE_STRING), pop: false },
    Terminal { action: ActionOption::Token(STR), channel: 0, mode: ModeOption::None, pop: true },
    Terminal { action: ActionOption::Token(NL), channel: HIDDEN_CHANNEL, mode: ModeOption::None, pop: false },
];

static MODE_STATES: [StateId; 2] = [0, 1];

pub fn build_recognizer() -> DfaRecognizer<'static> {
    DfaRecognizer::new(DfaTables {
        nbr_groups: NBR_GROUPS,
        first_end_state: FIRST_END_STATE,
        nbr_states: NBR_STATES,
        ascii_to_group: &ASCII_TO_GROUP,
        utf8_to_group: HashMap::from([('é', 0)]),
        seg_to_group: SegMap::from([(Seg('α' as u32, 'ω' as u32), 0)]),
        state_table: &STATE_TABLE,
        terminal_table: &TERMINAL_TABLE,
        mode_states: &MODE_STATES,
    })
}

pub fn build_lexer<S: CharStream>() -> Lexer<S, DfaRecognizer<'static>> {
    let mut lexer = Lexer::new(build_recognizer());
    lexer.remove_error_listeners();
    lexer
}
