// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.
//
// Integration tests: a table-driven lexicon driven through the public API.

#![cfg(test)]

mod lexicon;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;
use lexdriver::char_reader::ReaderStream;
use lexdriver::char_stream::{CharStream, InputStream};
use lexdriver::error::RecognitionError;
use lexdriver::listener::ErrorListener;
use lexdriver::log::{BufLog, LogStatus};
use lexdriver::token::{CommonToken, Source, Token, TokenSpliterator};
use lexdriver::{CaretCol, CaretLine, ChannelId, CollectJoin, TokenId, HIDDEN_CHANNEL, TOKEN_EOF};
use lexicon::*;

type Summary = (TokenId, ChannelId, String, usize, isize, CaretLine, CaretCol);

fn summary(t: &CommonToken) -> Summary {
    (t.token_type, t.channel, t.text.clone(), t.start, t.stop, t.line, t.column)
}

fn s(token_type: TokenId, channel: ChannelId, text: &str, start: usize, stop: isize, line: CaretLine, col: CaretCol) -> Summary {
    (token_type, channel, text.to_string(), start, stop, line, col)
}

mod tokens {
    use super::*;

    #[test]
    fn lexicon() {
        let mut lexer = build_lexer();
        lexer.attach_stream(InputStream::new("abc 12 \"x y\"\nz9 é"));
        let mut result = lexer.all_tokens().unwrap().iter().map(summary).to_vec();
        result.push(summary(&lexer.next_token().unwrap()));
        assert_eq!(result, vec![
            s(ID, 0, "abc", 0, 2, 1, 1),
            s(NUM, 0, "12", 4, 5, 1, 5),
            s(STR, 0, "\"x y\"", 7, 11, 1, 8),
            s(NL, HIDDEN_CHANNEL, "\n", 12, 12, 1, 13),
            s(ID, 0, "z9", 13, 14, 2, 1),
            s(ID, 0, "é", 16, 16, 2, 4),
            s(TOKEN_EOF, 0, "", 17, 16, 2, 5),
        ]);
        assert_eq!(lexer.mode(), 0);
        assert!(lexer.mode_stack().is_empty());
    }

    #[test]
    fn display() {
        let mut lexer = build_lexer();
        lexer.attach_stream(InputStream::new("a1  b\tλ"));
        assert_eq!(lexer.tokens().join(" "), "[@0:1='a1',<1>,1:1] [@4:4='b',<1>,1:5] [@6:6='λ',<1>,1:9]");
        assert_eq!(lexer.next_token().unwrap().to_string(), "[@7:6='<EOF>',<EOF>,1:10]");
    }

    #[test]
    fn channels() {
        let mut lexer = build_lexer();
        lexer.attach_stream(InputStream::new("a\nb\r\n\n3"));
        let mut hidden = Vec::new();
        let kept = lexer.tokens()
            .split_channels(0, |t: CommonToken| hidden.push((t.text, t.line)))
            .map(|t| (t.text, t.line))
            .to_vec();
        assert_eq!(kept, vec![("a".to_string(), 1), ("b".to_string(), 2), ("3".to_string(), 4)]);
        assert_eq!(hidden, vec![("\n".to_string(), 1), ("\r\n\n".to_string(), 2)]);
    }

    #[test]
    fn reader_stream() {
        let text = "abc 12 \"x\ny\"\nz9 é αβ 007";
        let mut lexer = build_lexer();
        lexer.attach_stream(InputStream::new(text));
        let expected = lexer.all_tokens().unwrap().iter().map(summary).to_vec();
        let mut lexer = build_lexer();
        lexer.attach_stream(ReaderStream::with_name(Cursor::new(text), "reader"));
        let tokens = lexer.all_tokens().unwrap();
        assert_eq!(tokens.iter().map(summary).to_vec(), expected);
        assert!(tokens.iter().all(|t| t.source().name == "reader"));
        assert!(lexer.stream().map(|s| s.buffered() < text.chars().count()).unwrap_or(false), "consumed characters are dropped");
    }

    #[test]
    fn reset() {
        let mut lexer = build_lexer();
        lexer.attach_stream(InputStream::new("ab \"c"));
        let first = lexer.all_tokens().unwrap().iter().map(summary).to_vec();
        assert_eq!(lexer.mode(), MODE_STRING);
        lexer.reset().unwrap();
        assert_eq!((lexer.mode(), lexer.char_index(), lexer.line(), lexer.column()), (0, 0, 1, 1));
        let second = lexer.all_tokens().unwrap().iter().map(summary).to_vec();
        assert_eq!(first, second);
        assert_eq!(first, vec![s(ID, 0, "ab", 0, 1, 1, 1)]);
    }
}

mod errors {
    use super::*;

    struct Recorder(Vec<(String, u32, CaretLine, CaretCol, String, Option<char>)>);

    impl ErrorListener for Recorder {
        fn syntax_error(&mut self, source: &Source, line: CaretLine, column: CaretCol, msg: &str, cause: &RecognitionError) {
            self.0.push((source.name.clone(), source.attachment, line, column, msg.to_string(), cause.info().curr_char));
        }
    }

    #[test]
    fn recognition_errors() {
        let log = Rc::new(RefCell::new(BufLog::new()));
        let mut lexer = build_lexer();
        lexer.add_error_listener(Rc::clone(&log));
        lexer.attach_stream(InputStream::new("ab#\"cd"));
        let result = lexer.all_tokens().unwrap().iter().map(summary).to_vec();
        assert_eq!(result, vec![s(ID, 0, "ab", 0, 1, 1, 1)]);
        assert_eq!(summary(&lexer.next_token().unwrap()), s(TOKEN_EOF, 0, "", 6, 5, 1, 3));
        assert_eq!((lexer.mode(), lexer.mode_stack()), (MODE_STRING, &[0][..]));
        assert_eq!(log.borrow().num_errors(), 2);
        assert_eq!(log.borrow().get_errors().to_vec(), vec![
            "line 1:3 token recognition error at: '#'",
            "line 1:4 token recognition error at: '\"cd'",
        ]);
        assert!(lexer.error().is_none());
    }

    #[test]
    fn listeners() {
        let recorder = Rc::new(RefCell::new(Recorder(Vec::new())));
        let mut lexer = build_lexer();
        lexer.add_error_listener(Rc::clone(&recorder));
        assert_eq!(lexer.error_listeners().len(), 1);
        lexer.attach_stream(InputStream::with_name("a\n #", "first"));
        lexer.all_tokens().unwrap();
        lexer.attach_stream(InputStream::with_name("Z", "second"));
        lexer.all_tokens().unwrap();
        assert_eq!(recorder.borrow().0, vec![
            ("first".to_string(), 1, 2, 2, "token recognition error at: '#'".to_string(), Some('#')),
            ("second".to_string(), 2, 1, 1, "token recognition error at: 'Z'".to_string(), Some('Z')),
        ]);
    }

    #[test]
    fn no_stream() {
        let mut lexer = build_lexer::<InputStream>();
        assert!(lexer.next_token().is_err());
        assert_eq!(lexer.error().map(|e| e.to_string()), Some("no stream attached".to_string()));
        lexer.attach_stream(InputStream::new("a"));
        assert!(lexer.error().is_none());
        assert_eq!(lexer.next_token().map(|t| t.token_type), Ok(ID));
        let input = lexer.detach_stream().unwrap();
        assert_eq!(input.index(), 1);
        assert!(lexer.tokens().next().is_none());
        assert!(lexer.has_error());
    }
}
