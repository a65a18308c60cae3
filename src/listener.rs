// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use crate::error::RecognitionError;
use crate::log::{BufLog, Logger, PrintLog};
use crate::token::Source;
use crate::{CaretCol, CaretLine};

/// Receives the lexical errors. The notification is fire-and-forget: a listener can't fail
/// back into the lexer.
pub trait ErrorListener {
    fn syntax_error(&mut self, source: &Source, line: CaretLine, column: CaretCol, msg: &str, cause: &RecognitionError);
}

fn format_error(line: CaretLine, column: CaretCol, msg: &str) -> String {
    format!("line {line}:{column} {msg}")
}

impl ErrorListener for PrintLog {
    fn syntax_error(&mut self, _source: &Source, line: CaretLine, column: CaretCol, msg: &str, _cause: &RecognitionError) {
        self.add_error(format_error(line, column, msg));
    }
}

impl ErrorListener for BufLog {
    fn syntax_error(&mut self, _source: &Source, line: CaretLine, column: CaretCol, msg: &str, _cause: &RecognitionError) {
        self.add_error(format_error(line, column, msg));
    }
}

/// Shared listener, so that the caller can keep a handle and inspect it after the lexer has run.
impl<L: ErrorListener> ErrorListener for Rc<RefCell<L>> {
    fn syntax_error(&mut self, source: &Source, line: CaretLine, column: CaretCol, msg: &str, cause: &RecognitionError) {
        self.borrow_mut().syntax_error(source, line, column, msg, cause);
    }
}

// ---------------------------------------------------------------------------------------------

/// Forwards the notifications to all the registered listeners, in order of registration.
#[derive(Default)]
pub struct ErrorListenerDispatch {
    listeners: Vec<Box<dyn ErrorListener>>,
}

impl ErrorListenerDispatch {
    pub fn new() -> Self {
        ErrorListenerDispatch::default()
    }

    /// Dispatch with a single listener printing the errors to stderr.
    pub fn with_console() -> Self {
        let mut dispatch = ErrorListenerDispatch::new();
        dispatch.add(PrintLog::new());
        dispatch
    }

    pub fn add<L: ErrorListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl ErrorListener for ErrorListenerDispatch {
    fn syntax_error(&mut self, source: &Source, line: CaretLine, column: CaretCol, msg: &str, cause: &RecognitionError) {
        if self.listeners.is_empty() {
            log::warn!("{} {}", source.name, format_error(line, column, msg));
        }
        for listener in self.listeners.iter_mut() {
            listener.syntax_error(source, line, column, msg, cause);
        }
    }
}

impl Debug for ErrorListenerDispatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ErrorListenerDispatch {{ {} listener(s) }}", self.listeners.len())
    }
}
