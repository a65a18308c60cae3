// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Message sinks for the lexical diagnostics.
//!
//! Both sinks implement [`ErrorListener`](crate::listener::ErrorListener), so they can be
//! registered on a lexer to print or collect the token recognition errors.

use std::fmt::{Debug, Display, Formatter};

/// Read access to the messages of a sink
pub trait LogStatus: Debug {
    fn num_errors(&self) -> usize;

    #[inline]
    fn has_no_errors(&self) -> bool {
        self.num_errors() == 0
    }
}

/// Write access to a sink
pub trait Logger: Debug {
    fn add_error<T: Into<String>>(&mut self, msg: T);
}

// ---------------------------------------------------------------------------------------------

/// Sink that prints the messages to stderr without storing them. It's the default listener of
/// a lexer.
#[derive(Clone, Debug, Default)]
pub struct PrintLog {
    num_errors: usize
}

impl PrintLog {
    pub fn new() -> PrintLog {
        PrintLog::default()
    }
}

impl LogStatus for PrintLog {
    fn num_errors(&self) -> usize {
        self.num_errors
    }
}

impl Logger for PrintLog {
    fn add_error<T: Into<String>>(&mut self, msg: T) {
        self.num_errors += 1;
        eprintln!("ERROR:   {}", msg.into());
    }
}

// ---------------------------------------------------------------------------------------------

/// Sink that stores the messages in order of arrival.
#[derive(Clone, Debug, Default)]
pub struct BufLog {
    errors: Vec<String>,
}

impl BufLog {
    pub fn new() -> Self {
        BufLog::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn get_errors(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|s| s.as_str())
    }
}

impl LogStatus for BufLog {
    fn num_errors(&self) -> usize {
        self.errors.len()
    }
}

impl Logger for BufLog {
    fn add_error<T: Into<String>>(&mut self, msg: T) {
        self.errors.push(msg.into());
    }
}

impl Display for BufLog {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.errors.iter().map(|m| format!("- ERROR  : {m}")).collect::<Vec<_>>().join("\n"))
    }
}
