//! # Statement Classifier
//!
//! Turns one source line into one of a closed set of statement kinds. The
//! grammar is prefix based: a line is a `while` header because it starts
//! with `while `, not because it parses as one. Lines that fit nothing are
//! [`Statement::NoOp`].

use crate::condition::Condition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// Empty or comment-only line
    Blank,
    /// `while <cond>:`
    While { condition: Condition },
    /// `for i in range(N):` - the loop variable is never bound
    For { count: u32 },
    /// `if <cond>:`
    If { condition: Condition },
    /// `else:`
    Else,
    /// `<word>()`
    Call { command: String },
    /// Anything containing `=` that is not a call
    Assignment,
    /// Everything else, including `elif`
    NoOp,
}

impl Statement {
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Statement::Blank;
        }

        if let Some(rest) = line.strip_prefix("while ") {
            return Statement::While {
                condition: Condition::parse(&header_condition(rest)),
            };
        }
        if line.starts_with("for ") {
            return Statement::For {
                count: range_count(line).unwrap_or(1),
            };
        }
        if let Some(rest) = line.strip_prefix("if ") {
            return Statement::If {
                condition: Condition::parse(&header_condition(rest)),
            };
        }
        if line.starts_with("else:") {
            return Statement::Else;
        }
        if let Some(command) = call_name(line) {
            return Statement::Call {
                command: command.to_string(),
            };
        }
        if line.contains('=') {
            return Statement::Assignment;
        }
        Statement::NoOp
    }

    /// Short name for logs and traces
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Blank => "blank",
            Statement::While { .. } => "while",
            Statement::For { .. } => "for",
            Statement::If { .. } => "if",
            Statement::Else => "else",
            Statement::Call { .. } => "call",
            Statement::Assignment => "assignment",
            Statement::NoOp => "noop",
        }
    }
}

/// Condition text of a header: the first `:` is dropped, wherever it is
fn header_condition(rest: &str) -> String {
    rest.replacen(':', "", 1)
}

/// First `range(<digits>)` in the line
fn range_count(line: &str) -> Option<u32> {
    line.match_indices("range(").find_map(|(start, pattern)| {
        let after = &line[start + pattern.len()..];
        let digits = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
        if digits == 0 || !after[digits..].starts_with(')') {
            return None;
        }
        // more digits than fit: keep the default
        Some(after[..digits].parse().unwrap_or(1))
    })
}

/// `forward()` -> `forward`; letters and underscores only, anything may follow
fn call_name(line: &str) -> Option<&str> {
    let end = line
        .find(|c: char| !(c.is_ascii_alphabetic() || c == '_'))
        .unwrap_or(line.len());
    if end > 0 && line[end..].starts_with("()") {
        Some(&line[..end])
    } else {
        None
    }
}
