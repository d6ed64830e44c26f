//! # Block Stack
//!
//! Open `for`/`while`/`if`/`else` blocks, innermost on top. A frame stays on
//! the stack until the interpreter reaches a line indented at or above the
//! frame's header.

use serde::{Deserialize, Serialize};

/// An open block. `line` is the header's line index, `indent` its indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    For {
        line: usize,
        indent: usize,
        /// Completed passes through the body, starting at 0
        iteration: u32,
        target: u32,
    },
    While {
        line: usize,
        indent: usize,
    },
    If {
        line: usize,
        indent: usize,
    },
    Else {
        line: usize,
        indent: usize,
    },
}

impl Frame {
    /// Header line index
    pub fn line(&self) -> usize {
        match *self {
            Frame::For { line, .. }
            | Frame::While { line, .. }
            | Frame::If { line, .. }
            | Frame::Else { line, .. } => line,
        }
    }

    /// Header indentation
    pub fn indent(&self) -> usize {
        match *self {
            Frame::For { indent, .. }
            | Frame::While { indent, .. }
            | Frame::If { indent, .. }
            | Frame::Else { indent, .. } => indent,
        }
    }

    /// A line at `indent` lies outside this block
    pub fn is_closed_by(&self, indent: usize) -> bool {
        indent <= self.indent()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Frame::For { .. } => "for",
            Frame::While { .. } => "while",
            Frame::If { .. } => "if",
            Frame::Else { .. } => "else",
        }
    }
}

/// LIFO stack of open blocks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStack {
    frames: Vec<Frame>,
}

impl BlockStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Innermost open block
    pub fn peek(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Pop the top frame only if a line at `indent` ends it
    pub fn pop_closed_by(&mut self, indent: usize) -> Option<Frame> {
        if self.peek()?.is_closed_by(indent) {
            self.frames.pop()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Iterate frames (outermost first)
    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Frame] {
        &self.frames
    }
}
