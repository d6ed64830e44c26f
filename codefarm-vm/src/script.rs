//! # Script Source
//!
//! A script is kept as raw lines; nothing is parsed ahead of time. The
//! interpreter reads one line per tick and uses the indentation helpers here
//! to find where blocks end.

use crate::error::{self, Result};
use std::path::Path;

/// Upper bound on script length accepted from files
pub const MAX_SCRIPT_LINES: usize = 10_000;

/// Columns a tab expands to
pub const TAB_WIDTH: usize = 4;

/// Learner script split into lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    /// Split source text into lines, expanding tabs to four spaces
    pub fn parse(source: &str) -> Self {
        let tab = " ".repeat(TAB_WIDTH);
        let lines = source
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).replace('\t', &tab))
            .collect();
        Self { lines }
    }

    /// Read a script from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            error::Error::from(e)
                .with_operation("script::from_file")
                .with_context("path", path.display().to_string())
        })?;
        let script = Self::parse(&source);
        if script.len() > MAX_SCRIPT_LINES {
            return Err(error::script_too_large(script.len(), MAX_SCRIPT_LINES)
                .with_operation("script::from_file")
                .with_context("path", path.display().to_string()));
        }
        Ok(script)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of lines, including blank ones
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// See [`find_block_end`]
    pub fn find_block_end(&self, header_line: usize, header_indent: usize) -> usize {
        find_block_end(&self.lines, header_line, header_indent)
    }
}

/// Count of leading whitespace columns
pub fn indentation_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Blank and comment-only lines carry no statement and no block structure
pub fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Index of the first line after `header_line` that is back at or above the
/// header's depth, skipping blank and comment lines. Returns `lines.len()`
/// when the block runs to the end of the script.
pub fn find_block_end<S: AsRef<str>>(lines: &[S], header_line: usize, header_indent: usize) -> usize {
    lines
        .iter()
        .enumerate()
        .skip(header_line + 1)
        .find(|(_, line)| {
            let line = line.as_ref();
            !is_skippable(line) && indentation_of(line) <= header_indent
        })
        .map(|(index, _)| index)
        .unwrap_or(lines.len())
}
