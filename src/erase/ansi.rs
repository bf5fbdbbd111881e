//! Escape-sequence eraser.

use super::Eraser;
use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;
use std::io::{self, Write};

/// Erases rows with ANSI escape sequences.
///
/// The per-row sequence (cursor up, clear line, column 0) is rendered once
/// through crossterm and reused for every erase.
#[derive(Debug, Clone)]
pub struct AnsiEraser {
    row: String,
    current: String,
}

impl AnsiEraser {
    /// Create an eraser with the sequences pre-rendered.
    pub fn new() -> Self {
        let mut row = String::new();
        let mut current = String::new();
        // Rendering into a String cannot fail.
        let _ = MoveUp(1).write_ansi(&mut row);
        let _ = Clear(ClearType::CurrentLine).write_ansi(&mut row);
        let _ = MoveToColumn(0).write_ansi(&mut row);
        let _ = Clear(ClearType::CurrentLine).write_ansi(&mut current);
        let _ = MoveToColumn(0).write_ansi(&mut current);
        Self { row, current }
    }

    /// The bytes emitted for one erased row.
    pub fn row_sequence(&self) -> &str {
        &self.row
    }

    /// The bytes emitted to clear the cursor's own row.
    pub fn current_sequence(&self) -> &str {
        &self.current
    }
}

impl Default for AnsiEraser {
    fn default() -> Self {
        Self::new()
    }
}

impl Eraser for AnsiEraser {
    fn erase(&mut self, sink: &mut dyn Write, lines: usize) -> io::Result<()> {
        if lines == 0 {
            return Ok(());
        }
        sink.write_all(self.row.repeat(lines).as_bytes())
    }

    fn clear_current(&mut self, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self.current.as_bytes())
    }
}
