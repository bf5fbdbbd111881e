//! Native console eraser for Windows consoles without ANSI support.

use super::Eraser;
use crossterm::cursor::MoveUp;
use crossterm::terminal::{Clear, ClearType};
use crossterm::Command;
use std::io::{self, Write};

/// Erases rows through the console screen-buffer API.
///
/// crossterm's WinAPI path reads the screen-buffer info for every call,
/// moves the cursor, and fills the row with spaces using the current text
/// attributes, so colours around the live region are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEraser;

impl Eraser for ConsoleEraser {
    fn erase(&mut self, sink: &mut dyn Write, lines: usize) -> io::Result<()> {
        // The console cursor only moves once buffered output has landed.
        sink.flush()?;
        for _ in 0..lines {
            MoveUp(1).execute_winapi()?;
            Clear(ClearType::CurrentLine).execute_winapi()?;
        }
        Ok(())
    }

    fn clear_current(&mut self, sink: &mut dyn Write) -> io::Result<()> {
        sink.flush()?;
        Clear(ClearType::CurrentLine).execute_winapi()
    }
}
