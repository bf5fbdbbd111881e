//! Erasing previously painted rows.
//!
//! Two strategies sit behind the [`Eraser`] trait:
//!
//! - [`AnsiEraser`]: cursor-up and clear-line escape sequences written into
//!   the sink. Works on any ANSI terminal, and degrades to harmless bytes
//!   when the sink is a file or a pipe.
//! - `ConsoleEraser` (Windows only): drives the console screen buffer
//!   directly for legacy consoles that print escape sequences literally.
//!
//! The strategy is picked once, when the writer is built, by
//! [`EraseStrategy::probe`].

mod ansi;
#[cfg(windows)]
mod console;

pub use ansi::AnsiEraser;
#[cfg(windows)]
pub use console::ConsoleEraser;

use crate::terminal::Stream;
use std::io::{self, Write};

/// Removes rows that were painted earlier.
///
/// Both operations leave the cursor at column 0. Implementations may write
/// to `sink` or talk to the terminal out of band; callers treat failures as
/// cosmetic.
pub trait Eraser: Send {
    /// Move up one row and clear it, `lines` times.
    ///
    /// The cursor is expected to sit on the row just below the rows being
    /// erased, and ends on the topmost erased row.
    fn erase(&mut self, sink: &mut dyn Write, lines: usize) -> io::Result<()>;

    /// Clear the row the cursor is on.
    fn clear_current(&mut self, sink: &mut dyn Write) -> io::Result<()>;
}

/// Which erase strategy a writer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseStrategy {
    /// Escape sequences written to the sink.
    Ansi,
    /// Native console API calls.
    #[cfg(windows)]
    Console,
}

impl EraseStrategy {
    /// Pick a strategy for one of the process streams.
    ///
    /// The native console path is only taken for stdout, when it is a real
    /// console that does not honour escape sequences. crossterm's console
    /// calls always target the stdout screen buffer, so stderr keeps the
    /// escape-sequence eraser.
    pub fn probe(stream: Stream) -> Self {
        #[cfg(windows)]
        if stream == Stream::Stdout
            && stream.is_terminal()
            && !crossterm::ansi_support::supports_ansi()
        {
            return Self::Console;
        }
        let _ = stream;
        Self::Ansi
    }

    /// Build the eraser for this strategy.
    pub fn eraser(self) -> Box<dyn Eraser> {
        match self {
            Self::Ansi => Box::new(AnsiEraser::new()),
            #[cfg(windows)]
            Self::Console => Box::new(ConsoleEraser),
        }
    }
}
