//! Auxiliary handles onto a live writer.

use super::Shared;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Writes into the same live region as the writer it came from.
///
/// Use one per row of a multi-line display: every write lands in the shared
/// pending buffer, in call order, and is painted by the same flush as the
/// primary writer's output. A single `write!`/`writeln!` is appended as one
/// piece, so rows from different threads never interleave mid-row.
#[derive(Clone)]
pub struct Line {
    shared: Arc<Shared>,
}

impl Line {
    pub(crate) const fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

impl Write for Line {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.shared.append(buf))
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.shared.append(fmt::format(args).as_bytes());
        Ok(())
    }

    /// Painting is left to the writer; this is a no-op.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line").finish_non_exhaustive()
    }
}

/// Prints permanent output outside the live region.
///
/// Each write erases the live region, goes straight to the sink, and makes
/// the writer forget the erased region. The next flush repaints the live
/// output below it, so bypass output scrolls up like ordinary log lines.
#[derive(Clone)]
pub struct Bypass {
    shared: Arc<Shared>,
}

impl Bypass {
    pub(crate) const fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }
}

impl Write for Bypass {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.shared.bypass(buf)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.shared.bypass(fmt::format(args).as_bytes()).map(|_| ())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.shared.flush_sink()
    }
}

impl fmt::Debug for Bypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bypass").finish_non_exhaustive()
    }
}
