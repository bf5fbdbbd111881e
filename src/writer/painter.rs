//! Painter: owns the sink and knows what is currently on screen.
//!
//! Each paint erases the region left by the previous frame, measures the new
//! frame, writes it in one call, and keeps its shape for the next erase. Only
//! one generation of history is needed.

use super::lines::{count_visual_lines, VisualLines};
use crate::erase::Eraser;
use crate::terminal::WriteBuffer;
use std::io::{self, Write};

/// Paint statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Frames painted.
    pub frames: u64,
    /// Payload bytes written to the sink, bypass output included.
    pub bytes_written: u64,
    /// Erase attempts that failed and were skipped.
    pub erase_failures: u64,
    /// Frames the sink refused.
    pub sink_failures: u64,
}

pub(crate) struct Painter {
    sink: Box<dyn Write + Send>,
    eraser: Box<dyn Eraser>,
    /// Shape of the last frame, i.e. what the next paint must erase.
    painted: VisualLines,
    /// Bypass output stopped mid-row; the next frame starts on a fresh row.
    bypass_open: bool,
    width: Option<u16>,
    stats: PaintStats,
}

impl Painter {
    pub(crate) fn new(
        sink: Box<dyn Write + Send>,
        eraser: Box<dyn Eraser>,
        width: Option<u16>,
    ) -> Self {
        Self {
            sink,
            eraser,
            painted: VisualLines::default(),
            bypass_open: false,
            width,
            stats: PaintStats::default(),
        }
    }

    pub(crate) const fn painted(&self) -> VisualLines {
        self.painted
    }

    pub(crate) const fn width(&self) -> Option<u16> {
        self.width
    }

    pub(crate) fn set_width(&mut self, width: Option<u16>) {
        self.width = width;
    }

    pub(crate) const fn stats(&self) -> PaintStats {
        self.stats
    }

    /// Replace the previous frame with `frame`.
    ///
    /// An empty frame is a no-op. Only a failing sink is reported; the frame
    /// is never retried. Once the bytes were accepted the frame counts as
    /// painted, even if flushing the sink fails afterwards.
    pub(crate) fn paint(&mut self, frame: &WriteBuffer) -> io::Result<()> {
        if frame.is_empty() {
            return Ok(());
        }
        self.erase_region();
        if self.bypass_open {
            self.sink.write_all(b"\r\n").map_err(|err| self.sink_failed(err))?;
            self.bypass_open = false;
        }

        let shape = count_visual_lines(frame.as_bytes(), self.width);
        tracing::trace!(
            target: "live.flush",
            bytes = frame.len(),
            lines = shape.lines,
            open_tail = shape.open_tail,
            "paint"
        );

        frame.write_to(&mut self.sink).map_err(|err| self.sink_failed(err))?;
        self.painted = shape;
        self.stats.frames += 1;
        self.stats.bytes_written += frame.len() as u64;
        self.sink.flush().map_err(|err| self.sink_failed(err))
    }

    fn sink_failed(&mut self, err: io::Error) -> io::Error {
        self.stats.sink_failures += 1;
        tracing::warn!(target: "live.flush", %err, "sink refused the frame");
        err
    }

    /// Write `bytes` straight to the sink, outside the live region.
    ///
    /// The region is erased first and forgotten afterwards, so the next paint
    /// starts below the bypass output instead of erasing it. Output that ends
    /// mid-row is continued by further bypass writes; a frame moves to the
    /// next row first.
    pub(crate) fn bypass(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.erase_region();
        if let Some(&last) = bytes.last() {
            self.bypass_open = last != b'\n';
        }
        self.sink.write_all(bytes)?;
        self.sink.flush()?;
        self.stats.bytes_written += bytes.len() as u64;
        Ok(bytes.len())
    }

    pub(crate) fn flush_sink(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Erase the previous frame, best-effort. The painted state is cleared
    /// whether or not the erase worked.
    fn erase_region(&mut self) {
        let painted = std::mem::take(&mut self.painted);
        if painted.is_empty() {
            return;
        }
        if let Err(err) = self.erase(painted) {
            self.stats.erase_failures += 1;
            tracing::warn!(target: "live.erase", %err, rows = painted.rows_to_clear(), "erase failed");
        }
    }

    fn erase(&mut self, painted: VisualLines) -> io::Result<()> {
        if painted.open_tail {
            self.eraser.clear_current(&mut self.sink)?;
        }
        self.eraser.erase(&mut self.sink, painted.rows_above)
    }
}
