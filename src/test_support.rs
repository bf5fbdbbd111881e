//! Shared fixtures for unit tests.

use crate::erase::Eraser;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// In-memory sink that can be inspected while a writer owns a clone.
#[derive(Clone, Default)]
pub struct SharedSink {
    data: Arc<Mutex<Vec<u8>>>,
    writes: Arc<Mutex<usize>>,
    fail_flush: bool,
}

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that accepts every write but fails every flush.
    pub fn with_failing_flush() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().clone()
    }

    /// Number of `write` calls that reached the sink.
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        *self.writes.lock() += 1;
        self.data.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail_flush {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        Ok(())
    }
}

/// Sink whose writes always fail.
pub struct FailingSink;

impl Write for FailingSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Eraser that records what it was asked to do and writes nothing.
#[derive(Clone, Default)]
pub struct RecordingEraser {
    calls: Arc<Mutex<Vec<usize>>>,
    current: Arc<Mutex<usize>>,
    fail: bool,
}

impl RecordingEraser {
    pub fn new() -> Self {
        Self::default()
    }

    /// An eraser whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Line counts passed to `erase`, in order.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }

    /// Total rows cleared by both operations.
    pub fn rows_cleared(&self) -> usize {
        self.calls.lock().iter().sum::<usize>() + *self.current.lock()
    }

    fn check(&self) -> io::Result<()> {
        if self.fail {
            return Err(io::Error::other("console unavailable"));
        }
        Ok(())
    }
}

impl Eraser for RecordingEraser {
    fn erase(&mut self, _sink: &mut dyn Write, lines: usize) -> io::Result<()> {
        self.check()?;
        self.calls.lock().push(lines);
        Ok(())
    }

    fn clear_current(&mut self, _sink: &mut dyn Write) -> io::Result<()> {
        self.check()?;
        *self.current.lock() += 1;
        Ok(())
    }
}
