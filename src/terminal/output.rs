//! `WriteBuffer`: Accumulator for bytes that have not been painted yet.

use std::io::Write;

/// Append-only byte accumulator.
///
/// Producers append here between redraws, and the painter takes the whole
/// contents in one go. A frame is always written with a single `write_all`
/// so the terminal never sees half of it.
#[derive(Debug, Default)]
pub struct WriteBuffer {
    data: Vec<u8>,
}

impl WriteBuffer {
    /// Create a new buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a few lines of status output.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append raw bytes.
    ///
    /// Growing the vector is the only way this can fail, and the allocator
    /// aborts on that rather than returning.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        self.data.extend_from_slice(bytes);
        bytes.len()
    }

    /// Move the contents out as a frame, leaving the buffer empty.
    ///
    /// The frame keeps the old allocation; the buffer starts over with a
    /// fresh one of the same capacity.
    pub fn take(&mut self) -> Self {
        let capacity = self.data.capacity();
        Self {
            data: std::mem::replace(&mut self.data, Vec::with_capacity(capacity)),
        }
    }

    /// Write the contents to a sink in a single call. The sink is not
    /// flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)
    }
}
