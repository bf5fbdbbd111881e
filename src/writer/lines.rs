//! Visual line counting with soft-wrap accounting.
//!
//! A frame is scanned once before it is painted. The result says how many
//! rows the frame occupies on screen, which is exactly what the next flush
//! has to erase.
//!
//! Rules:
//! - `\n` ends a row. `\r` returns to column 0 on the same row.
//! - With a known width, each grapheme cluster advances the column by its
//!   display width. A cluster that would cross the right edge wraps: one
//!   more row is counted and the cluster starts the new row.
//! - Escape sequences take no columns. An escape sequence cut off at the end
//!   of the frame is treated as complete.
//! - `\t` advances to the next multiple of 8. Bytes that are not valid UTF-8
//!   take one column each.
//! - With a known width, a trailing row without a terminator counts as one
//!   more visual line. Without a width only terminators are counted.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ESC: u8 = 0x1b;
const TAB_STOP: usize = 8;

/// Shape of a painted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisualLines {
    /// Visual lines the frame produced.
    pub lines: usize,
    /// Row boundaries crossed while painting: terminators plus wraps.
    /// The cursor ends this many rows below where the frame started.
    pub rows_above: usize,
    /// The frame ended with content on the cursor's row and no terminator.
    pub open_tail: bool,
}

impl VisualLines {
    /// Rows an erase has to clear, including the cursor's own row when the
    /// frame left content on it.
    pub const fn rows_to_clear(&self) -> usize {
        self.rows_above + self.open_tail as usize
    }

    /// Whether there is anything on screen to erase.
    pub const fn is_empty(&self) -> bool {
        self.rows_to_clear() == 0
    }
}

/// Count the visual lines `bytes` produce on a terminal `width` columns wide.
///
/// `None` (or zero) disables wrap accounting.
pub fn count_visual_lines(bytes: &[u8], width: Option<u16>) -> VisualLines {
    let mut counter = LineCounter::new(width.map_or(0, usize::from));
    counter.feed(bytes);
    counter.finish()
}

struct LineCounter {
    width: usize,
    col: usize,
    rows_above: usize,
    row_dirty: bool,
}

impl LineCounter {
    const fn new(width: usize) -> Self {
        Self {
            width,
            col: 0,
            rows_above: 0,
            row_dirty: false,
        }
    }

    fn feed(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    self.rows_above += 1;
                    self.col = 0;
                    self.row_dirty = false;
                    i += 1;
                }
                b'\r' => {
                    self.col = 0;
                    i += 1;
                }
                b'\t' => {
                    self.tab();
                    i += 1;
                }
                ESC => i = skip_escape(bytes, i),
                b if is_control(b) => i += 1,
                _ => {
                    let end = bytes[i..]
                        .iter()
                        .position(|&b| is_control(b))
                        .map_or(bytes.len(), |n| i + n);
                    self.text(&bytes[i..end]);
                    i = end;
                }
            }
        }
    }

    fn text(&mut self, run: &[u8]) {
        for chunk in run.utf8_chunks() {
            for grapheme in chunk.valid().graphemes(true) {
                self.advance(grapheme.width());
            }
            for _ in chunk.invalid() {
                self.advance(1);
            }
        }
    }

    /// Terminals stop a tab at the last column instead of wrapping.
    fn tab(&mut self) {
        let mut cols = TAB_STOP - self.col % TAB_STOP;
        if self.width > 0 {
            cols = cols.min(self.width.saturating_sub(self.col));
        }
        self.advance(cols);
    }

    fn advance(&mut self, cols: usize) {
        if cols == 0 {
            return;
        }
        self.row_dirty = true;
        if self.width == 0 {
            self.col += cols;
            return;
        }
        if self.col + cols > self.width {
            self.rows_above += 1;
            self.col = cols;
        } else {
            self.col += cols;
        }
    }

    const fn finish(&self) -> VisualLines {
        let open_tail = self.row_dirty;
        let tail = (self.width > 0 && open_tail) as usize;
        VisualLines {
            lines: self.rows_above + tail,
            rows_above: self.rows_above,
            open_tail,
        }
    }
}

const fn is_control(b: u8) -> bool {
    b < 0x20 || b == 0x7f
}

/// Return the index just past the escape sequence starting at `start`.
fn skip_escape(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    match bytes.get(i) {
        // CSI: parameters and intermediates up to a final byte.
        Some(b'[') => {
            i += 1;
            while i < bytes.len() {
                let b = bytes[i];
                i += 1;
                if (0x40..=0x7e).contains(&b) {
                    break;
                }
            }
            i
        }
        // OSC: terminated by BEL or ST (ESC \).
        Some(b']') => {
            i += 1;
            while i < bytes.len() {
                match bytes[i] {
                    0x07 => return i + 1,
                    ESC if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
                    _ => i += 1,
                }
            }
            i
        }
        Some(_) => i + 1,
        None => i,
    }
}
