//! # Flywheel Live
//!
//! A live-updating terminal writer: output is redrawn in place instead of
//! scrolling, for progress bars, download counters and other status text.
//!
//! ## Core Concepts
//!
//! - **Coalesced writes**: producers append to a pending buffer; any number
//!   of writes between two redraws become a single frame
//! - **Erase then repaint**: each flush erases exactly the rows the previous
//!   frame occupied (soft wrap included) and paints the new frame in one write
//! - **Refresh thread**: a background thread flushes on a fixed interval;
//!   `stop` paints whatever is left and joins it
//! - **Bypass**: permanent log lines printed above the live region
//!
//! ## Example
//!
//! ```rust,no_run
//! use flywheel_live::LiveWriter;
//! use std::io::Write;
//!
//! let writer = LiveWriter::stdout();
//! writer.start()?;
//! for i in 0..=100 {
//!     writeln!(&writer, "Downloading.. ({i}/100) GB")?;
//!     std::thread::sleep(std::time::Duration::from_millis(5));
//! }
//! writer.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod erase;
pub mod error;
pub mod terminal;
pub mod writer;

#[cfg(test)]
mod test_support;

// Re-exports for convenience
pub use config::{LiveConfig, DEFAULT_REFRESH_INTERVAL};
pub use erase::{AnsiEraser, EraseStrategy, Eraser};
pub use error::{LiveError, Result};
pub use terminal::Stream;
pub use writer::{Bypass, Line, LiveWriter, PaintStats, SchedulerState, VisualLines};
