//! Background actor that drives the redraw loop.
//!
//! ```text
//! ┌──────────────┐   write()   ┌──────────────┐
//! │  Producers   │ ──────────▶ │ WriteBuffer  │
//! └──────────────┘             └──────┬───────┘
//!                                     │ take() every interval
//! ┌──────────────┐    tick     ┌──────▼───────┐
//! │Refresh Thread│ ──────────▶ │   Painter    │ ──▶ sink
//! └──────────────┘             └──────────────┘
//! ```

mod refresh;

pub use refresh::{RefreshActor, Tick};
