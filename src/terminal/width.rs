//! Terminal width lookup used for soft-wrap accounting.

use super::Stream;
use crossterm::terminal;

/// Query the column count of the terminal behind `stream`.
///
/// Returns `None` when the stream is not attached to a terminal or the size
/// query fails; callers treat that as "wrap accounting unavailable".
pub fn detect_width(stream: Stream) -> Option<u16> {
    if !stream.is_terminal() {
        return None;
    }
    match terminal::size() {
        Ok((0, _)) => None,
        Ok((cols, _)) => Some(cols),
        Err(err) => {
            tracing::debug!(target: "live.width", %err, "terminal size query failed");
            None
        }
    }
}

/// Resolve the effective width from an override and an optional probe.
///
/// An override of zero means "unknown", same as a failed probe.
pub fn resolve_width(override_width: Option<u16>, detect: bool, stream: Stream) -> Option<u16> {
    match override_width {
        Some(0) => None,
        Some(width) => Some(width),
        None if detect => detect_width(stream),
        None => None,
    }
}
