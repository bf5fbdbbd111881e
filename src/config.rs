//! Configuration for a [`LiveWriter`](crate::LiveWriter).

use crate::error::{LiveError, Result};
use std::time::Duration;

/// Default time between two redraws.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for a live writer.
///
/// Every field can also be changed later on the writer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveConfig {
    /// Time between two redraws driven by the refresh thread.
    pub refresh_interval: Duration,
    /// Terminal width override in columns. Takes precedence over detection.
    pub width: Option<u16>,
    /// Whether to query the terminal width at construction when no
    /// override is given.
    pub detect_width: bool,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            width: None,
            detect_width: true,
        }
    }
}

impl LiveConfig {
    /// Set the refresh interval.
    #[must_use]
    pub const fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Force a terminal width instead of detecting it.
    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Enable or disable width detection.
    #[must_use]
    pub const fn with_detect_width(mut self, detect: bool) -> Self {
        self.detect_width = detect;
        self
    }

    /// Check the configuration for values the writer cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval.is_zero() {
            return Err(LiveError::InvalidInterval);
        }
        Ok(())
    }
}
