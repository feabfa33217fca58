//! Quiet-period debouncing
//!
//! Once a command has been launched, every event that arrives before the
//! quiet interval has elapsed is dropped. Editors that save through a
//! temp file and a rename produce several notifications for one logical
//! change; only the first one gets through.

use std::time::{Duration, Instant};

/// Time of the last launch plus the configured quiet interval
#[derive(Debug, Clone)]
pub struct QuietPeriod {
    interval: Duration,
    /// `None` until the first launch
    last_trigger: Option<Instant>,
}

impl QuietPeriod {
    /// Create a debouncer that has never triggered
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_trigger: None,
        }
    }

    /// True if an event at `now` falls inside the quiet window
    pub fn should_suppress(&self, now: Instant) -> bool {
        match self.last_trigger {
            Some(last) => now.saturating_duration_since(last) < self.interval,
            None => false,
        }
    }

    /// Start a new quiet window at `now`
    ///
    /// Never moves the window backwards.
    pub fn record_trigger(&mut self, now: Instant) {
        self.last_trigger = Some(match self.last_trigger {
            Some(last) if last > now => last,
            _ => now,
        });
    }

    /// Time of the last launch
    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    /// Configured quiet interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
