//! Wall-clock abstraction.
//!
//! The announcer never reads the system clock directly — it asks an injected
//! [`Clock`], so tests can script exact times and the host decides which
//! timezone the announcements follow.

use chrono::{Local, Timelike};

/// A wall-clock instant at minute precision. Seconds are irrelevant to the
/// engine: announcements are keyed on (hour, minute) alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Hour in 24-hour form (0–23).
    pub hour: u8,
    /// Minute (0–59).
    pub minute: u8,
}

impl WallTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

/// Source of the current wall-clock time.
pub trait Clock: Send {
    fn now(&self) -> WallTime;
}

/// Reads the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> WallTime {
        let now = Local::now();
        WallTime {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }
}
