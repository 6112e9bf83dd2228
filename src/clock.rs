//! Wall-clock abstraction and the date/time renderings used by templates.
//!
//! The renderer and the session timer read the time through [`Clock`] so
//! tests can pin it with a [`ManualClock`].

use std::sync::{Mutex, PoisonError};

use jiff::{SignedDuration, Zoned};

/// `%date%` rendering.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `%time%` rendering.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Absolute timestamp rendering used for the first session entry.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Zoned;
}

/// The system clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Zoned>,
}

impl ManualClock {
    pub fn new(start: Zoned) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward (or back, for a negative duration). An
    /// out-of-range result leaves the clock where it was.
    pub fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(next) = now.checked_add(by) {
            *now = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Zoned {
        self.now
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub fn format_date(at: &Zoned) -> String {
    at.strftime(DATE_FORMAT).to_string()
}

pub fn format_time(at: &Zoned) -> String {
    at.strftime(TIME_FORMAT).to_string()
}

pub fn format_stamp(at: &Zoned) -> String {
    at.strftime(STAMP_FORMAT).to_string()
}
