//! Half-open rental windows

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::RateUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("window end {end} must be after start {start}")]
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// A rental interval `[start, end)`. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct RentalWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for RentalWindow {
    type Error = WindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        RentalWindow::new(raw.start, raw.end)
    }
}

impl RentalWindow {
    /// Zero-length and inverted windows are rejected.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::EndNotAfterStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Two windows conflict iff `s1 < e2 && s2 < e1`.
    ///
    /// This one inequality covers a window starting inside, ending inside
    /// or enclosing the other. Windows that only share an endpoint do not
    /// conflict.
    pub fn overlaps(&self, other: &RentalWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of whole billing units needed to cover the window, rounded up.
    ///
    /// Any started part of a unit counts, down to the millisecond.
    pub fn billable_units(&self, unit: RateUnit) -> i64 {
        let millis = (self.end - self.start).num_milliseconds();
        let unit_millis = unit.seconds() * 1_000;
        // sub-millisecond windows still bill one unit
        ((millis + unit_millis - 1) / unit_millis).max(1)
    }
}

impl fmt::Display for RentalWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
