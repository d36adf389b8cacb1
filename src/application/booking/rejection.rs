//! Why a booking attempt stopped short of `Committed`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::pricing::PriceError;

/// States of one booking attempt, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStage {
    Draft,
    Validated,
    Checked,
    Priced,
    Committed,
}

impl BookingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Validated => "validated",
            Self::Checked => "checked",
            Self::Priced => "priced",
            Self::Committed => "committed",
        }
    }
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal rejection of a booking attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingRejection {
    #[error("Invalid window: end {end} must be after start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Window starts in the past: {start} is before {now}")]
    PastDate {
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("Unknown bike: {resource_id}")]
    UnknownResource { resource_id: String },

    #[error("Bike {resource_id} is already reserved: {}", conflicting_ids.join(", "))]
    SlotConflict {
        resource_id: String,
        conflicting_ids: Vec<String>,
    },

    #[error("Invalid rate for bike {resource_id}: {source}")]
    InvalidRate {
        resource_id: String,
        #[source]
        source: PriceError,
    },

    /// A collaborator read failed before anything was written
    #[error("Could not read {what}: {message}")]
    SourceFailure { what: &'static str, message: String },

    /// The commit failed; no reservation was stored
    #[error("Could not store reservation: {message}")]
    PersistenceFailure { message: String },
}

impl BookingRejection {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidWindow { .. } => "invalid_window",
            Self::PastDate { .. } => "past_date",
            Self::UnknownResource { .. } => "unknown_resource",
            Self::SlotConflict { .. } => "slot_conflict",
            Self::InvalidRate { .. } => "invalid_rate",
            Self::SourceFailure { .. } => "source_failure",
            Self::PersistenceFailure { .. } => "persistence_failure",
        }
    }

    /// The state the attempt was in when it was rejected.
    pub fn stage(&self) -> BookingStage {
        match self {
            Self::InvalidWindow { .. } | Self::PastDate { .. } | Self::UnknownResource { .. } => {
                BookingStage::Draft
            }
            Self::SourceFailure { what, .. } if *what == "catalog" => BookingStage::Draft,
            Self::SourceFailure { .. } | Self::SlotConflict { .. } => BookingStage::Validated,
            Self::InvalidRate { .. } => BookingStage::Checked,
            Self::PersistenceFailure { .. } => BookingStage::Priced,
        }
    }

    /// Collaborator failures may succeed on a fresh attempt; everything
    /// else needs a different request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SourceFailure { .. } | Self::PersistenceFailure { .. }
        )
    }

    pub fn conflicting_ids(&self) -> &[String] {
        match self {
            Self::SlotConflict {
                conflicting_ids, ..
            } => conflicting_ids,
            _ => &[],
        }
    }
}
