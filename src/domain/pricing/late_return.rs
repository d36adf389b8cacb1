//! Late-return fee

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::model::round_currency;

/// Fee charged per started hour past the grace period
pub const DEFAULT_LATE_FEE_PER_HOUR: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

pub const DEFAULT_LATE_RETURN_GRACE_MINUTES: i64 = 30;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// How a return after the end of the rental window is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateReturnPolicy {
    pub fee_per_hour: Decimal,
    /// Lateness tolerated without any charge
    pub grace: Duration,
}

impl Default for LateReturnPolicy {
    fn default() -> Self {
        Self {
            fee_per_hour: DEFAULT_LATE_FEE_PER_HOUR,
            grace: Duration::minutes(DEFAULT_LATE_RETURN_GRACE_MINUTES),
        }
    }
}

/// Charge for one late return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LateFee {
    /// Started hours past `due + grace`
    pub hours: i64,
    pub fee: Decimal,
}

impl LateFee {
    pub const NONE: LateFee = LateFee {
        hours: 0,
        fee: Decimal::ZERO,
    };
}

impl LateReturnPolicy {
    /// Fee for a bike due at `due` and handed back at `returned_at`.
    ///
    /// Every started hour after the grace period is billed, down to the
    /// millisecond. Returning on time or within the grace costs nothing.
    pub fn assess(&self, due: DateTime<Utc>, returned_at: DateTime<Utc>) -> LateFee {
        let overdue_ms = (returned_at - due)
            .checked_sub(&self.grace)
            .map_or(0, |d| d.num_milliseconds());
        if overdue_ms <= 0 {
            return LateFee::NONE;
        }

        let hours = overdue_ms / MILLIS_PER_HOUR + i64::from(overdue_ms % MILLIS_PER_HOUR != 0);
        LateFee {
            hours,
            fee: round_currency(self.fee_per_hour.saturating_mul(Decimal::from(hours))),
        }
    }
}
