//! Pricing
//!
//! Deterministic price breakdown (subtotal, tax, deposit, total) for a
//! rental of a given number of units, plus the fee for returning late.

pub mod late_return;
pub mod model;

pub use late_return::{
    LateFee, LateReturnPolicy, DEFAULT_LATE_FEE_PER_HOUR, DEFAULT_LATE_RETURN_GRACE_MINUTES,
};
pub use model::{
    compute_price, round_currency, PriceBreakdown, PriceError, PriceOptions, DEFAULT_CURRENCY,
    DEFAULT_DEPOSIT_FRACTION, DEFAULT_TAX_RATE,
};
