//! Rental price calculation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GST applied to every rental
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Security deposit as a fraction of the per-unit rate
pub const DEFAULT_DEPOSIT_FRACTION: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

pub const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("rate must be positive, got {0}")]
    NonPositiveRate(Decimal),

    #[error("units must be positive, got {0}")]
    NonPositiveUnits(i64),

    #[error("tax rate must not be negative, got {0}")]
    NegativeTaxRate(Decimal),

    #[error("deposit fraction must not be negative, got {0}")]
    NegativeDepositFraction(Decimal),

    #[error("price overflow")]
    Overflow,
}

/// Pricing knobs that are constant across one storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOptions {
    pub tax_rate: Decimal,
    /// `None` disables the deposit
    pub deposit_fraction: Option<Decimal>,
    pub currency: String,
}

impl Default for PriceOptions {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            deposit_fraction: Some(DEFAULT_DEPOSIT_FRACTION),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl PriceOptions {
    pub fn without_deposit(mut self) -> Self {
        self.deposit_fraction = None;
        self
    }
}

/// Price of one rental, in whole currency units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub rate: Decimal,
    pub units: i64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub deposit: Decimal,
    pub total: Decimal,
    pub currency: String,
}

impl PriceBreakdown {
    /// Amount without the refundable deposit
    pub fn charges(&self) -> Decimal {
        self.subtotal + self.tax
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        format!("{} {}", amount.normalize(), self.currency)
    }

    pub fn format_total(&self) -> String {
        self.format_amount(self.total)
    }
}

/// Round half away from zero to a whole currency unit.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute subtotal, tax, deposit and total for `units` of `rate`.
///
/// `tax` and `deposit` are rounded independently before being added to
/// the subtotal; the total is never rounded as a whole.
pub fn compute_price(
    rate: Decimal,
    units: i64,
    options: &PriceOptions,
) -> Result<PriceBreakdown, PriceError> {
    if rate <= Decimal::ZERO {
        return Err(PriceError::NonPositiveRate(rate));
    }
    if units <= 0 {
        return Err(PriceError::NonPositiveUnits(units));
    }
    if options.tax_rate < Decimal::ZERO {
        return Err(PriceError::NegativeTaxRate(options.tax_rate));
    }

    let subtotal = rate
        .checked_mul(Decimal::from(units))
        .ok_or(PriceError::Overflow)?;
    let tax = round_currency(
        subtotal
            .checked_mul(options.tax_rate)
            .ok_or(PriceError::Overflow)?,
    );
    let deposit = match options.deposit_fraction {
        Some(fraction) if fraction < Decimal::ZERO => {
            return Err(PriceError::NegativeDepositFraction(fraction));
        }
        Some(fraction) => round_currency(rate.checked_mul(fraction).ok_or(PriceError::Overflow)?),
        None => Decimal::ZERO,
    };
    let total = subtotal
        .checked_add(tax)
        .and_then(|t| t.checked_add(deposit))
        .ok_or(PriceError::Overflow)?;

    Ok(PriceBreakdown {
        rate,
        units,
        subtotal,
        tax,
        deposit,
        total,
        currency: options.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn three_days_without_deposit() {
        let options = PriceOptions::default().without_deposit();
        let p = compute_price(d(500), 3, &options).unwrap();
        assert_eq!(p.subtotal, d(1500));
        assert_eq!(p.tax, d(270));
        assert_eq!(p.deposit, d(0));
        assert_eq!(p.total, d(1770));
    }

    #[test]
    fn three_days_with_half_rate_deposit() {
        let p = compute_price(d(500), 3, &PriceOptions::default()).unwrap();
        assert_eq!(p.deposit, d(250));
        assert_eq!(p.total, d(2020));
        assert_eq!(p.charges(), d(1770));
        assert_eq!(p.format_total(), "2020 INR");
    }

    #[test]
    fn tax_rounds_half_away_from_zero() {
        // 25 * 0.18 = 4.5 -> 5
        let p = compute_price(d(25), 1, &PriceOptions::default().without_deposit()).unwrap();
        assert_eq!(p.tax, d(5));
        // 24 * 0.18 = 4.32 -> 4
        let p = compute_price(d(24), 1, &PriceOptions::default().without_deposit()).unwrap();
        assert_eq!(p.tax, d(4));
    }

    #[test]
    fn tax_and_deposit_are_rounded_before_summing() {
        // subtotal 25, tax 4.5 -> 5, deposit 12.5 -> 13; total 43
        // rounding the unrounded sum (42.0) would give 42
        let p = compute_price(d(25), 1, &PriceOptions::default()).unwrap();
        assert_eq!(p.tax, d(5));
        assert_eq!(p.deposit, d(13));
        assert_eq!(p.total, d(43));
    }

    #[test]
    fn fractional_rates_keep_exact_subtotal() {
        let rate = Decimal::new(4999, 1); // 499.9
        let p = compute_price(rate, 2, &PriceOptions::default().without_deposit()).unwrap();
        assert_eq!(p.subtotal, Decimal::new(9998, 1));
        // 999.8 * 0.18 = 179.964 -> 180
        assert_eq!(p.tax, d(180));
        assert_eq!(p.total, Decimal::new(11798, 1));
    }

    #[test]
    fn non_positive_inputs_are_errors() {
        let options = PriceOptions::default();
        assert_eq!(
            compute_price(d(0), 3, &options),
            Err(PriceError::NonPositiveRate(d(0)))
        );
        assert_eq!(
            compute_price(d(-10), 3, &options),
            Err(PriceError::NonPositiveRate(d(-10)))
        );
        assert_eq!(
            compute_price(d(500), 0, &options),
            Err(PriceError::NonPositiveUnits(0))
        );
        assert_eq!(
            compute_price(d(500), -2, &options),
            Err(PriceError::NonPositiveUnits(-2))
        );
    }

    #[test]
    fn negative_tax_rate_is_rejected() {
        let options = PriceOptions {
            tax_rate: d(-1),
            ..PriceOptions::default()
        };
        assert!(matches!(
            compute_price(d(500), 1, &options),
            Err(PriceError::NegativeTaxRate(_))
        ));
    }

    #[test]
    fn default_constants() {
        assert_eq!(DEFAULT_TAX_RATE, Decimal::new(18, 2));
        assert_eq!(DEFAULT_DEPOSIT_FRACTION, Decimal::new(5, 1));
    }

    #[test]
    fn identical_inputs_give_identical_breakdowns() {
        let a = compute_price(d(650), 4, &PriceOptions::default()).unwrap();
        let b = compute_price(d(650), 4, &PriceOptions::default()).unwrap();
        assert_eq!(a, b);
    }
}
