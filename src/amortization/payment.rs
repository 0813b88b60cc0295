use log::warn;
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};

/// monthly rate from an annual percentage (4.5 -> 0.00375)
pub fn periodic_rate(annual_rate_percent: Decimal) -> Rate {
    Rate::from_percent(annual_rate_percent).monthly_rate()
}

/// level payment that retires `principal` over `term_months` periods
///
/// A zero rate is a straight division of the principal. Otherwise the
/// annuity formula `P * r * (1 + r)^n / ((1 + r)^n - 1)` is used, with the
/// compound factor built by repeated multiplication so no float step is
/// involved. When the factor outgrows `Decimal` the payment is
/// indistinguishable from interest only and `P * r` is returned.
pub fn base_payment(principal: Money, periodic_rate: Rate, term_months: u32) -> Result<Money> {
    level_payment(principal, periodic_rate, term_months).map(Money::from_decimal)
}

/// unrounded level payment, what the schedule amortizes with
pub(crate) fn level_payment(principal: Money, periodic_rate: Rate, term_months: u32) -> Result<Decimal> {
    if !principal.is_positive() {
        return Err(CalculatorError::invalid("principal", "must be greater than zero"));
    }

    if term_months == 0 {
        return Err(CalculatorError::invalid("term_months", "must be at least one month"));
    }

    let p = principal.as_decimal();
    let r = periodic_rate.as_decimal();
    if r < Decimal::ZERO {
        return Err(CalculatorError::invalid("annual_rate_percent", "must not be negative"));
    }

    if r.is_zero() {
        return Ok(p / Decimal::from(term_months));
    }

    let overflow = || CalculatorError::CalculationError {
        message: format!("payment out of range for rate {} over {} periods", periodic_rate, term_months),
    };

    let Some(compound) = compound_factor(r, term_months) else {
        warn!("compound factor overflow at rate {} over {} periods, using interest-only payment", periodic_rate, term_months);
        return p.checked_mul(r).ok_or_else(overflow);
    };

    // c / (c - 1) keeps the intermediate small for long terms
    compound
        .checked_div(compound - Decimal::ONE)
        .and_then(|ratio| ratio.checked_mul(r))
        .and_then(|annuity| p.checked_mul(annuity))
        .ok_or_else(overflow)
}

/// (1 + r)^n, None on overflow
fn compound_factor(r: Decimal, n: u32) -> Option<Decimal> {
    let base = Decimal::ONE + r;
    let mut compound = Decimal::ONE;
    for _ in 0..n {
        compound = compound.checked_mul(base)?;
    }
    Some(compound)
}
