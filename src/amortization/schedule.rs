use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::terms::LoanTerms;

use super::payment::{level_payment, periodic_rate};
use super::pmi::{cancellation_threshold, PmiTracker};

/// one period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period_index: u32,
    /// base payment plus active pmi plus monthly housing costs
    pub scheduled_payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    /// extra payment actually applied this period
    pub extra_principal: Money,
    pub remaining_balance: Money,
    pub pmi_active: bool,
}

impl ScheduleEntry {
    /// everything paid this period
    pub fn total_outlay(&self) -> Money {
        self.scheduled_payment + self.extra_principal
    }
}

/// amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub base_payment: Money,
    pub entries: Vec<ScheduleEntry>,
    /// period pmi stopped under threshold cancellation
    pub pmi_cancellation_period: Option<u32>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// number of periods as a period count
    pub fn periods(&self) -> u32 {
        self.entries.last().map_or(0, |e| e.period_index)
    }

    pub fn entry(&self, period_index: u32) -> Option<&ScheduleEntry> {
        if period_index == 0 {
            return None;
        }
        self.entries.get((period_index - 1) as usize)
    }

    /// balance once `period_index` periods have been paid
    pub fn balance_after(&self, period_index: u32) -> Money {
        if period_index == 0 {
            return self.principal;
        }
        self.entry(period_index)
            .or_else(|| self.entries.last())
            .map_or(self.principal, |e| e.remaining_balance)
    }

    pub fn total_interest(&self) -> Money {
        self.entries.iter().map(|e| e.interest_portion).sum()
    }

    /// interest charged in the periods after `period_index`
    pub fn interest_after(&self, period_index: u32) -> Money {
        self.entries
            .iter()
            .skip(period_index as usize)
            .map(|e| e.interest_portion)
            .sum()
    }

    pub fn total_principal(&self) -> Money {
        self.entries
            .iter()
            .map(|e| e.principal_portion + e.extra_principal)
            .sum()
    }

    pub fn total_extra(&self) -> Money {
        self.entries.iter().map(|e| e.extra_principal).sum()
    }

    pub fn total_outlay(&self) -> Money {
        self.entries.iter().map(|e| e.total_outlay()).sum()
    }

    pub fn pmi_periods(&self) -> usize {
        self.entries.iter().filter(|e| e.pmi_active).count()
    }

    pub fn final_balance(&self) -> Money {
        self.entries.last().map_or(self.principal, |e| e.remaining_balance)
    }
}

/// generate the schedule for `terms`, paying `extra_payment` on top of every period
///
/// The running balance is carried unrounded; entries hold it rounded to
/// `Money` precision, with each principal portion taken as the drop in the
/// rounded balance so the portions always add up to the principal. A
/// residue no larger than `payoff_epsilon` of the principal counts as paid,
/// and whatever remains at `term_months` is swept into the last period.
pub fn generate_schedule(terms: &LoanTerms, extra_payment: Money, limits: &EngineLimits) -> Result<Schedule> {
    terms.validate(limits)?;

    if extra_payment.is_negative() {
        return Err(CalculatorError::invalid("extra_payment", "must not be negative"));
    }

    if extra_payment > limits.max_amount {
        return Err(CalculatorError::invalid("extra_payment", "exceeds the maximum amount"));
    }

    let rate = periodic_rate(terms.annual_rate_percent);
    let r = rate.as_decimal();
    let payment = level_payment(terms.principal, rate, terms.term_months)?;
    let base = Money::from_decimal(payment);
    let extra_payment = extra_payment.as_decimal();
    let housing = terms.recurring_costs.monthly_total();
    let monthly_pmi = terms.monthly_pmi();
    let epsilon = terms.principal.as_decimal() * limits.payoff_epsilon;

    let threshold = terms
        .property_price
        .map(|price| cancellation_threshold(price, limits.pmi_cancellation_ltv));
    let mut pmi = PmiTracker::new(terms.pmi_policy, monthly_pmi, threshold);

    debug!(
        "generating schedule: principal {} rate {} term {} base payment {} extra {}",
        terms.principal, rate, terms.term_months, base, extra_payment
    );

    let mut entries = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal.as_decimal();
    let mut reported = terms.principal;

    for period in 1..=terms.term_months {
        let opening = balance;
        let interest = opening * r;
        let principal = (payment - interest).min(opening).max(Decimal::ZERO);
        let pmi_active = pmi.observe(period, reported);

        let after_principal = opening - principal;
        let extra = extra_payment.min(after_principal);
        balance = after_principal - extra;

        if balance <= epsilon || period == terms.term_months {
            balance = Decimal::ZERO;
        }

        let remaining_balance = Money::from_decimal(balance);
        let extra_principal = Money::from_decimal(extra);
        let principal_portion = reported - remaining_balance - extra_principal;
        reported = remaining_balance;

        let pmi_charge = if pmi_active { monthly_pmi } else { Money::ZERO };
        let scheduled_payment = base + pmi_charge + housing;

        trace!(
            "period {}: interest {} principal {} extra {} balance {} pmi {}",
            period, interest, principal_portion, extra_principal, balance, pmi_active
        );

        entries.push(ScheduleEntry {
            period_index: period,
            scheduled_payment,
            interest_portion: Money::from_decimal(interest),
            principal_portion,
            extra_principal,
            remaining_balance,
            pmi_active,
        });

        if balance.is_zero() {
            break;
        }
    }

    debug!(
        "schedule complete: {} periods, final balance {}",
        entries.len(),
        reported
    );

    Ok(Schedule {
        principal: terms.principal,
        base_payment: base,
        entries,
        pmi_cancellation_period: pmi.cancellation_period(),
    })
}
