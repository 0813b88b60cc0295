use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::decimal::Money;
use crate::errors::Result;
use crate::terms::LoanTerms;

use super::schedule::{generate_schedule, Schedule};

/// outcome of paying the extra amount every period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceleratedPayoff {
    pub schedule: Schedule,
    /// number of periods until the balance reaches zero
    pub payoff_period: u32,
    pub interest_paid: Money,
}

/// re-run the schedule with `extra_payment_per_period` applied each period
pub fn simulate_accelerated_payoff(terms: &LoanTerms, limits: &EngineLimits) -> Result<AcceleratedPayoff> {
    let schedule = generate_schedule(terms, terms.extra_payment_per_period, limits)?;
    let payoff_period = schedule.periods();
    let interest_paid = schedule.total_interest();

    debug!(
        "accelerated payoff with extra {}: {} of {} periods, interest {}",
        terms.extra_payment_per_period, payoff_period, terms.term_months, interest_paid
    );

    Ok(AcceleratedPayoff {
        schedule,
        payoff_period,
        interest_paid,
    })
}
