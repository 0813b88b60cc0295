pub mod accelerated;
pub mod payment;
pub mod pmi;
pub mod schedule;
pub mod summary;

use chrono::{Months, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::decimal::Money;
use crate::errors::Result;
use crate::terms::LoanTerms;
use crate::types::{CalculationWarning, PmiPolicy};

pub use accelerated::{simulate_accelerated_payoff, AcceleratedPayoff};
pub use payment::{base_payment, periodic_rate};
pub use pmi::{cancellation_threshold, first_cancellation_period, is_pmi_active, PmiTracker};
pub use schedule::{generate_schedule, Schedule, ScheduleEntry};
pub use summary::{summarize, PaymentBreakdown, Summary};

/// everything computed for one set of loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCalculation {
    pub terms: LoanTerms,
    pub baseline: Schedule,
    pub accelerated: AcceleratedPayoff,
    pub summary: Summary,
    pub breakdown: PaymentBreakdown,
    pub warnings: Vec<CalculationWarning>,
}

impl LoanCalculation {
    pub fn base_payment(&self) -> Money {
        self.baseline.base_payment
    }

    pub fn has_warning(&self, warning: CalculationWarning) -> bool {
        self.warnings.contains(&warning)
    }

    /// date of the last baseline payment when the first falls on `first_payment`
    pub fn payoff_date(&self, first_payment: NaiveDate) -> Option<NaiveDate> {
        last_payment_date(first_payment, self.baseline.periods())
    }

    /// date of the last payment with the extra amount applied
    pub fn accelerated_payoff_date(&self, first_payment: NaiveDate) -> Option<NaiveDate> {
        last_payment_date(first_payment, self.accelerated.payoff_period)
    }
}

fn last_payment_date(first_payment: NaiveDate, periods: u32) -> Option<NaiveDate> {
    first_payment.checked_add_months(Months::new(periods.saturating_sub(1)))
}

/// amortization engine
///
/// Holds only its limits, so a single engine can be shared freely between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    limits: EngineLimits,
}

impl AmortizationEngine {
    pub fn new(limits: EngineLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &EngineLimits {
        &self.limits
    }

    /// baseline schedule, accelerated payoff and summary for `terms`
    pub fn compute_loan_summary(&self, terms: &LoanTerms) -> Result<LoanCalculation> {
        terms.validate(&self.limits)?;

        let baseline = generate_schedule(terms, Money::ZERO, &self.limits)?;
        let accelerated = simulate_accelerated_payoff(terms, &self.limits)?;
        let summary = summarize(&baseline, &accelerated.schedule, terms.principal, baseline.base_payment)?;
        let breakdown = PaymentBreakdown::from_schedule(terms, &baseline);
        let warnings = collect_warnings(terms, &baseline, &summary);

        debug!(
            "loan summary: payment {} total interest {} interest saved {} months saved {}",
            baseline.base_payment, summary.total_interest, summary.interest_saved, summary.months_saved
        );

        Ok(LoanCalculation {
            terms: terms.clone(),
            baseline,
            accelerated,
            summary,
            breakdown,
            warnings,
        })
    }
}

/// compute with the default limits
pub fn compute_loan_summary(terms: &LoanTerms) -> Result<LoanCalculation> {
    AmortizationEngine::default().compute_loan_summary(terms)
}

fn collect_warnings(terms: &LoanTerms, baseline: &Schedule, summary: &Summary) -> Vec<CalculationWarning> {
    let mut warnings = Vec::new();

    if terms.annual_rate_percent.is_zero() {
        warn!("zero interest rate, payment is principal divided by {} periods", terms.term_months);
        warnings.push(CalculationWarning::DegenerateRate);
    }

    if terms.tracks_pmi()
        && terms.pmi_policy == PmiPolicy::CancelAtThreshold
        && baseline.pmi_cancellation_period.is_none()
    {
        warn!("pmi threshold never reached within {} periods", terms.term_months);
        warnings.push(CalculationWarning::PmiNeverCancelled);
    }

    if terms.extra_payment_per_period.is_positive() && summary.months_saved == 0 {
        warn!("extra payment of {} does not shorten the loan", terms.extra_payment_per_period);
        warnings.push(CalculationWarning::ExtraPaymentHasNoEffect);
    }

    warnings
}
