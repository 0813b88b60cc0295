use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::generate_schedule;
use crate::config::EngineLimits;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::terms::LoanTerms;
use crate::types::RefinanceBasis;

/// an existing loan partway through its term and the offer replacing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub loan_amount: Money,
    pub old_rate_percent: Decimal,
    pub old_term_months: u32,
    pub payments_made: u32,
    pub new_rate_percent: Decimal,
    pub new_term_months: u32,
    #[serde(default)]
    pub basis: RefinanceBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceResult {
    pub old_monthly_payment: Money,
    pub new_monthly_payment: Money,
    /// negative when the new payment is higher
    pub monthly_savings: Money,
    pub outstanding_balance: Money,
    pub new_loan_amount: Money,
    /// interest still due on the old loan after the payments made
    pub old_remaining_interest: Money,
    pub new_total_interest: Money,
    /// negative when refinancing costs more interest
    pub interest_saved: Money,
}

/// compares keeping a loan against refinancing it
pub struct RefinanceCalculator {
    limits: EngineLimits,
}

impl RefinanceCalculator {
    pub fn new(limits: EngineLimits) -> Self {
        Self { limits }
    }

    pub fn calculate(&self, input: &RefinanceInput) -> Result<RefinanceResult> {
        if input.payments_made > input.old_term_months {
            return Err(CalculatorError::invalid("payments_made", "exceeds the term of the existing loan"));
        }

        let old_terms = LoanTerms::new(input.loan_amount, input.old_rate_percent, input.old_term_months);
        let old_schedule = generate_schedule(&old_terms, Money::ZERO, &self.limits)?;
        let outstanding_balance = old_schedule.balance_after(input.payments_made);
        let old_remaining_interest = old_schedule.interest_after(input.payments_made);

        let new_loan_amount = match input.basis {
            RefinanceBasis::OriginalAmount => input.loan_amount,
            RefinanceBasis::OutstandingBalance => outstanding_balance,
        };

        if !new_loan_amount.is_positive() {
            return Err(CalculatorError::invalid("payments_made", "existing loan is already repaid"));
        }

        let new_terms = LoanTerms::new(new_loan_amount, input.new_rate_percent, input.new_term_months);
        let new_schedule = generate_schedule(&new_terms, Money::ZERO, &self.limits)?;
        let new_total_interest = new_schedule.total_interest();

        debug!(
            "refinance after {} payments: balance {} new loan {} interest saved {}",
            input.payments_made,
            outstanding_balance,
            new_loan_amount,
            old_remaining_interest - new_total_interest
        );

        Ok(RefinanceResult {
            old_monthly_payment: old_schedule.base_payment,
            new_monthly_payment: new_schedule.base_payment,
            monthly_savings: old_schedule.base_payment - new_schedule.base_payment,
            outstanding_balance,
            new_loan_amount,
            old_remaining_interest,
            new_total_interest,
            interest_saved: old_remaining_interest - new_total_interest,
        })
    }
}
