use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::terms::LoanTerms;

use super::schedule::Schedule;

/// totals comparing the baseline and accelerated schedules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_payment: Money,
    pub total_interest: Money,
    pub annual_payment: Money,
    /// annual payment as a percentage of principal
    pub mortgage_constant_percent: Decimal,
    pub interest_saved: Money,
    pub months_saved: u32,
}

pub fn summarize(baseline: &Schedule, accelerated: &Schedule, principal: Money, base_payment: Money) -> Result<Summary> {
    if !principal.is_positive() {
        return Err(CalculatorError::invalid("principal", "must be greater than zero"));
    }

    let total_interest = baseline.total_interest();
    let annual_payment = base_payment * Decimal::from(12);
    let mortgage_constant_percent = annual_payment.as_decimal() / principal.as_decimal() * Decimal::from(100);

    Ok(Summary {
        total_payment: principal + total_interest,
        total_interest,
        annual_payment,
        mortgage_constant_percent,
        interest_saved: total_interest - accelerated.total_interest(),
        months_saved: (baseline.len() as u32).saturating_sub(accelerated.len() as u32),
    })
}

/// what the borrower pays each month while pmi is running and after it stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_and_interest: Money,
    pub monthly_pmi: Money,
    pub monthly_property_tax: Money,
    pub monthly_insurance: Money,
    pub monthly_other_fees: Money,
    pub total_with_pmi: Money,
    pub total_without_pmi: Money,
    /// principal over property price, when the price is known
    pub loan_to_value: Option<Rate>,
    pub pmi_cancellation_period: Option<u32>,
}

impl PaymentBreakdown {
    pub fn from_schedule(terms: &LoanTerms, baseline: &Schedule) -> Self {
        let costs = &terms.recurring_costs;
        let monthly_pmi = terms.monthly_pmi();
        let total_without_pmi = baseline.base_payment + costs.monthly_total();

        let loan_to_value = terms
            .property_price
            .filter(|price| price.is_positive())
            .map(|price| Rate::from_decimal(terms.principal.as_decimal() / price.as_decimal()));

        Self {
            principal_and_interest: baseline.base_payment,
            monthly_pmi,
            monthly_property_tax: costs.monthly_property_tax(),
            monthly_insurance: costs.monthly_insurance(),
            monthly_other_fees: costs.monthly_other_fees(),
            total_with_pmi: total_without_pmi + monthly_pmi,
            total_without_pmi,
            loan_to_value,
            pmi_cancellation_period: baseline.pmi_cancellation_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    use crate::amortization::schedule::generate_schedule;
    use crate::config::EngineLimits;
    use crate::terms::RecurringCosts;

    #[test]
    fn test_summary_of_standard_mortgage() {
        let terms = LoanTerms::new(Money::from_major(270_000), dec!(4.5), 360);
        let baseline = generate_schedule(&terms, Money::ZERO, &EngineLimits::default()).unwrap();
        let summary = summarize(&baseline, &baseline, terms.principal, baseline.base_payment).unwrap();

        assert_eq!(summary.total_payment.round_dp(2), Money::from_str_exact("492498.12").unwrap());
        assert_eq!(summary.total_payment, terms.principal + summary.total_interest);
        assert_eq!(summary.annual_payment, baseline.base_payment * dec!(12));
        assert_eq!(summary.mortgage_constant_percent.round_dp(2), dec!(6.08));
        assert_eq!(summary.interest_saved, Money::ZERO);
        assert_eq!(summary.months_saved, 0);
    }

    #[test]
    fn test_summary_rejects_zero_principal() {
        let terms = LoanTerms::new(Money::from_major(1_000), dec!(4.5), 12);
        let baseline = generate_schedule(&terms, Money::ZERO, &EngineLimits::default()).unwrap();
        assert!(summarize(&baseline, &baseline, Money::ZERO, baseline.base_payment).is_err());
    }

    #[test]
    fn test_breakdown_with_and_without_pmi() {
        let terms = LoanTerms::new(Money::from_major(270_000), dec!(4.5), 360)
            .with_pmi(dec!(0.5), Money::from_major(300_000))
            .with_recurring_costs(RecurringCosts::new(
                Money::from_major(3_000),
                Money::from_major(1_500),
                Money::from_major(600),
            ));
        let baseline = generate_schedule(&terms, Money::ZERO, &EngineLimits::default()).unwrap();
        let breakdown = PaymentBreakdown::from_schedule(&terms, &baseline);

        assert_eq!(breakdown.monthly_pmi, Money::from_str_exact("112.5").unwrap());
        assert_eq!(breakdown.monthly_property_tax, Money::from_major(250));
        assert_eq!(breakdown.monthly_insurance, Money::from_major(125));
        assert_eq!(breakdown.monthly_other_fees, Money::from_major(50));
        assert_eq!(breakdown.total_without_pmi, baseline.base_payment + Money::from_major(425));
        assert_eq!(breakdown.total_with_pmi - breakdown.total_without_pmi, breakdown.monthly_pmi);
        assert_eq!(breakdown.loan_to_value, Some(Rate::from_decimal(dec!(0.9))));
        assert!(breakdown.pmi_cancellation_period.is_some());
    }
}
