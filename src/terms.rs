use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineLimits;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::PmiPolicy;

/// annual housing costs paid alongside the loan, charged monthly as annual / 12
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecurringCosts {
    pub annual_property_tax: Money,
    pub annual_insurance: Money,
    pub annual_other_fees: Money,
}

impl RecurringCosts {
    pub fn new(annual_property_tax: Money, annual_insurance: Money, annual_other_fees: Money) -> Self {
        Self {
            annual_property_tax,
            annual_insurance,
            annual_other_fees,
        }
    }

    pub fn monthly_property_tax(&self) -> Money {
        self.annual_property_tax / Decimal::from(12)
    }

    pub fn monthly_insurance(&self) -> Money {
        self.annual_insurance / Decimal::from(12)
    }

    pub fn monthly_other_fees(&self) -> Money {
        self.annual_other_fees / Decimal::from(12)
    }

    /// everything charged per period on top of principal, interest and pmi
    pub fn monthly_total(&self) -> Money {
        self.monthly_property_tax() + self.monthly_insurance() + self.monthly_other_fees()
    }
}

/// loan inputs for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// 4.5 means 4.5% a year
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    pub extra_payment_per_period: Money,
    /// yearly pmi premium as a percentage of the original principal
    pub pmi_annual_percent: Decimal,
    pub property_price: Option<Money>,
    pub pmi_policy: PmiPolicy,
    pub recurring_costs: RecurringCosts,
}

impl LoanTerms {
    /// plain amortizing loan with no pmi, extras or housing costs
    pub fn new(principal: Money, annual_rate_percent: Decimal, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
            extra_payment_per_period: Money::ZERO,
            pmi_annual_percent: Decimal::ZERO,
            property_price: None,
            pmi_policy: PmiPolicy::default(),
            recurring_costs: RecurringCosts::default(),
        }
    }

    pub fn with_extra_payment(mut self, extra: Money) -> Self {
        self.extra_payment_per_period = extra;
        self
    }

    pub fn with_pmi(mut self, pmi_annual_percent: Decimal, property_price: Money) -> Self {
        self.pmi_annual_percent = pmi_annual_percent;
        self.property_price = Some(property_price);
        self
    }

    pub fn with_pmi_policy(mut self, policy: PmiPolicy) -> Self {
        self.pmi_policy = policy;
        self
    }

    pub fn with_property_price(mut self, property_price: Money) -> Self {
        self.property_price = Some(property_price);
        self
    }

    pub fn with_recurring_costs(mut self, costs: RecurringCosts) -> Self {
        self.recurring_costs = costs;
        self
    }

    pub fn tracks_pmi(&self) -> bool {
        self.pmi_annual_percent > Decimal::ZERO
    }

    /// monthly pmi premium, zero when pmi is not tracked
    pub fn monthly_pmi(&self) -> Money {
        if !self.tracks_pmi() {
            return Money::ZERO;
        }
        self.principal * (self.pmi_annual_percent / Decimal::from(100)) / Decimal::from(12)
    }

    /// reject inputs before any schedule is generated
    pub fn validate(&self, limits: &EngineLimits) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(CalculatorError::invalid("principal", "must be greater than zero"));
        }

        if self.principal > limits.max_amount {
            return Err(CalculatorError::invalid(
                "principal",
                &format!("exceeds the maximum of {}", limits.max_amount),
            ));
        }

        if self.term_months == 0 {
            return Err(CalculatorError::invalid("term_months", "must be at least one month"));
        }

        if self.term_months > limits.max_term_months {
            return Err(CalculatorError::invalid(
                "term_months",
                &format!("{} exceeds the maximum of {}", self.term_months, limits.max_term_months),
            ));
        }

        for (field, percent) in [
            ("annual_rate_percent", self.annual_rate_percent),
            ("pmi_annual_percent", self.pmi_annual_percent),
        ] {
            if percent < Decimal::ZERO {
                return Err(CalculatorError::invalid(field, "must not be negative"));
            }
            if percent > limits.max_annual_rate_percent {
                return Err(CalculatorError::invalid(
                    field,
                    &format!("exceeds the maximum of {}%", limits.max_annual_rate_percent),
                ));
            }
        }

        let costs = &self.recurring_costs;
        for (field, amount) in [
            ("extra_payment_per_period", self.extra_payment_per_period),
            ("property_price", self.property_price.unwrap_or(Money::ZERO)),
            ("annual_property_tax", costs.annual_property_tax),
            ("annual_insurance", costs.annual_insurance),
            ("annual_other_fees", costs.annual_other_fees),
        ] {
            if amount.is_negative() {
                return Err(CalculatorError::invalid(field, "must not be negative"));
            }
            if amount > limits.max_amount {
                return Err(CalculatorError::invalid(
                    field,
                    &format!("exceeds the maximum of {}", limits.max_amount),
                ));
            }
        }

        match self.property_price {
            Some(price) if !price.is_positive() => {
                return Err(CalculatorError::invalid("property_price", "must be greater than zero"));
            }
            None if self.tracks_pmi() && self.pmi_policy == PmiPolicy::CancelAtThreshold => {
                return Err(CalculatorError::MissingPropertyPrice);
            }
            _ => {}
        }

        Ok(())
    }
}

/// loan inputs as typed into a form
///
/// Blank or malformed numbers read as zero and thousands separators are
/// ignored. The resulting terms still go through [`LoanTerms::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanTermsForm {
    pub loan_amount: String,
    pub interest_rate: String,
    pub term_years: String,
    pub term_months: String,
    pub extra_payment: String,
    pub pmi_percent: String,
    pub property_price: String,
    pub property_tax: String,
    pub insurance: String,
    pub other_fees: String,
    pub pmi_policy: PmiPolicy,
}

impl LoanTermsForm {
    pub fn to_terms(&self) -> LoanTerms {
        let years = lenient_decimal(&self.term_years);
        let months = lenient_decimal(&self.term_months);
        let term_months = years
            .checked_mul(Decimal::from(12))
            .and_then(|total| total.checked_add(months))
            .and_then(|total| total.round().to_u32())
            .unwrap_or(0);

        let mut terms = LoanTerms::new(
            Money::parse_lenient(&self.loan_amount),
            lenient_decimal(&self.interest_rate),
            term_months,
        )
        .with_extra_payment(Money::parse_lenient(&self.extra_payment))
        .with_pmi_policy(self.pmi_policy)
        .with_recurring_costs(RecurringCosts::new(
            Money::parse_lenient(&self.property_tax),
            Money::parse_lenient(&self.insurance),
            Money::parse_lenient(&self.other_fees),
        ));
        terms.pmi_annual_percent = lenient_decimal(&self.pmi_percent);

        let property_price = Money::parse_lenient(&self.property_price);
        if !property_price.is_zero() {
            terms = terms.with_property_price(property_price);
        }
        terms
    }

    /// parse and validate in one step
    pub fn parse(&self, limits: &EngineLimits) -> Result<LoanTerms> {
        let terms = self.to_terms();
        terms.validate(limits)?;
        Ok(terms)
    }
}

fn lenient_decimal(s: &str) -> Decimal {
    Money::parse_lenient(s).as_decimal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn limits() -> EngineLimits {
        EngineLimits::default()
    }

    #[test]
    fn test_valid_terms() {
        let terms = LoanTerms::new(Money::from_major(270_000), dec!(5), 360)
            .with_pmi(dec!(0.5), Money::from_major(300_000));
        assert!(terms.validate(&limits()).is_ok());
        assert_eq!(terms.monthly_pmi(), Money::from_major(112) + Money::from_str_exact("0.5").unwrap());
    }

    #[test]
    fn test_zero_principal_rejected() {
        let terms = LoanTerms::new(Money::ZERO, dec!(5), 360);
        match terms.validate(&limits()) {
            Err(CalculatorError::InvalidInput { field, .. }) => assert_eq!(field, "principal"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_boundary_violations() {
        let base = LoanTerms::new(Money::from_major(100_000), dec!(5), 360);

        let mut terms = base.clone();
        terms.term_months = 0;
        assert!(terms.validate(&limits()).is_err());

        let mut terms = base.clone();
        terms.term_months = 1201;
        assert!(matches!(terms.validate(&limits()), Err(CalculatorError::InvalidInput { .. })));

        let mut terms = base.clone();
        terms.term_months = 1200;
        assert!(terms.validate(&limits()).is_ok());

        let mut terms = base.clone();
        terms.annual_rate_percent = dec!(-0.1);
        assert!(terms.validate(&limits()).is_err());

        let terms = base.clone().with_extra_payment(Money::from_major(-1));
        assert!(terms.validate(&limits()).is_err());

        let terms = base.clone().with_recurring_costs(RecurringCosts::new(
            Money::ZERO,
            Money::from_major(-5),
            Money::ZERO,
        ));
        assert!(terms.validate(&limits()).is_err());
    }

    #[test]
    fn test_pmi_threshold_needs_property_price() {
        let mut terms = LoanTerms::new(Money::from_major(230_000), dec!(4.5), 360);
        terms.pmi_annual_percent = dec!(0.5);
        assert!(matches!(terms.validate(&limits()), Err(CalculatorError::MissingPropertyPrice)));

        let for_life = terms.clone().with_pmi_policy(PmiPolicy::ChargeForLife);
        assert!(for_life.validate(&limits()).is_ok());

        let no_pmi = LoanTerms::new(Money::from_major(230_000), dec!(4.5), 360);
        assert!(no_pmi.validate(&limits()).is_ok());
    }

    #[test]
    fn test_recurring_costs_monthly() {
        let costs = RecurringCosts::new(Money::from_major(3_600), Money::from_major(1_200), Money::from_major(600));
        assert_eq!(costs.monthly_total(), Money::from_major(450));
    }

    #[test]
    fn test_form_parsing() {
        let form = LoanTermsForm {
            loan_amount: "270,000".to_string(),
            interest_rate: "4.5".to_string(),
            term_years: "30".to_string(),
            term_months: "6".to_string(),
            extra_payment: "".to_string(),
            property_price: "300,000.00".to_string(),
            pmi_percent: "0.5".to_string(),
            property_tax: "n/a".to_string(),
            ..Default::default()
        };

        let terms = form.parse(&limits()).unwrap();
        assert_eq!(terms.principal, Money::from_major(270_000));
        assert_eq!(terms.annual_rate_percent, dec!(4.5));
        assert_eq!(terms.term_months, 366);
        assert_eq!(terms.extra_payment_per_period, Money::ZERO);
        assert_eq!(terms.property_price, Some(Money::from_major(300_000)));
        assert_eq!(terms.recurring_costs.annual_property_tax, Money::ZERO);
    }

    #[test]
    fn test_amounts_above_the_limit_rejected() {
        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        let terms = LoanTerms::new(huge, dec!(10), 360);
        match terms.validate(&limits()) {
            Err(CalculatorError::InvalidInput { field, .. }) => assert_eq!(field, "principal"),
            other => panic!("unexpected result: {:?}", other),
        }

        let ceiling = limits().max_amount;
        assert!(LoanTerms::new(ceiling, dec!(10), 360).validate(&limits()).is_ok());

        let terms = LoanTerms::new(Money::from_major(100_000), dec!(10), 360).with_property_price(huge);
        assert!(matches!(terms.validate(&limits()), Err(CalculatorError::InvalidInput { .. })));

        let terms = LoanTerms::new(Money::from_major(100_000), dec!(1000.01), 360);
        assert!(matches!(terms.validate(&limits()), Err(CalculatorError::InvalidInput { .. })));
    }

    #[test]
    fn test_oversized_form_values_fail_validation() {
        let form = LoanTermsForm {
            loan_amount: "50,000,000,000,000,000,000,000,000,000".to_string(),
            interest_rate: "10".to_string(),
            term_years: "30".to_string(),
            ..Default::default()
        };
        assert!(matches!(form.parse(&limits()), Err(CalculatorError::InvalidInput { .. })));

        let form = LoanTermsForm {
            loan_amount: "100000".to_string(),
            interest_rate: "10".to_string(),
            term_years: "7,000,000,000,000,000,000,000,000,000".to_string(),
            ..Default::default()
        };
        assert_eq!(form.to_terms().term_months, 0);
        assert!(form.parse(&limits()).is_err());
    }

    #[test]
    fn test_empty_form_fails_validation() {
        let form = LoanTermsForm::default();
        assert!(form.to_terms().principal.is_zero());
        assert!(form.parse(&limits()).is_err());
    }
}
