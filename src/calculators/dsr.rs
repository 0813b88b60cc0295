use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::DsrConfig;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};
use crate::types::DsrStatus;

use super::ensure_amounts;

/// monthly income and existing commitments of a borrower
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DsrInput {
    pub basic_salary: Money,
    pub fixed_allowance: Money,
    pub variable_income: Money,
    pub other_income: Money,
    pub car_loan: Money,
    pub personal_loan: Money,
    pub credit_card: Money,
    pub other_loans: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsrResult {
    /// income after applying recognition rates
    pub recognised_income: Money,
    pub total_commitments: Money,
    pub dsr_percent: Decimal,
    pub status: DsrStatus,
    /// further monthly commitments that keep the ratio healthy
    pub headroom: Money,
}

/// debt service ratio calculator
pub struct DsrCalculator {
    config: DsrConfig,
}

impl DsrCalculator {
    pub fn new(config: DsrConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, input: &DsrInput) -> Result<DsrResult> {
        ensure_amounts(&[
            ("basic_salary", input.basic_salary),
            ("fixed_allowance", input.fixed_allowance),
            ("variable_income", input.variable_income),
            ("other_income", input.other_income),
            ("car_loan", input.car_loan),
            ("personal_loan", input.personal_loan),
            ("credit_card", input.credit_card),
            ("other_loans", input.other_loans),
        ])?;

        let recognised_income = input.basic_salary
            + input.fixed_allowance
            + input.variable_income.apply(self.config.variable_income_recognition)
            + input.other_income.apply(self.config.other_income_recognition);

        if !recognised_income.is_positive() {
            return Err(CalculatorError::invalid("income", "recognised income must be greater than zero"));
        }

        let total_commitments = input.car_loan + input.personal_loan + input.credit_card + input.other_loans;

        let dsr_percent = total_commitments.as_decimal() / recognised_income.as_decimal() * Decimal::from(100);
        let threshold = self.config.healthy_threshold_percent;
        let status = if dsr_percent <= threshold {
            DsrStatus::Healthy
        } else {
            DsrStatus::HighRisk
        };

        let ceiling = recognised_income * (threshold / Decimal::from(100));
        let headroom = (ceiling - total_commitments).max(Money::ZERO);

        debug!(
            "dsr: income {} commitments {} ratio {}% ({:?})",
            recognised_income, total_commitments, dsr_percent.round_dp(2), status
        );

        Ok(DsrResult {
            recognised_income,
            total_commitments,
            dsr_percent,
            status,
            headroom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn calculator() -> DsrCalculator {
        DsrCalculator::new(DsrConfig::default())
    }

    #[test]
    fn test_variable_income_partially_recognised() {
        let input = DsrInput {
            basic_salary: Money::from_major(5_000),
            fixed_allowance: Money::from_major(500),
            variable_income: Money::from_major(1_000),
            other_income: Money::from_major(500),
            car_loan: Money::from_major(800),
            personal_loan: Money::from_major(400),
            credit_card: Money::from_major(300),
            other_loans: Money::ZERO,
        };

        let result = calculator().calculate(&input).unwrap();
        assert_eq!(result.recognised_income, Money::from_major(6_700));
        assert_eq!(result.total_commitments, Money::from_major(1_500));
        assert_eq!(result.dsr_percent.round_dp(2), dec!(22.39));
        assert_eq!(result.status, DsrStatus::Healthy);
        assert_eq!(result.headroom, Money::from_major(3_190));
    }

    #[test]
    fn test_high_risk_above_threshold() {
        let input = DsrInput {
            basic_salary: Money::from_major(3_000),
            car_loan: Money::from_major(1_200),
            personal_loan: Money::from_major(1_000),
            ..Default::default()
        };

        let result = calculator().calculate(&input).unwrap();
        assert_eq!(result.status, DsrStatus::HighRisk);
        assert_eq!(result.headroom, Money::ZERO);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let input = DsrInput {
            basic_salary: Money::from_major(1_000),
            other_loans: Money::from_major(700),
            ..Default::default()
        };
        assert_eq!(calculator().calculate(&input).unwrap().status, DsrStatus::Healthy);
    }

    #[test]
    fn test_zero_income_rejected() {
        let input = DsrInput {
            car_loan: Money::from_major(500),
            ..Default::default()
        };
        assert!(matches!(
            calculator().calculate(&input),
            Err(CalculatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = DsrInput {
            basic_salary: Money::from_major(4_000),
            credit_card: Money::from_major(-1),
            ..Default::default()
        };
        assert!(calculator().calculate(&input).is_err());
    }
}
