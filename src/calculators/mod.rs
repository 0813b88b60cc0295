pub mod dsr;
pub mod legal_fee;
pub mod refinance;
pub mod rpgt;

pub use dsr::{DsrCalculator, DsrInput, DsrResult};
pub use legal_fee::{LegalFeeCalculator, LegalFeeInput, LegalFeeResult};
pub use refinance::{RefinanceCalculator, RefinanceInput, RefinanceResult};
pub use rpgt::{RpgtCalculator, RpgtInput, RpgtLiability, RpgtResult};

use crate::config::DEFAULT_MAX_AMOUNT;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};

/// reject negative or out-of-range amounts before a calculator runs
pub(crate) fn ensure_amounts(fields: &[(&str, Money)]) -> Result<()> {
    let ceiling = Money::from_major(DEFAULT_MAX_AMOUNT);
    for (field, amount) in fields {
        if amount.is_negative() {
            return Err(CalculatorError::invalid(field, "must not be negative"));
        }
        if *amount > ceiling {
            return Err(CalculatorError::invalid(field, &format!("exceeds the maximum of {}", ceiling)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_amount_bounds() {
        assert!(ensure_amounts(&[("price", Money::ZERO), ("loan", Money::from_major(DEFAULT_MAX_AMOUNT))]).is_ok());
        assert!(ensure_amounts(&[("price", Money::from_major(-1))]).is_err());

        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        match ensure_amounts(&[("price", Money::ZERO), ("loan", huge)]) {
            Err(CalculatorError::InvalidInput { field, .. }) => assert_eq!(field, "loan"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
