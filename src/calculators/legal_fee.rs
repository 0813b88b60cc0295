use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LegalFeeConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};

use super::ensure_amounts;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalFeeInput {
    pub purchase_price: Money,
    pub loan_amount: Money,
    /// 10 means 10% of the purchase price
    pub down_payment_percent: Decimal,
}

/// charges for a property purchase financed with a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalFeeResult {
    pub down_payment: Money,
    pub sale_purchase_legal_fee: Money,
    pub sale_purchase_stamp_duty: Money,
    pub loan_legal_fee: Money,
    pub loan_stamp_duty: Money,
    /// the four charges, excluding the down payment
    pub total_fees: Money,
}

/// legal fee and stamp duty calculator
pub struct LegalFeeCalculator {
    config: LegalFeeConfig,
}

impl LegalFeeCalculator {
    pub fn new(config: LegalFeeConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, input: &LegalFeeInput) -> Result<LegalFeeResult> {
        ensure_amounts(&[
            ("purchase_price", input.purchase_price),
            ("loan_amount", input.loan_amount),
        ])?;

        if input.down_payment_percent < Decimal::ZERO || input.down_payment_percent > Decimal::from(100) {
            return Err(CalculatorError::invalid("down_payment_percent", "must be between 0 and 100"));
        }

        let down_payment = input.purchase_price.apply(Rate::from_percent(input.down_payment_percent));
        let sale_purchase_legal_fee = self.config.legal_fee_scale.charge(input.purchase_price);
        let sale_purchase_stamp_duty = self.config.transfer_stamp_duty.charge(input.purchase_price);
        let loan_legal_fee = self.config.legal_fee_scale.charge(input.loan_amount);
        let loan_stamp_duty = input.loan_amount.apply(self.config.loan_stamp_duty_rate);

        let total_fees = sale_purchase_legal_fee + sale_purchase_stamp_duty + loan_legal_fee + loan_stamp_duty;

        debug!(
            "legal fees on price {} loan {}: total {}",
            input.purchase_price, input.loan_amount, total_fees
        );

        Ok(LegalFeeResult {
            down_payment,
            sale_purchase_legal_fee,
            sale_purchase_stamp_duty,
            loan_legal_fee,
            loan_stamp_duty,
            total_fees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_log::test;

    fn calculator() -> LegalFeeCalculator {
        LegalFeeCalculator::new(LegalFeeConfig::default())
    }

    #[test]
    fn test_typical_purchase() {
        let input = LegalFeeInput {
            purchase_price: Money::from_major(600_000),
            loan_amount: Money::from_major(540_000),
            down_payment_percent: dec!(10),
        };

        let result = calculator().calculate(&input).unwrap();
        assert_eq!(result.down_payment, Money::from_major(60_000));
        // 6,250 + 1% of 100,000
        assert_eq!(result.sale_purchase_legal_fee, Money::from_major(7_250));
        // 1,000 + 8,000 + 3% of 100,000
        assert_eq!(result.sale_purchase_stamp_duty, Money::from_major(12_000));
        assert_eq!(result.loan_legal_fee, Money::from_major(6_650));
        assert_eq!(result.loan_stamp_duty, Money::from_major(2_700));
        assert_eq!(result.total_fees, Money::from_major(28_600));
    }

    #[test]
    fn test_minimum_legal_fee() {
        let input = LegalFeeInput {
            purchase_price: Money::from_major(30_000),
            loan_amount: Money::from_major(20_000),
            down_payment_percent: Decimal::ZERO,
        };

        let result = calculator().calculate(&input).unwrap();
        assert_eq!(result.sale_purchase_legal_fee, Money::from_major(500));
        assert_eq!(result.loan_legal_fee, Money::from_major(500));
        assert_eq!(result.sale_purchase_stamp_duty, Money::from_major(300));
    }

    #[test]
    fn test_no_loan_means_no_loan_charges() {
        let input = LegalFeeInput {
            purchase_price: Money::from_major(250_000),
            ..Default::default()
        };

        let result = calculator().calculate(&input).unwrap();
        assert_eq!(result.loan_legal_fee, Money::ZERO);
        assert_eq!(result.loan_stamp_duty, Money::ZERO);
    }

    #[test]
    fn test_price_above_top_legal_tier() {
        let input = LegalFeeInput {
            purchase_price: Money::from_major(8_000_000),
            ..Default::default()
        };

        let result = calculator().calculate(&input).unwrap();
        // 6,250 + 70,000 + 5,000
        assert_eq!(result.sale_purchase_legal_fee, Money::from_major(81_250));
    }

    #[test]
    fn test_invalid_down_payment() {
        let input = LegalFeeInput {
            purchase_price: Money::from_major(250_000),
            down_payment_percent: dec!(120),
            ..Default::default()
        };
        assert!(calculator().calculate(&input).is_err());
    }

    #[test]
    fn test_out_of_range_price_rejected() {
        let input = LegalFeeInput {
            purchase_price: Money::from_str_exact("70000000000000000000000000000").unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            calculator().calculate(&input),
            Err(CalculatorError::InvalidInput { .. })
        ));
    }
}
