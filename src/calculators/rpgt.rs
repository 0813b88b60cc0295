use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::RpgtConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::DisposerCategory;

use super::ensure_amounts;

/// purchase and disposal of a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpgtInput {
    pub purchase_date: NaiveDate,
    pub purchase_price: Money,
    pub purchase_misc_cost: Money,
    pub disposal_date: NaiveDate,
    pub selling_price: Money,
    pub disposal_misc_cost: Money,
    pub enhancement_cost: Money,
}

/// tax due for one category of disposer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpgtLiability {
    pub category: DisposerCategory,
    pub rate: Rate,
    pub exemption: Money,
    pub net_gain: Money,
    pub payable: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpgtResult {
    pub acquisition_cost: Money,
    pub chargeable_gain: Money,
    /// disposal year minus purchase year
    pub holding_years: u32,
    pub liabilities: Vec<RpgtLiability>,
}

impl RpgtResult {
    pub fn liability(&self, category: DisposerCategory) -> Option<&RpgtLiability> {
        self.liabilities.iter().find(|l| l.category == category)
    }
}

/// real property gains tax calculator
pub struct RpgtCalculator {
    config: RpgtConfig,
}

impl RpgtCalculator {
    pub fn new(config: RpgtConfig) -> Self {
        Self { config }
    }

    pub fn calculate(&self, input: &RpgtInput) -> Result<RpgtResult> {
        ensure_amounts(&[
            ("purchase_price", input.purchase_price),
            ("purchase_misc_cost", input.purchase_misc_cost),
            ("selling_price", input.selling_price),
            ("disposal_misc_cost", input.disposal_misc_cost),
            ("enhancement_cost", input.enhancement_cost),
        ])?;

        if input.disposal_date < input.purchase_date {
            return Err(CalculatorError::invalid("disposal_date", "is before the purchase date"));
        }

        let holding_years = (input.disposal_date.year() - input.purchase_date.year()) as u32;
        let band = self.config.band_for(holding_years).ok_or_else(|| CalculatorError::InvalidConfiguration {
            message: format!("no rpgt band covers a holding period of {} years", holding_years),
        })?;

        let acquisition_cost = input.purchase_price + input.purchase_misc_cost;
        let chargeable_gain = (input.selling_price
            - acquisition_cost
            - input.disposal_misc_cost
            - input.enhancement_cost)
            .max(Money::ZERO);

        let liabilities = DisposerCategory::ALL
            .iter()
            .map(|&category| {
                let rate = band.rate_for(category);
                let exemption = self.exemption(category, chargeable_gain);
                let net_gain = (chargeable_gain - exemption).max(Money::ZERO);
                RpgtLiability {
                    category,
                    rate,
                    exemption,
                    net_gain,
                    payable: net_gain.apply(rate),
                }
            })
            .collect();

        debug!(
            "rpgt: gain {} held {} years",
            chargeable_gain, holding_years
        );

        Ok(RpgtResult {
            acquisition_cost,
            chargeable_gain,
            holding_years,
            liabilities,
        })
    }

    fn exemption(&self, category: DisposerCategory, chargeable_gain: Money) -> Money {
        if !category.is_individual() {
            return Money::ZERO;
        }
        self.config
            .individual_exemption_floor
            .max(chargeable_gain.apply(self.config.individual_exemption_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn long_held() -> RpgtInput {
        RpgtInput {
            purchase_date: date(2013, 1, 1),
            purchase_price: Money::from_major(50_000),
            purchase_misc_cost: Money::from_major(4_000),
            disposal_date: date(2025, 4, 5),
            selling_price: Money::from_major(200_000),
            disposal_misc_cost: Money::from_major(6_000),
            enhancement_cost: Money::from_major(20_000),
        }
    }

    #[test]
    fn test_long_held_property() {
        let calculator = RpgtCalculator::new(RpgtConfig::default());
        let result = calculator.calculate(&long_held()).unwrap();

        assert_eq!(result.acquisition_cost, Money::from_major(54_000));
        assert_eq!(result.chargeable_gain, Money::from_major(120_000));
        assert_eq!(result.holding_years, 12);

        let citizen = result.liability(DisposerCategory::Citizen).unwrap();
        assert_eq!(citizen.exemption, Money::from_major(12_000));
        assert_eq!(citizen.net_gain, Money::from_major(108_000));
        assert_eq!(citizen.payable, Money::ZERO);

        let foreigner = result.liability(DisposerCategory::NonCitizen).unwrap();
        assert_eq!(foreigner.payable, Money::from_major(10_800));

        let company = result.liability(DisposerCategory::Company).unwrap();
        assert_eq!(company.exemption, Money::ZERO);
        assert_eq!(company.payable, Money::from_major(12_000));
    }

    #[test]
    fn test_short_holding_taxed_at_top_rate() {
        let mut input = long_held();
        input.purchase_date = date(2023, 6, 1);
        input.disposal_date = date(2025, 2, 1);

        let result = RpgtCalculator::new(RpgtConfig::default()).calculate(&input).unwrap();
        assert_eq!(result.holding_years, 2);
        let citizen = result.liability(DisposerCategory::Citizen).unwrap();
        assert_eq!(citizen.rate, Rate::from_percentage(30));
        assert_eq!(citizen.payable, Money::from_major(32_400));
    }

    #[test]
    fn test_small_gain_fully_exempt_for_individuals() {
        let mut input = long_held();
        input.selling_price = Money::from_major(85_000);

        let result = RpgtCalculator::new(RpgtConfig::default()).calculate(&input).unwrap();
        assert_eq!(result.chargeable_gain, Money::from_major(5_000));
        let foreigner = result.liability(DisposerCategory::NonCitizen).unwrap();
        assert_eq!(foreigner.exemption, Money::from_major(10_000));
        assert_eq!(foreigner.net_gain, Money::ZERO);
        assert_eq!(foreigner.payable, Money::ZERO);
    }

    #[test]
    fn test_loss_is_not_chargeable() {
        let mut input = long_held();
        input.selling_price = Money::from_major(40_000);

        let result = RpgtCalculator::new(RpgtConfig::default()).calculate(&input).unwrap();
        assert_eq!(result.chargeable_gain, Money::ZERO);
        assert!(result.liabilities.iter().all(|l| l.payable.is_zero()));
    }

    #[test]
    fn test_disposal_before_purchase_rejected() {
        let mut input = long_held();
        input.disposal_date = date(2012, 12, 31);
        assert!(RpgtCalculator::new(RpgtConfig::default()).calculate(&input).is_err());
    }
}
