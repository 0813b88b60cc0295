use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{CalculatorError, Result};
use crate::types::{DisposerCategory, LoanType};

/// largest amount, in whole currency units, accepted as input by default
pub const DEFAULT_MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// upper bound on `max_amount`, keeps every schedule total inside `Decimal`
const AMOUNT_CEILING: i64 = 1_000_000_000_000_000_000;

/// engine configuration
///
/// Every section has a default, so a JSON document only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub limits: EngineLimits,
    pub dsr: DsrConfig,
    pub legal_fees: LegalFeeConfig,
    pub rpgt: RpgtConfig,
    pub lending: LendingConfig,
}

/// bounds applied to amortization inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// longest schedule the engine will generate
    pub max_term_months: u32,
    /// residual balance, as a fraction of principal, treated as paid off
    pub payoff_epsilon: Decimal,
    /// loan-to-value at which pmi is cancelled
    pub pmi_cancellation_ltv: Rate,
    /// largest principal, price, extra payment or cost accepted
    pub max_amount: Money,
    /// largest annual interest or pmi rate accepted, 1000 means 1000%
    pub max_annual_rate_percent: Decimal,
}

/// debt service ratio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DsrConfig {
    /// share of variable income (commission, overtime) banks recognise
    pub variable_income_recognition: Rate,
    /// share of other income (rental, side business) banks recognise
    pub other_income_recognition: Rate,
    /// dsr at or below this percentage is considered healthy
    pub healthy_threshold_percent: Decimal,
}

/// one band of a marginal scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// inclusive upper bound of the band, None for the open-ended top band
    pub up_to: Option<Money>,
    pub rate: Rate,
}

/// marginal (bracketed) charge scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredScale {
    pub tiers: Vec<Tier>,
    /// floor applied to any non-zero charge
    pub minimum_charge: Option<Money>,
}

impl TieredScale {
    /// charge for an amount, each band taxed at its own rate
    pub fn charge(&self, amount: Money) -> Money {
        if !amount.is_positive() {
            return Money::ZERO;
        }

        let mut lower = Money::ZERO;
        let mut total = Money::ZERO;

        for tier in &self.tiers {
            if amount <= lower {
                break;
            }

            let band_top = tier.up_to.map_or(amount, |upper| upper.min(amount));
            total += (band_top - lower).apply(tier.rate);

            match tier.up_to {
                Some(upper) => lower = upper,
                None => break,
            }
        }

        match self.minimum_charge {
            Some(minimum) => total.max(minimum),
            None => total,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let Some(last) = self.tiers.last() else {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!("{} has no tiers", name),
            });
        };

        if last.up_to.is_some() {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!("{} must end with an open-ended tier", name),
            });
        }

        let mut previous = Money::ZERO;
        for tier in &self.tiers {
            if tier.rate.as_decimal() < Decimal::ZERO {
                return Err(CalculatorError::InvalidConfiguration {
                    message: format!("{} has a negative rate", name),
                });
            }
            if let Some(upper) = tier.up_to {
                if upper <= previous {
                    return Err(CalculatorError::InvalidConfiguration {
                        message: format!("{} tiers must be strictly increasing", name),
                    });
                }
                previous = upper;
            }
        }

        Ok(())
    }
}

/// legal fee and stamp duty scales for a property purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalFeeConfig {
    /// solicitor's scale, used for both the sale & purchase and loan agreements
    pub legal_fee_scale: TieredScale,
    /// stamp duty on the memorandum of transfer
    pub transfer_stamp_duty: TieredScale,
    /// flat stamp duty on the loan agreement
    pub loan_stamp_duty_rate: Rate,
}

/// gains tax rates for disposals held less than `held_under_years`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpgtBand {
    /// None for the band covering every longer holding period
    pub held_under_years: Option<u32>,
    pub citizen: Rate,
    pub non_citizen: Rate,
    pub company: Rate,
}

impl RpgtBand {
    pub fn rate_for(&self, category: DisposerCategory) -> Rate {
        match category {
            DisposerCategory::Citizen => self.citizen,
            DisposerCategory::NonCitizen => self.non_citizen,
            DisposerCategory::Company => self.company,
        }
    }
}

/// real property gains tax settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpgtConfig {
    pub bands: Vec<RpgtBand>,
    /// individuals are exempt on the larger of this amount ...
    pub individual_exemption_floor: Money,
    /// ... and this share of the chargeable gain
    pub individual_exemption_rate: Rate,
}

impl RpgtConfig {
    /// band for a holding period in whole years
    pub fn band_for(&self, holding_years: u32) -> Option<&RpgtBand> {
        self.bands.iter().find(|band| match band.held_under_years {
            Some(limit) => holding_years < limit,
            None => true,
        })
    }
}

/// indicative annual rates quoted when an application is approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingConfig {
    pub personal_rate: Rate,
    pub auto_rate: Rate,
    pub home_rate: Rate,
    pub education_rate: Rate,
    pub business_rate: Rate,
    pub default_rate: Rate,
}

impl LendingConfig {
    pub fn rate_for(&self, loan_type: &LoanType) -> Rate {
        match loan_type {
            LoanType::Personal => self.personal_rate,
            LoanType::Auto => self.auto_rate,
            LoanType::Home => self.home_rate,
            LoanType::Education => self.education_rate,
            LoanType::Business => self.business_rate,
            LoanType::Other(_) => self.default_rate,
        }
    }
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_term_months: 1200,
            payoff_epsilon: dec!(0.000001),
            pmi_cancellation_ltv: Rate::from_percentage(80),
            max_amount: Money::from_major(DEFAULT_MAX_AMOUNT),
            max_annual_rate_percent: dec!(1000),
        }
    }
}

impl Default for DsrConfig {
    fn default() -> Self {
        Self {
            variable_income_recognition: Rate::from_percentage(80),
            other_income_recognition: Rate::from_percentage(80),
            healthy_threshold_percent: dec!(70),
        }
    }
}

impl Default for LegalFeeConfig {
    fn default() -> Self {
        Self {
            legal_fee_scale: TieredScale {
                tiers: vec![
                    Tier { up_to: Some(Money::from_major(500_000)), rate: Rate::from_bps(125) },
                    Tier { up_to: Some(Money::from_major(7_500_000)), rate: Rate::from_percentage(1) },
                    Tier { up_to: None, rate: Rate::from_percentage(1) },
                ],
                minimum_charge: Some(Money::from_major(500)),
            },
            transfer_stamp_duty: TieredScale {
                tiers: vec![
                    Tier { up_to: Some(Money::from_major(100_000)), rate: Rate::from_percentage(1) },
                    Tier { up_to: Some(Money::from_major(500_000)), rate: Rate::from_percentage(2) },
                    Tier { up_to: Some(Money::from_major(1_000_000)), rate: Rate::from_percentage(3) },
                    Tier { up_to: None, rate: Rate::from_percentage(4) },
                ],
                minimum_charge: None,
            },
            loan_stamp_duty_rate: Rate::from_bps(50),
        }
    }
}

impl Default for RpgtConfig {
    fn default() -> Self {
        let band = |held_under_years: Option<u32>, citizen: u32, non_citizen: u32, company: u32| RpgtBand {
            held_under_years,
            citizen: Rate::from_percentage(citizen),
            non_citizen: Rate::from_percentage(non_citizen),
            company: Rate::from_percentage(company),
        };

        Self {
            bands: vec![
                band(Some(3), 30, 30, 30),
                band(Some(4), 20, 30, 20),
                band(Some(5), 15, 30, 15),
                band(Some(6), 5, 30, 10),
                band(None, 0, 10, 10),
            ],
            individual_exemption_floor: Money::from_major(10_000),
            individual_exemption_rate: Rate::from_percentage(10),
        }
    }
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            personal_rate: Rate::from_percentage(10),
            auto_rate: Rate::from_percentage(7),
            home_rate: Rate::from_percentage(5),
            education_rate: Rate::from_percentage(6),
            business_rate: Rate::from_percentage(8),
            default_rate: Rate::from_percentage(8),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::malaysia()
    }
}

impl EngineConfig {
    /// malaysian residential market: ringgit scales, rpgt schedule as of 2023
    pub fn malaysia() -> Self {
        Self {
            limits: EngineLimits::default(),
            dsr: DsrConfig::default(),
            legal_fees: LegalFeeConfig::default(),
            rpgt: RpgtConfig::default(),
            lending: LendingConfig::default(),
        }
    }

    /// load from json, unspecified values fall back to the malaysian preset
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// reject configurations the calculators cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_term_months == 0 {
            return Err(CalculatorError::InvalidConfiguration {
                message: "max_term_months must be at least 1".to_string(),
            });
        }

        if self.limits.payoff_epsilon < Decimal::ZERO || self.limits.payoff_epsilon >= Decimal::ONE {
            return Err(CalculatorError::InvalidConfiguration {
                message: "payoff_epsilon must be in [0, 1)".to_string(),
            });
        }

        if !self.limits.max_amount.is_positive() || self.limits.max_amount > Money::from_major(AMOUNT_CEILING) {
            return Err(CalculatorError::InvalidConfiguration {
                message: format!("max_amount must be in (0, {}]", AMOUNT_CEILING),
            });
        }

        let max_rate = self.limits.max_annual_rate_percent;
        if max_rate <= Decimal::ZERO || max_rate > dec!(10000) {
            return Err(CalculatorError::InvalidConfiguration {
                message: "max_annual_rate_percent must be in (0, 10000]".to_string(),
            });
        }

        let ltv = self.limits.pmi_cancellation_ltv.as_decimal();
        if ltv <= Decimal::ZERO || ltv > Decimal::ONE {
            return Err(CalculatorError::InvalidConfiguration {
                message: "pmi_cancellation_ltv must be in (0, 1]".to_string(),
            });
        }

        if self.dsr.healthy_threshold_percent <= Decimal::ZERO {
            return Err(CalculatorError::InvalidConfiguration {
                message: "dsr healthy threshold must be positive".to_string(),
            });
        }

        self.legal_fees.legal_fee_scale.validate("legal_fee_scale")?;
        self.legal_fees.transfer_stamp_duty.validate("transfer_stamp_duty")?;

        match self.rpgt.bands.last() {
            Some(band) if band.held_under_years.is_none() => {}
            _ => {
                return Err(CalculatorError::InvalidConfiguration {
                    message: "rpgt bands must end with an open-ended band".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_default_preset_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config, EngineConfig::malaysia());
        assert_eq!(config.limits.max_term_months, 1200);
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{
            "limits": { "max_term_months": 480 },
            "dsr": { "healthy_threshold_percent": "60" }
        }"#;

        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.limits.max_term_months, 480);
        assert_eq!(config.limits.payoff_epsilon, dec!(0.000001));
        assert_eq!(config.dsr.healthy_threshold_percent, dec!(60));
        assert_eq!(config.dsr.variable_income_recognition, Rate::from_percentage(80));
        assert_eq!(config.lending, LendingConfig::default());
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "limits": { "max_term_months": 0 } }"#),
            Err(CalculatorError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(CalculatorError::Serialization { .. })
        ));
    }

    #[test]
    fn test_amount_and_rate_limits_are_bounded() {
        let config = EngineConfig::default();
        assert_eq!(config.limits.max_amount, Money::from_major(DEFAULT_MAX_AMOUNT));

        let mut unbounded = config.clone();
        unbounded.limits.max_amount = Money::from_str_exact("10000000000000000000000000000").unwrap();
        assert!(matches!(unbounded.validate(), Err(CalculatorError::InvalidConfiguration { .. })));

        let mut no_rates = config;
        no_rates.limits.max_annual_rate_percent = Decimal::ZERO;
        assert!(matches!(no_rates.validate(), Err(CalculatorError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_tiered_scale_marginal_charge() {
        let scale = LegalFeeConfig::default().transfer_stamp_duty;

        assert_eq!(scale.charge(Money::from_major(100_000)), Money::from_major(1_000));
        // 1,000 + 8,000 + 15,000 + 20,000
        assert_eq!(scale.charge(Money::from_major(1_500_000)), Money::from_major(44_000));
        assert_eq!(scale.charge(Money::ZERO), Money::ZERO);
    }

    #[test]
    fn test_tiered_scale_minimum_charge() {
        let scale = LegalFeeConfig::default().legal_fee_scale;

        assert_eq!(scale.charge(Money::from_major(20_000)), Money::from_major(500));
        assert_eq!(scale.charge(Money::from_major(400_000)), Money::from_major(5_000));
    }

    #[test]
    fn test_unordered_tiers_rejected() {
        let mut config = EngineConfig::default();
        config.legal_fees.transfer_stamp_duty.tiers.swap(0, 1);
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.legal_fees.legal_fee_scale.tiers.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rpgt_band_lookup() {
        let rpgt = RpgtConfig::default();

        let short = rpgt.band_for(2).unwrap();
        assert_eq!(short.rate_for(DisposerCategory::Citizen), Rate::from_percentage(30));

        let fifth_year = rpgt.band_for(5).unwrap();
        assert_eq!(fifth_year.rate_for(DisposerCategory::Company), Rate::from_percentage(10));

        let long = rpgt.band_for(12).unwrap();
        assert_eq!(long.rate_for(DisposerCategory::Citizen), Rate::ZERO);
        assert_eq!(long.rate_for(DisposerCategory::NonCitizen), Rate::from_percentage(10));
    }

    #[test]
    fn test_lending_rates_by_loan_type() {
        let lending = LendingConfig::default();
        assert_eq!(lending.rate_for(&LoanType::Home), Rate::from_percentage(5));
        assert_eq!(lending.rate_for(&LoanType::Other("renovation".to_string())), Rate::from_percentage(8));
    }
}
