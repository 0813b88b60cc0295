//! presentation views of a loan calculation

use serde::{Deserialize, Serialize};

use crate::amortization::{LoanCalculation, ScheduleEntry};
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::CalculationWarning;

/// calculation rounded for display, amounts as "1,368.05"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanReport {
    pub monthly: MonthlyView,
    pub totals: TotalsView,
    pub payoff: PayoffView,
    pub schedule: Vec<ScheduleRow>,
    pub warnings: Vec<CalculationWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyView {
    pub principal_and_interest: String,
    pub pmi: String,
    pub property_tax: String,
    pub insurance: String,
    pub other_fees: String,
    pub total_with_pmi: String,
    pub total_without_pmi: String,
    pub pmi_cancellation_period: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsView {
    pub total_payment: String,
    pub total_interest: String,
    pub annual_payment: String,
    /// two decimals, without a percent sign
    pub mortgage_constant: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffView {
    pub baseline_periods: u32,
    pub accelerated_periods: u32,
    pub months_saved: u32,
    pub interest_saved: String,
    /// extra principal paid over the accelerated schedule
    pub extra_paid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub payment: String,
    pub interest: String,
    pub principal: String,
    pub extra: String,
    pub balance: String,
    pub pmi_active: bool,
}

impl ScheduleRow {
    fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            period: entry.period_index,
            payment: entry.scheduled_payment.to_currency_string(),
            interest: entry.interest_portion.to_currency_string(),
            principal: entry.principal_portion.to_currency_string(),
            extra: entry.extra_principal.to_currency_string(),
            balance: entry.remaining_balance.to_currency_string(),
            pmi_active: entry.pmi_active,
        }
    }
}

fn currency(amount: Money) -> String {
    amount.to_currency_string()
}

impl LoanReport {
    /// render with the accelerated schedule when an extra payment is set
    pub fn from_calculation(calculation: &LoanCalculation) -> Self {
        let breakdown = &calculation.breakdown;
        let summary = &calculation.summary;

        let shown = if calculation.terms.extra_payment_per_period.is_positive() {
            &calculation.accelerated.schedule
        } else {
            &calculation.baseline
        };

        LoanReport {
            monthly: MonthlyView {
                principal_and_interest: currency(breakdown.principal_and_interest),
                pmi: currency(breakdown.monthly_pmi),
                property_tax: currency(breakdown.monthly_property_tax),
                insurance: currency(breakdown.monthly_insurance),
                other_fees: currency(breakdown.monthly_other_fees),
                total_with_pmi: currency(breakdown.total_with_pmi),
                total_without_pmi: currency(breakdown.total_without_pmi),
                pmi_cancellation_period: breakdown.pmi_cancellation_period,
            },
            totals: TotalsView {
                total_payment: currency(summary.total_payment),
                total_interest: currency(summary.total_interest),
                annual_payment: currency(summary.annual_payment),
                mortgage_constant: format!("{:.2}", summary.mortgage_constant_percent.round_dp(2)),
            },
            payoff: PayoffView {
                baseline_periods: calculation.baseline.periods(),
                accelerated_periods: calculation.accelerated.payoff_period,
                months_saved: summary.months_saved,
                interest_saved: currency(summary.interest_saved),
                extra_paid: currency(calculation.accelerated.schedule.total_extra()),
            },
            schedule: shown.entries.iter().map(ScheduleRow::from_entry).collect(),
            warnings: calculation.warnings.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
