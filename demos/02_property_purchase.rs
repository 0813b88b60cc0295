/// property purchase - fees, affordability, refinance and resale tax
use chrono::NaiveDate;
use loan_engine_rs::calculators::{
    DsrCalculator, DsrInput, LegalFeeCalculator, LegalFeeInput, RefinanceCalculator, RefinanceInput, RpgtCalculator,
    RpgtInput,
};
use loan_engine_rs::{DisposerCategory, EngineConfig, Money, RefinanceBasis};
use rust_decimal_macros::dec;
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    let config = EngineConfig::malaysia();

    println!("=== legal fees & stamp duty ===");
    let fees = LegalFeeCalculator::new(config.legal_fees.clone()).calculate(&LegalFeeInput {
        purchase_price: Money::from_major(600_000),
        loan_amount: Money::from_major(540_000),
        down_payment_percent: dec!(10),
    })?;
    println!("down payment:        {}", fees.down_payment.to_currency_string());
    println!("s&p legal fee:       {}", fees.sale_purchase_legal_fee.to_currency_string());
    println!("s&p stamp duty:      {}", fees.sale_purchase_stamp_duty.to_currency_string());
    println!("loan legal fee:      {}", fees.loan_legal_fee.to_currency_string());
    println!("loan stamp duty:     {}", fees.loan_stamp_duty.to_currency_string());
    println!("total fees:          {}", fees.total_fees.to_currency_string());

    println!("\n=== debt service ratio ===");
    let dsr = DsrCalculator::new(config.dsr.clone()).calculate(&DsrInput {
        basic_salary: Money::from_major(8_000),
        fixed_allowance: Money::from_major(500),
        variable_income: Money::from_major(1_500),
        car_loan: Money::from_major(900),
        credit_card: Money::from_major(300),
        ..Default::default()
    })?;
    println!("dsr: {}% ({:?}), headroom {}", dsr.dsr_percent.round_dp(2), dsr.status, dsr.headroom.to_currency_string());

    println!("\n=== refinance after 5 years ===");
    let refinance = RefinanceCalculator::new(config.limits.clone()).calculate(&RefinanceInput {
        loan_amount: Money::from_major(300_000),
        old_rate_percent: dec!(6),
        old_term_months: 360,
        payments_made: 60,
        new_rate_percent: dec!(4),
        new_term_months: 300,
        basis: RefinanceBasis::OutstandingBalance,
    })?;
    println!("old payment:     {}", refinance.old_monthly_payment.to_currency_string());
    println!("new payment:     {}", refinance.new_monthly_payment.to_currency_string());
    println!("interest saved:  {}", refinance.interest_saved.to_currency_string());

    println!("\n=== real property gains tax ===");
    let rpgt = RpgtCalculator::new(config.rpgt.clone()).calculate(&RpgtInput {
        purchase_date: NaiveDate::from_ymd_opt(2013, 1, 1).ok_or("bad date")?,
        purchase_price: Money::from_major(50_000),
        purchase_misc_cost: Money::from_major(4_000),
        disposal_date: NaiveDate::from_ymd_opt(2025, 4, 5).ok_or("bad date")?,
        selling_price: Money::from_major(200_000),
        disposal_misc_cost: Money::from_major(6_000),
        enhancement_cost: Money::from_major(20_000),
    })?;
    println!("chargeable gain: {} held {} years", rpgt.chargeable_gain.to_currency_string(), rpgt.holding_years);
    for category in DisposerCategory::ALL {
        if let Some(liability) = rpgt.liability(category) {
            println!("  {:?}: {} at {}", category, liability.payable.to_currency_string(), liability.rate);
        }
    }

    Ok(())
}
