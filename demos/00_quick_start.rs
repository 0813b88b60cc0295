/// quick start - payment, totals and savings for a single mortgage
use loan_engine_rs::{compute_loan_summary, LoanTerms, Money};
use rust_decimal_macros::dec;
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    // 270,000 over 30 years at 4.5%, with 200 extra each month
    let terms = LoanTerms::new(Money::from_major(270_000), dec!(4.5), 360)
        .with_extra_payment(Money::from_major(200));

    let result = compute_loan_summary(&terms)?;

    println!("monthly payment:  {}", result.base_payment().to_currency_string());
    println!("total interest:   {}", result.summary.total_interest.to_currency_string());
    println!("total payment:    {}", result.summary.total_payment.to_currency_string());
    println!("paid off after:   {} months", result.accelerated.payoff_period);
    println!("months saved:     {}", result.summary.months_saved);
    println!("interest saved:   {}", result.summary.interest_saved.to_currency_string());

    Ok(())
}
