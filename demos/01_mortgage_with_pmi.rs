/// mortgage with pmi - cancellation at 80% ltv and the full report as json
use loan_engine_rs::{AmortizationEngine, EngineConfig, LoanReport, LoanTermsForm, PmiPolicy};
use log::info;
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    let config = EngineConfig::from_json(r#"{ "limits": { "max_term_months": 480 } }"#)?;
    let engine = AmortizationEngine::new(config.limits.clone());

    // values exactly as typed into a form
    let form = LoanTermsForm {
        loan_amount: "230,000".to_string(),
        interest_rate: "4.5".to_string(),
        term_years: "30".to_string(),
        pmi_percent: "0.5".to_string(),
        property_price: "250,000".to_string(),
        property_tax: "2,400".to_string(),
        insurance: "1,200".to_string(),
        pmi_policy: PmiPolicy::CancelAtThreshold,
        ..Default::default()
    };

    let terms = form.parse(engine.limits())?;
    let result = engine.compute_loan_summary(&terms)?;
    let breakdown = &result.breakdown;

    println!("=== monthly payment ===");
    println!("principal & interest: {}", breakdown.principal_and_interest.to_currency_string());
    println!("pmi:                  {}", breakdown.monthly_pmi.to_currency_string());
    println!("with pmi:             {}", breakdown.total_with_pmi.to_currency_string());
    println!("without pmi:          {}", breakdown.total_without_pmi.to_currency_string());

    match breakdown.pmi_cancellation_period {
        Some(period) => info!("pmi stops from payment {}", period),
        None => info!("pmi is charged for the life of the loan"),
    }

    let report = LoanReport::from_calculation(&result);
    println!("\nfirst rows:");
    for row in report.schedule.iter().take(3) {
        println!(
            "  {:>3}  {:>10}  interest {:>9}  principal {:>9}  balance {:>12}",
            row.period, row.payment, row.interest, row.principal, row.balance
        );
    }

    println!("\n{}", report.to_json_pretty()?.lines().take(20).collect::<Vec<_>>().join("\n"));

    Ok(())
}
