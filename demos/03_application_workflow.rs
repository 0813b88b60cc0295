/// application workflow - submission, banker review and loan origination
use chrono::{Duration, TimeZone, Utc};
use loan_engine_rs::{
    ApplicationRequest, ApplicationService, EngineConfig, InMemoryRepository, LoanType, Money, SafeTimeProvider,
    TimeSource, Uuid,
};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new().with_level(log::LevelFilter::Info).init()?;

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap()));
    let controller = time.test_control().unwrap();

    let mut service = ApplicationService::new(InMemoryRepository::new(), &EngineConfig::default());
    let applicant = Uuid::new_v4();
    let (first_bank, second_bank) = (Uuid::new_v4(), Uuid::new_v4());

    let application = service.submit(
        applicant,
        ApplicationRequest {
            loan_type: LoanType::Home,
            amount: Money::from_major(450_000),
            term_months: 420,
            purpose: "condominium in petaling jaya".to_string(),
        },
        &time,
    )?;

    let copies = service.assign_bankers(application.id, &[first_bank, second_bank], &time)?;
    service.request_documents(copies[0].id, vec!["latest payslips".to_string()], &time)?;

    controller.advance(Duration::days(4));
    service.submit_documents(application.id, vec!["latest payslips".to_string()], &time)?;

    controller.advance(Duration::days(2));
    service.reject_sub_application(copies[1].id, "outside lending area", &time)?;

    if let Some(loan) = service.approve_sub_application(copies[0].id, &time)? {
        println!("loan {} at {}", loan.id, loan.annual_rate);
        println!("monthly payment: {}", loan.monthly_payment.to_currency_string());
        println!("runs {} to {}", loan.start_date.format("%Y-%m-%d"), loan.end_date.format("%Y-%m-%d"));
    }

    println!("\nhistory:");
    for event in service.events().for_application(application.id) {
        println!("  {}", serde_json::to_string(event)?);
    }

    Ok(())
}
