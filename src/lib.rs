pub mod amortization;
pub mod application;
pub mod calculators;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod report;
pub mod terms;
pub mod types;

// re-export key types
pub use amortization::{
    base_payment, compute_loan_summary, generate_schedule, periodic_rate, simulate_accelerated_payoff, summarize,
    AcceleratedPayoff, AmortizationEngine, LoanCalculation, PaymentBreakdown, Schedule, ScheduleEntry, Summary,
};
pub use application::{
    ApplicationRepository, ApplicationRequest, ApplicationService, InMemoryRepository, LoanApplication, LoanRecord,
    SubApplication,
};
pub use calculators::{
    DsrCalculator, DsrInput, DsrResult, LegalFeeCalculator, LegalFeeInput, LegalFeeResult, RefinanceCalculator,
    RefinanceInput, RefinanceResult, RpgtCalculator, RpgtInput, RpgtLiability, RpgtResult,
};
pub use config::{EngineConfig, EngineLimits};
pub use decimal::{Money, Rate};
pub use errors::{CalculatorError, Result};
pub use events::{Event, EventStore};
pub use report::LoanReport;
pub use terms::{LoanTerms, LoanTermsForm, RecurringCosts};
pub use types::{
    ApplicantId, ApplicationId, ApplicationStatus, BankerId, CalculationWarning, DisposerCategory, DsrStatus,
    LoanId, LoanStatus, LoanType, PmiPolicy, RefinanceBasis, SubApplicationId, SubApplicationStatus,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
