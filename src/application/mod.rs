pub mod repository;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{
    ApplicantId, ApplicationId, ApplicationStatus, BankerId, LoanId, LoanStatus, LoanType, SubApplicationId,
    SubApplicationStatus,
};

pub use repository::{ApplicationRepository, InMemoryRepository};
pub use service::ApplicationService;

/// what an applicant asks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub loan_type: LoanType,
    pub amount: Money,
    pub term_months: u32,
    pub purpose: String,
}

/// a loan application moving through review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub loan_type: LoanType,
    pub amount: Money,
    pub term_months: u32,
    pub purpose: String,
    pub status: ApplicationStatus,
    /// banker who took the application on, if any
    pub accepted_by: Option<BankerId>,
    /// documents asked for and not yet supplied
    pub outstanding_documents: Vec<String>,
    pub submitted_documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// one banker's copy of an application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubApplication {
    pub id: SubApplicationId,
    pub application_id: ApplicationId,
    pub banker_id: BankerId,
    pub status: SubApplicationStatus,
    pub requested_documents: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// loan originated from an approved application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub application_id: ApplicationId,
    pub applicant_id: ApplicantId,
    pub loan_type: LoanType,
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: LoanStatus,
}
