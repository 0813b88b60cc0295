use std::collections::HashMap;

use crate::errors::{CalculatorError, Result};
use crate::types::{ApplicantId, ApplicationId, BankerId, SubApplicationId};

use super::{LoanApplication, LoanRecord, SubApplication};

/// storage for applications, banker copies and originated loans
pub trait ApplicationRepository {
    fn insert_application(&mut self, application: LoanApplication) -> Result<()>;

    fn application(&self, id: ApplicationId) -> Result<LoanApplication>;

    fn update_application(&mut self, application: LoanApplication) -> Result<()>;

    fn applications_for_applicant(&self, applicant_id: ApplicantId) -> Vec<LoanApplication>;

    fn insert_sub_application(&mut self, sub_application: SubApplication) -> Result<()>;

    fn sub_application(&self, id: SubApplicationId) -> Result<SubApplication>;

    fn update_sub_application(&mut self, sub_application: SubApplication) -> Result<()>;

    /// banker copies of one application, oldest first
    fn sub_applications(&self, application_id: ApplicationId) -> Vec<SubApplication>;

    fn sub_applications_for_banker(&self, banker_id: BankerId) -> Vec<SubApplication>;

    fn insert_loan(&mut self, loan: LoanRecord) -> Result<()>;

    fn loan_for_application(&self, application_id: ApplicationId) -> Option<LoanRecord>;

    fn loans_for_applicant(&self, applicant_id: ApplicantId) -> Vec<LoanRecord>;
}

/// in-process repository
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    applications: HashMap<ApplicationId, LoanApplication>,
    sub_applications: HashMap<SubApplicationId, SubApplication>,
    loans: Vec<LoanRecord>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationRepository for InMemoryRepository {
    fn insert_application(&mut self, application: LoanApplication) -> Result<()> {
        self.applications.insert(application.id, application);
        Ok(())
    }

    fn application(&self, id: ApplicationId) -> Result<LoanApplication> {
        self.applications
            .get(&id)
            .cloned()
            .ok_or(CalculatorError::ApplicationNotFound { id })
    }

    fn update_application(&mut self, application: LoanApplication) -> Result<()> {
        match self.applications.get_mut(&application.id) {
            Some(existing) => {
                *existing = application;
                Ok(())
            }
            None => Err(CalculatorError::ApplicationNotFound { id: application.id }),
        }
    }

    fn applications_for_applicant(&self, applicant_id: ApplicantId) -> Vec<LoanApplication> {
        let mut found: Vec<_> = self
            .applications
            .values()
            .filter(|a| a.applicant_id == applicant_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.created_at, a.id));
        found
    }

    fn insert_sub_application(&mut self, sub_application: SubApplication) -> Result<()> {
        if !self.applications.contains_key(&sub_application.application_id) {
            return Err(CalculatorError::ApplicationNotFound {
                id: sub_application.application_id,
            });
        }
        self.sub_applications.insert(sub_application.id, sub_application);
        Ok(())
    }

    fn sub_application(&self, id: SubApplicationId) -> Result<SubApplication> {
        self.sub_applications
            .get(&id)
            .cloned()
            .ok_or(CalculatorError::SubApplicationNotFound { id })
    }

    fn update_sub_application(&mut self, sub_application: SubApplication) -> Result<()> {
        match self.sub_applications.get_mut(&sub_application.id) {
            Some(existing) => {
                *existing = sub_application;
                Ok(())
            }
            None => Err(CalculatorError::SubApplicationNotFound { id: sub_application.id }),
        }
    }

    fn sub_applications(&self, application_id: ApplicationId) -> Vec<SubApplication> {
        let mut found: Vec<_> = self
            .sub_applications
            .values()
            .filter(|s| s.application_id == application_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.created_at, s.id));
        found
    }

    fn sub_applications_for_banker(&self, banker_id: BankerId) -> Vec<SubApplication> {
        let mut found: Vec<_> = self
            .sub_applications
            .values()
            .filter(|s| s.banker_id == banker_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.created_at, s.id));
        found
    }

    fn insert_loan(&mut self, loan: LoanRecord) -> Result<()> {
        self.loans.push(loan);
        Ok(())
    }

    fn loan_for_application(&self, application_id: ApplicationId) -> Option<LoanRecord> {
        self.loans.iter().find(|l| l.application_id == application_id).cloned()
    }

    fn loans_for_applicant(&self, applicant_id: ApplicantId) -> Vec<LoanRecord> {
        self.loans
            .iter()
            .filter(|l| l.applicant_id == applicant_id)
            .cloned()
            .collect()
    }
}
