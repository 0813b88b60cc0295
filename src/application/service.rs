use chrono::Months;
use hourglass_rs::SafeTimeProvider;
use log::{info, warn};
use uuid::Uuid;

use crate::amortization::{base_payment, periodic_rate};
use crate::config::{EngineConfig, EngineLimits, LendingConfig};
use crate::errors::{CalculatorError, Result};
use crate::events::{Event, EventStore};
use crate::types::{
    ApplicantId, ApplicationId, ApplicationStatus, BankerId, LoanStatus, SubApplicationId, SubApplicationStatus,
};

use super::repository::ApplicationRepository;
use super::{ApplicationRequest, LoanApplication, LoanRecord, SubApplication};

/// drives applications through review and originates approved loans
pub struct ApplicationService<R: ApplicationRepository> {
    repository: R,
    lending: LendingConfig,
    limits: EngineLimits,
    events: EventStore,
}

impl<R: ApplicationRepository> ApplicationService<R> {
    pub fn new(repository: R, config: &EngineConfig) -> Self {
        Self {
            repository,
            lending: config.lending.clone(),
            limits: config.limits.clone(),
            events: EventStore::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// file a new application in `Pending`
    pub fn submit(
        &mut self,
        applicant_id: ApplicantId,
        request: ApplicationRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApplication> {
        if !request.amount.is_positive() {
            return Err(CalculatorError::invalid("amount", "must be greater than zero"));
        }

        if request.amount > self.limits.max_amount {
            return Err(CalculatorError::invalid(
                "amount",
                &format!("exceeds the maximum of {}", self.limits.max_amount),
            ));
        }

        if request.term_months == 0 || request.term_months > self.limits.max_term_months {
            return Err(CalculatorError::invalid(
                "term_months",
                &format!("must be between 1 and {}", self.limits.max_term_months),
            ));
        }

        let now = time_provider.now();
        let application = LoanApplication {
            id: Uuid::new_v4(),
            applicant_id,
            loan_type: request.loan_type,
            amount: request.amount,
            term_months: request.term_months,
            purpose: request.purpose,
            status: ApplicationStatus::Pending,
            accepted_by: None,
            outstanding_documents: Vec::new(),
            submitted_documents: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.repository.insert_application(application.clone())?;

        info!("application {} submitted for {}", application.id, application.amount);
        self.events.emit(Event::ApplicationSubmitted {
            application_id: application.id,
            applicant_id,
            loan_type: application.loan_type.clone(),
            amount: application.amount,
            timestamp: now,
        });

        Ok(application)
    }

    /// route a pending application to bankers, one copy each
    pub fn assign_bankers(
        &mut self,
        application_id: ApplicationId,
        banker_ids: &[BankerId],
        time_provider: &SafeTimeProvider,
    ) -> Result<Vec<SubApplication>> {
        let mut unique: Vec<BankerId> = Vec::with_capacity(banker_ids.len());
        for banker_id in banker_ids {
            if !unique.contains(banker_id) {
                unique.push(*banker_id);
            }
        }

        if unique.is_empty() {
            return Err(CalculatorError::NoBankersAssigned);
        }

        let mut application = self.repository.application(application_id)?;
        self.transition(&mut application, ApplicationStatus::Assigned, "assigned to bankers", time_provider)?;

        let now = time_provider.now();
        let mut created = Vec::with_capacity(unique.len());
        for banker_id in &unique {
            let sub_application = SubApplication {
                id: Uuid::new_v4(),
                application_id,
                banker_id: *banker_id,
                status: SubApplicationStatus::Assigned,
                requested_documents: Vec::new(),
                notes: None,
                created_at: now,
                updated_at: now,
            };
            self.repository.insert_sub_application(sub_application.clone())?;
            created.push(sub_application);
        }

        self.repository.update_application(application)?;
        self.events.emit(Event::BankersAssigned {
            application_id,
            banker_ids: unique,
            timestamp: now,
        });

        Ok(created)
    }

    /// a banker takes the application on
    pub fn accept(
        &mut self,
        application_id: ApplicationId,
        banker_id: BankerId,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApplication> {
        let mut application = self.repository.application(application_id)?;

        let assigned = self
            .repository
            .sub_applications(application_id)
            .iter()
            .any(|s| s.banker_id == banker_id);
        if !assigned {
            return Err(CalculatorError::invalid("banker_id", "is not assigned to this application"));
        }

        self.transition(&mut application, ApplicationStatus::Accepted, "accepted by banker", time_provider)?;
        application.accepted_by = Some(banker_id);
        self.repository.update_application(application.clone())?;

        Ok(application)
    }

    /// a banker asks the applicant for supporting documents
    pub fn request_documents(
        &mut self,
        sub_application_id: SubApplicationId,
        documents: Vec<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<SubApplication> {
        if documents.is_empty() {
            return Err(CalculatorError::invalid("documents", "at least one document must be requested"));
        }

        let mut sub_application = self.repository.sub_application(sub_application_id)?;
        let mut application = self.repository.application(sub_application.application_id)?;

        let requested = SubApplicationStatus::DocumentsRequested;
        if !sub_application.status.can_transition_to(requested) {
            return Err(CalculatorError::sub_application_transition(sub_application.status, requested));
        }

        if application.status != ApplicationStatus::DocumentsRequested {
            self.transition(
                &mut application,
                ApplicationStatus::DocumentsRequested,
                "documents requested by banker",
                time_provider,
            )?;
        }
        self.transition_sub(&mut sub_application, requested, time_provider)?;

        for document in &documents {
            if !sub_application.requested_documents.contains(document) {
                sub_application.requested_documents.push(document.clone());
            }
            if !application.outstanding_documents.contains(document) {
                application.outstanding_documents.push(document.clone());
            }
        }

        self.events.emit(Event::DocumentsRequested {
            application_id: application.id,
            sub_application_id,
            banker_id: sub_application.banker_id,
            documents,
            timestamp: time_provider.now(),
        });

        self.repository.update_sub_application(sub_application.clone())?;
        self.repository.update_application(application)?;

        Ok(sub_application)
    }

    /// the applicant supplies documents and the application goes back for review
    pub fn submit_documents(
        &mut self,
        application_id: ApplicationId,
        documents: Vec<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApplication> {
        if documents.is_empty() {
            return Err(CalculatorError::invalid("documents", "no documents supplied"));
        }

        let mut application = self.repository.application(application_id)?;
        self.transition(&mut application, ApplicationStatus::UnderReview, "documents supplied", time_provider)?;

        application.outstanding_documents.retain(|d| !documents.contains(d));
        application.submitted_documents.extend(documents.iter().cloned());

        self.events.emit(Event::DocumentsSubmitted {
            application_id,
            documents,
            timestamp: time_provider.now(),
        });

        self.repository.update_application(application.clone())?;
        Ok(application)
    }

    /// banker approval, which approves the application unless it is already decided
    ///
    /// Returns the loan when this approval originated it.
    pub fn approve_sub_application(
        &mut self,
        sub_application_id: SubApplicationId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Option<LoanRecord>> {
        let mut sub_application = self.repository.sub_application(sub_application_id)?;
        self.transition_sub(&mut sub_application, SubApplicationStatus::Approved, time_provider)?;
        self.repository.update_sub_application(sub_application.clone())?;

        let application = self.repository.application(sub_application.application_id)?;
        if application.status.is_terminal() {
            return Ok(None);
        }

        self.approve(application.id, time_provider).map(Some)
    }

    /// banker rejection, the application is rejected once every banker has rejected it
    pub fn reject_sub_application(
        &mut self,
        sub_application_id: SubApplicationId,
        reason: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApplication> {
        let mut sub_application = self.repository.sub_application(sub_application_id)?;
        self.transition_sub(&mut sub_application, SubApplicationStatus::Rejected, time_provider)?;
        sub_application.notes = Some(reason.to_string());
        self.repository.update_sub_application(sub_application.clone())?;

        let mut application = self.repository.application(sub_application.application_id)?;
        let all_rejected = self
            .repository
            .sub_applications(application.id)
            .iter()
            .all(|s| s.status == SubApplicationStatus::Rejected);

        if all_rejected && !application.status.is_terminal() {
            self.transition(&mut application, ApplicationStatus::Rejected, reason, time_provider)?;
            self.repository.update_application(application.clone())?;
        }

        Ok(application)
    }

    /// approve the application and originate its loan
    ///
    /// The loan is built before anything is recorded, so a failed
    /// origination leaves the application and event log untouched.
    pub fn approve(
        &mut self,
        application_id: ApplicationId,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanRecord> {
        let mut application = self.repository.application(application_id)?;

        let approved = ApplicationStatus::Approved;
        if !application.status.can_transition_to(approved) {
            return Err(CalculatorError::application_transition(application.status, approved));
        }

        let loan = self.originate(&application, time_provider)?;
        self.transition(&mut application, approved, "approved", time_provider)?;

        info!(
            "loan {} originated for application {}: {} at {} over {} months",
            loan.id, application.id, loan.principal, loan.annual_rate, loan.term_months
        );
        self.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            application_id: application.id,
            principal: loan.principal,
            annual_rate: loan.annual_rate,
            monthly_payment: loan.monthly_payment,
            term_months: loan.term_months,
            timestamp: loan.start_date,
        });

        self.repository.update_application(application)?;
        self.repository.insert_loan(loan.clone())?;

        Ok(loan)
    }

    /// decline the application outright
    pub fn reject(
        &mut self,
        application_id: ApplicationId,
        reason: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanApplication> {
        let mut application = self.repository.application(application_id)?;
        self.transition(&mut application, ApplicationStatus::Rejected, reason, time_provider)?;
        self.repository.update_application(application.clone())?;
        Ok(application)
    }

    fn originate(&self, application: &LoanApplication, time_provider: &SafeTimeProvider) -> Result<LoanRecord> {
        let annual_rate = self.lending.rate_for(&application.loan_type);
        let monthly_payment = base_payment(
            application.amount,
            periodic_rate(annual_rate.as_percentage()),
            application.term_months,
        )?;

        let start_date = time_provider.now();
        let end_date = start_date
            .checked_add_months(Months::new(application.term_months))
            .ok_or_else(|| CalculatorError::CalculationError {
                message: format!("loan end date out of range for {} months", application.term_months),
            })?;

        Ok(LoanRecord {
            id: Uuid::new_v4(),
            application_id: application.id,
            applicant_id: application.applicant_id,
            loan_type: application.loan_type.clone(),
            principal: application.amount,
            annual_rate,
            term_months: application.term_months,
            monthly_payment,
            start_date,
            end_date,
            status: LoanStatus::Active,
        })
    }

    fn transition(
        &mut self,
        application: &mut LoanApplication,
        next: ApplicationStatus,
        reason: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let current = application.status;
        if !current.can_transition_to(next) {
            warn!("application {} cannot move from {:?} to {:?}", application.id, current, next);
            return Err(CalculatorError::application_transition(current, next));
        }

        let now = time_provider.now();
        application.status = next;
        application.updated_at = now;

        info!("application {}: {:?} -> {:?}", application.id, current, next);
        self.events.emit(Event::StatusChanged {
            application_id: application.id,
            old_status: current,
            new_status: next,
            reason: reason.to_string(),
            timestamp: now,
        });

        Ok(())
    }

    fn transition_sub(
        &mut self,
        sub_application: &mut SubApplication,
        next: SubApplicationStatus,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let current = sub_application.status;
        if !current.can_transition_to(next) {
            warn!(
                "sub-application {} cannot move from {:?} to {:?}",
                sub_application.id, current, next
            );
            return Err(CalculatorError::sub_application_transition(current, next));
        }

        let now = time_provider.now();
        sub_application.status = next;
        sub_application.updated_at = now;

        self.events.emit(Event::SubApplicationStatusChanged {
            application_id: sub_application.application_id,
            sub_application_id: sub_application.id,
            banker_id: sub_application.banker_id,
            old_status: current,
            new_status: next,
            timestamp: now,
        });

        Ok(())
    }
}
