use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a loan application
pub type ApplicationId = Uuid;

/// unique identifier for a banker's copy of an application
pub type SubApplicationId = Uuid;

/// unique identifier for an applicant profile
pub type ApplicantId = Uuid;

/// unique identifier for a banker profile
pub type BankerId = Uuid;

/// unique identifier for an originated loan
pub type LoanId = Uuid;

/// mortgage insurance handling once the balance falls below the ltv threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PmiPolicy {
    /// stop charging pmi from the first period the balance is at or below the threshold
    #[default]
    CancelAtThreshold,
    /// charge pmi for every period of the loan
    ChargeForLife,
}

/// non-fatal observations attached to a calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationWarning {
    /// zero interest rate, payment is a straight division of principal
    DegenerateRate,
    /// pmi configured but the ltv threshold is never reached within the term
    PmiNeverCancelled,
    /// extra payment configured but the loan still runs the full term
    ExtraPaymentHasNoEffect,
}

/// debt service ratio verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DsrStatus {
    Healthy,
    HighRisk,
}

/// who is disposing of a property, for gains tax purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisposerCategory {
    Citizen,
    NonCitizen,
    Company,
}

impl DisposerCategory {
    pub const ALL: [DisposerCategory; 3] = [
        DisposerCategory::Citizen,
        DisposerCategory::NonCitizen,
        DisposerCategory::Company,
    ];

    /// individuals receive the personal exemption, companies do not
    pub fn is_individual(&self) -> bool {
        !matches!(self, DisposerCategory::Company)
    }
}

/// how a refinanced loan is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RefinanceBasis {
    /// new loan for the original amount borrowed
    #[default]
    OriginalAmount,
    /// new loan for the balance still owed on the old loan
    OutstandingBalance,
}

/// product an applicant is asking for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Personal,
    Auto,
    Home,
    Education,
    Business,
    Other(String),
}

/// loan application status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// submitted, waiting for an admin to route it
    Pending,
    /// routed to one or more bankers
    Assigned,
    /// a banker has taken the application on
    Accepted,
    /// a banker needs supporting documents from the applicant
    DocumentsRequested,
    /// documents supplied, back with the banker
    UnderReview,
    /// approved, a loan has been originated
    Approved,
    /// declined
    Rejected,
}

impl ApplicationStatus {
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;

        matches!(
            (self, next),
            (Pending, Assigned)
                | (Assigned, Accepted)
                | (Assigned, DocumentsRequested)
                | (Assigned, Approved)
                | (Assigned, Rejected)
                | (Accepted, DocumentsRequested)
                | (Accepted, Approved)
                | (Accepted, Rejected)
                | (DocumentsRequested, UnderReview)
                | (DocumentsRequested, Approved)
                | (DocumentsRequested, Rejected)
                | (UnderReview, DocumentsRequested)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }
}

/// status of a single banker's copy of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubApplicationStatus {
    Assigned,
    DocumentsRequested,
    Approved,
    Rejected,
}

impl SubApplicationStatus {
    pub fn can_transition_to(&self, next: SubApplicationStatus) -> bool {
        use SubApplicationStatus::*;

        matches!(
            (self, next),
            (Assigned, DocumentsRequested)
                | (Assigned, Approved)
                | (Assigned, Rejected)
                | (DocumentsRequested, Approved)
                | (DocumentsRequested, Rejected)
        )
    }
}

/// originated loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_application_happy_path_transitions() {
        use ApplicationStatus::*;

        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(DocumentsRequested));
        assert!(DocumentsRequested.can_transition_to(UnderReview));
        assert!(UnderReview.can_transition_to(Approved));
    }

    #[test]
    fn test_terminal_states_are_closed() {
        use ApplicationStatus::*;

        for next in [Pending, Assigned, Accepted, DocumentsRequested, UnderReview, Approved, Rejected] {
            assert!(!Approved.can_transition_to(next));
            assert!(!Rejected.can_transition_to(next));
        }
        assert!(Approved.is_terminal());
        assert!(!UnderReview.is_terminal());
    }

    #[test]
    fn test_pending_cannot_skip_routing() {
        use ApplicationStatus::*;

        assert!(!Pending.can_transition_to(Approved));
        assert!(!Pending.can_transition_to(Accepted));
        assert!(!Assigned.can_transition_to(Pending));
    }

    #[test]
    fn test_sub_application_transitions() {
        use SubApplicationStatus::*;

        assert!(Assigned.can_transition_to(DocumentsRequested));
        assert!(DocumentsRequested.can_transition_to(Approved));
        assert!(!DocumentsRequested.can_transition_to(Assigned));
        assert!(!Approved.can_transition_to(Rejected));
    }

    #[test]
    fn test_disposer_categories() {
        assert!(DisposerCategory::Citizen.is_individual());
        assert!(DisposerCategory::NonCitizen.is_individual());
        assert!(!DisposerCategory::Company.is_individual());
    }
}
