use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{
    ApplicantId, ApplicationId, ApplicationStatus, BankerId, LoanId, LoanType, SubApplicationId,
    SubApplicationStatus,
};

/// all events emitted by the application workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // intake events
    ApplicationSubmitted {
        application_id: ApplicationId,
        applicant_id: ApplicantId,
        loan_type: LoanType,
        amount: Money,
        timestamp: DateTime<Utc>,
    },
    BankersAssigned {
        application_id: ApplicationId,
        banker_ids: Vec<BankerId>,
        timestamp: DateTime<Utc>,
    },

    // review events
    DocumentsRequested {
        application_id: ApplicationId,
        sub_application_id: SubApplicationId,
        banker_id: BankerId,
        documents: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    DocumentsSubmitted {
        application_id: ApplicationId,
        documents: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    SubApplicationStatusChanged {
        application_id: ApplicationId,
        sub_application_id: SubApplicationId,
        banker_id: BankerId,
        old_status: SubApplicationStatus,
        new_status: SubApplicationStatus,
        timestamp: DateTime<Utc>,
    },

    // status change events
    StatusChanged {
        application_id: ApplicationId,
        old_status: ApplicationStatus,
        new_status: ApplicationStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    // origination events
    LoanOriginated {
        loan_id: LoanId,
        application_id: ApplicationId,
        principal: Money,
        annual_rate: Rate,
        monthly_payment: Money,
        term_months: u32,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn application_id(&self) -> ApplicationId {
        match self {
            Event::ApplicationSubmitted { application_id, .. }
            | Event::BankersAssigned { application_id, .. }
            | Event::DocumentsRequested { application_id, .. }
            | Event::DocumentsSubmitted { application_id, .. }
            | Event::SubApplicationStatusChanged { application_id, .. }
            | Event::StatusChanged { application_id, .. }
            | Event::LoanOriginated { application_id, .. } => *application_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// history of a single application in emission order
    pub fn for_application(&self, application_id: ApplicationId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.application_id() == application_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_log::test;
    use uuid::Uuid;

    #[test]
    fn test_history_filtered_by_application() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut store = EventStore::new();
        store.emit(Event::DocumentsSubmitted {
            application_id: first,
            documents: vec!["payslip.pdf".to_string()],
            timestamp: now,
        });
        store.emit(Event::StatusChanged {
            application_id: second,
            old_status: ApplicationStatus::Pending,
            new_status: ApplicationStatus::Assigned,
            reason: "routed".to_string(),
            timestamp: now,
        });

        assert_eq!(store.len(), 2);
        assert_eq!(store.for_application(first).len(), 1);
        assert_eq!(store.for_application(second)[0].application_id(), second);

        let drained = store.take_events();
        assert_eq!(drained.len(), 2);
        assert!(store.is_empty());
    }
}
