use thiserror::Error;
use uuid::Uuid;

use crate::types::{ApplicationStatus, SubApplicationStatus};

#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        field: String,
        reason: String,
    },

    #[error("property price required to cancel pmi at the ltv threshold")]
    MissingPropertyPrice,

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },

    #[error("application not found: {id}")]
    ApplicationNotFound {
        id: Uuid,
    },

    #[error("sub-application not found: {id}")]
    SubApplicationNotFound {
        id: Uuid,
    },

    #[error("no bankers assigned")]
    NoBankersAssigned,

    #[error("serialization error: {message}")]
    Serialization {
        message: String,
    },
}

impl CalculatorError {
    pub(crate) fn invalid(field: &str, reason: &str) -> Self {
        CalculatorError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn application_transition(from: ApplicationStatus, to: ApplicationStatus) -> Self {
        CalculatorError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }

    pub(crate) fn sub_application_transition(from: SubApplicationStatus, to: SubApplicationStatus) -> Self {
        CalculatorError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

impl From<serde_json::Error> for CalculatorError {
    fn from(e: serde_json::Error) -> Self {
        CalculatorError::Serialization {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
