use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::leave::{LeaveId, LeaveStatus, LeaveType};

/// Every ledger and directory failure. Variants carry the offending id, the
/// attempted transition, or the computed balance so callers can explain the
/// failure without re-querying.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("employee '{employee_id}' not found")]
    EmployeeNotFound { employee_id: String },
    #[error("leave request '{leave_id}' not found")]
    LeaveNotFound { leave_id: String },
    #[error("name '{query}' matches multiple employees: {}", .matches.join(", "))]
    AmbiguousEmployeeName { query: String, matches: Vec<String> },
    #[error("no employee matches name '{query}'")]
    NoEmployeeMatchesName { query: String },
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("malformed date '{value}': expected YYYY-MM-DD")]
    MalformedDate { value: String },
    #[error("unknown leave type '{value}': expected casual, sick, annual, maternity, or paternity")]
    UnknownLeaveType { value: String },
    #[error("rejection reason must not be empty")]
    EmptyRejectionReason,
    #[error("employee '{employee_id}' is not eligible for {leave_type} leave")]
    Ineligible { employee_id: String, leave_type: LeaveType },
    #[error(
        "insufficient {leave_type} balance: requested {requested} day(s), available {available}"
    )]
    InsufficientBalance { leave_type: LeaveType, requested: u32, available: u32 },
    #[error("leave '{leave_id}' is {status} and cannot transition to {attempted}")]
    InvalidState { leave_id: LeaveId, status: LeaveStatus, attempted: LeaveStatus },
}

/// Coarse classification used by protocol adapters for code mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Ineligible,
    InsufficientBalance,
    InvalidState,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::Ineligible => "ineligible",
            ErrorKind::InsufficientBalance => "insufficient_balance",
            ErrorKind::InvalidState => "invalid_state",
        }
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound { .. }
            | Self::LeaveNotFound { .. }
            | Self::AmbiguousEmployeeName { .. }
            | Self::NoEmployeeMatchesName { .. } => ErrorKind::NotFound,
            Self::InvalidDateRange { .. }
            | Self::MalformedDate { .. }
            | Self::UnknownLeaveType { .. }
            | Self::EmptyRejectionReason => ErrorKind::Validation,
            Self::Ineligible { .. } => ErrorKind::Ineligible,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::leave::{LeaveId, LeaveStatus, LeaveType};
    use crate::errors::{DomainError, ErrorKind};

    #[test]
    fn ambiguous_name_classifies_as_not_found() {
        let error = DomainError::AmbiguousEmployeeName {
            query: "a".to_owned(),
            matches: vec!["Alice Johnson (E001)".to_owned(), "Bob Smith (E002)".to_owned()],
        };
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.to_string().contains("Alice Johnson"));
    }

    #[test]
    fn insufficient_balance_carries_computed_context() {
        let error = DomainError::InsufficientBalance {
            leave_type: LeaveType::Casual,
            requested: 15,
            available: 10,
        };
        assert_eq!(error.kind(), ErrorKind::InsufficientBalance);
        assert_eq!(
            error.to_string(),
            "insufficient casual balance: requested 15 day(s), available 10"
        );
    }

    #[test]
    fn invalid_state_names_the_attempted_transition() {
        let error = DomainError::InvalidState {
            leave_id: LeaveId::from_seq(3),
            status: LeaveStatus::Rejected,
            attempted: LeaveStatus::Approved,
        };
        assert_eq!(error.kind(), ErrorKind::InvalidState);
        assert_eq!(error.to_string(), "leave 'L003' is rejected and cannot transition to approved");
    }

    #[test]
    fn validation_failures_classify_together() {
        assert_eq!(DomainError::EmptyRejectionReason.kind(), ErrorKind::Validation);
        assert_eq!(
            DomainError::MalformedDate { value: "soon".to_owned() }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            DomainError::UnknownLeaveType { value: "gardening".to_owned() }.kind(),
            ErrorKind::Validation
        );
    }
}
