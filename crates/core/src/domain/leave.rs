use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::employee::{EmployeeId, Gender};
use crate::errors::DomainError;

/// Leave request identifiers: `L001`, `L002`, ... Assigned monotonically and
/// never reused.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeaveId(pub String);

impl LeaveId {
    pub fn from_seq(seq: u32) -> Self {
        Self(format!("L{seq:03}"))
    }

    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Casual,
    Sick,
    Annual,
    Maternity,
    Paternity,
}

impl LeaveType {
    pub const ALL: [LeaveType; 5] = [
        LeaveType::Casual,
        LeaveType::Sick,
        LeaveType::Annual,
        LeaveType::Maternity,
        LeaveType::Paternity,
    ];

    /// Annual entitlement in days. Process-wide constants, not per-employee
    /// overrides.
    pub fn entitlement_days(self) -> u32 {
        match self {
            LeaveType::Casual => 10,
            LeaveType::Sick => 12,
            LeaveType::Annual => 20,
            LeaveType::Maternity => 90,
            LeaveType::Paternity => 5,
        }
    }

    pub fn eligible_for(self, gender: Gender) -> bool {
        match self {
            LeaveType::Maternity => gender == Gender::Female,
            LeaveType::Paternity => gender == Gender::Male,
            _ => true,
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveType::Casual => "casual",
            LeaveType::Sick => "sick",
            LeaveType::Annual => "annual",
            LeaveType::Maternity => "maternity",
            LeaveType::Paternity => "paternity",
        };
        f.write_str(label)
    }
}

impl FromStr for LeaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(LeaveType::Casual),
            "sick" => Ok(LeaveType::Sick),
            "annual" => Ok(LeaveType::Annual),
            "maternity" => Ok(LeaveType::Maternity),
            "paternity" => Ok(LeaveType::Paternity),
            _ => Err(DomainError::UnknownLeaveType { value: s.to_owned() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::Rejected | LeaveStatus::Cancelled)
    }

    /// Pending and Approved requests count against the remaining balance.
    pub fn consumes_balance(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub employee_id: EmployeeId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count between start and end.
    pub days: u32,
    pub reason: String,
    pub status: LeaveStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaveRequest {
    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        matches!(
            (self.status, next),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
                | (LeaveStatus::Pending, LeaveStatus::Cancelled)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }

    pub fn transition_to(&mut self, next: LeaveStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            self.updated_at = Utc::now();
            return Ok(());
        }

        Err(DomainError::InvalidState {
            leave_id: self.id.clone(),
            status: self.status,
            attempted: next,
        })
    }
}

/// Inclusive day count of a calendar date range.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> Result<u32, DomainError> {
    if end < start {
        return Err(DomainError::InvalidDateRange { start, end });
    }
    let days = (end - start).num_days() + 1;
    Ok(u32::try_from(days).unwrap_or(u32::MAX))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::MalformedDate { value: value.to_owned() })
}
