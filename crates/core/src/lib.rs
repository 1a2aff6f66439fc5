pub mod audit;
pub mod directory;
pub mod domain;
pub mod errors;
pub mod ledger;

pub use audit::{
    AuditCategory, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use directory::{EmployeeDirectory, RosterError};
pub use domain::employee::{Employee, EmployeeId, Gender};
pub use domain::leave::{
    inclusive_day_count, parse_date, LeaveId, LeaveRequest, LeaveStatus, LeaveType,
};
pub use errors::{DomainError, ErrorKind};
pub use ledger::{LeaveBalance, LeaveLedger};
