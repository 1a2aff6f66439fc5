//! The leave ledger: the single stateful, concurrency-sensitive component.
//!
//! All lifecycle operations and balance reads take one exclusive section over
//! the shared record set, so the apply-time sequence (read remaining balance,
//! admit, insert) is atomic with respect to concurrent appliers. Remaining
//! balances are never cached: every read is a fold over the request history.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink};
use crate::directory::EmployeeDirectory;
use crate::domain::employee::{Employee, EmployeeId};
use crate::domain::leave::{inclusive_day_count, LeaveId, LeaveRequest, LeaveStatus, LeaveType};
use crate::errors::DomainError;

const ACTOR: &str = "leave-ledger";

/// Remaining balance per leave type for one employee, derived on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub employee_id: EmployeeId,
    pub remaining: BTreeMap<LeaveType, u32>,
}

#[derive(Debug, Default)]
struct LedgerState {
    /// Creation order; ids are assigned from `next_seq` and never reused.
    requests: Vec<LeaveRequest>,
    next_seq: u32,
}

impl LedgerState {
    fn find_mut(&mut self, id: &LeaveId) -> Option<&mut LeaveRequest> {
        self.requests.iter_mut().find(|request| &request.id == id)
    }

    /// Entitlement minus days consumed by this employee's Pending/Approved
    /// requests of the given type. Ineligible types have entitlement 0.
    fn remaining(&self, employee: &Employee, leave_type: LeaveType) -> u32 {
        let entitlement = if leave_type.eligible_for(employee.gender) {
            leave_type.entitlement_days()
        } else {
            0
        };
        let consumed: u32 = self
            .requests
            .iter()
            .filter(|request| {
                request.employee_id == employee.id
                    && request.leave_type == leave_type
                    && request.status.consumes_balance()
            })
            .map(|request| request.days)
            .sum();
        entitlement.saturating_sub(consumed)
    }
}

pub struct LeaveLedger {
    directory: Arc<EmployeeDirectory>,
    audit: Arc<dyn AuditSink>,
    state: Mutex<LedgerState>,
}

impl LeaveLedger {
    pub fn new(directory: Arc<EmployeeDirectory>, audit: Arc<dyn AuditSink>) -> Self {
        Self { directory, audit, state: Mutex::new(LedgerState::default()) }
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    fn state(&self) -> MutexGuard<'_, LedgerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Submit a new leave request. The balance check and the insert happen
    /// under one lock acquisition; an id is allocated only once every
    /// precondition has passed, so failed applies never consume an id.
    pub fn apply_leave(
        &self,
        employee_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> Result<LeaveRequest, DomainError> {
        let days = inclusive_day_count(start_date, end_date)?;
        let employee = self.directory.lookup(employee_id)?.clone();

        let mut state = self.state();
        match admit(&state, &employee, leave_type, days) {
            Ok(()) => {
                state.next_seq += 1;
                let now = Utc::now();
                let request = LeaveRequest {
                    id: LeaveId::from_seq(state.next_seq),
                    employee_id: employee.id.clone(),
                    leave_type,
                    start_date,
                    end_date,
                    days,
                    reason: reason.into(),
                    status: LeaveStatus::Pending,
                    rejection_reason: None,
                    created_at: now,
                    updated_at: now,
                };
                state.requests.push(request.clone());
                drop(state);

                self.audit.emit(
                    AuditEvent::new(
                        Some(request.id.clone()),
                        Some(employee.id.clone()),
                        "leave.applied",
                        AuditCategory::Lifecycle,
                        ACTOR,
                        AuditOutcome::Success,
                    )
                    .with_metadata("leave_type", leave_type.to_string())
                    .with_metadata("days", days.to_string()),
                );
                Ok(request)
            }
            Err(error) => {
                drop(state);
                self.emit_rejection(None, Some(employee.id), "apply", &error);
                Err(error)
            }
        }
    }

    /// Approve a pending request. No balance re-check: Pending already counts
    /// against remaining, so approval cannot overdraw.
    pub fn approve_leave(&self, leave_id: &str) -> Result<LeaveRequest, DomainError> {
        self.transition(leave_id, LeaveStatus::Approved, "approve", None)
    }

    /// Reject a pending request with a non-empty reason, releasing the
    /// reserved balance.
    pub fn reject_leave(
        &self,
        leave_id: &str,
        rejection_reason: &str,
    ) -> Result<LeaveRequest, DomainError> {
        let rejection_reason = rejection_reason.trim();
        if rejection_reason.is_empty() {
            let error = DomainError::EmptyRejectionReason;
            self.emit_rejection(Some(LeaveId::new(leave_id)), None, "reject", &error);
            return Err(error);
        }
        self.transition(
            leave_id,
            LeaveStatus::Rejected,
            "reject",
            Some(rejection_reason.to_owned()),
        )
    }

    /// Cancel a pending or approved request, releasing its balance.
    pub fn cancel_leave(&self, leave_id: &str) -> Result<LeaveRequest, DomainError> {
        self.transition(leave_id, LeaveStatus::Cancelled, "cancel", None)
    }

    fn transition(
        &self,
        leave_id: &str,
        next: LeaveStatus,
        operation: &str,
        rejection_reason: Option<String>,
    ) -> Result<LeaveRequest, DomainError> {
        let id = LeaveId::new(leave_id);
        let mut state = self.state();
        let result = match state.find_mut(&id) {
            None => Err(DomainError::LeaveNotFound { leave_id: id.to_string() }),
            Some(request) => {
                let previous = request.status;
                request.transition_to(next).map(|()| {
                    if let Some(reason) = rejection_reason {
                        request.rejection_reason = Some(reason);
                    }
                    (previous, request.clone())
                })
            }
        };
        drop(state);

        match result {
            Ok((previous, snapshot)) => {
                self.audit.emit(
                    AuditEvent::new(
                        Some(snapshot.id.clone()),
                        Some(snapshot.employee_id.clone()),
                        format!("leave.{}", snapshot.status),
                        AuditCategory::Lifecycle,
                        ACTOR,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", previous.to_string())
                    .with_metadata("to", snapshot.status.to_string()),
                );
                Ok(snapshot)
            }
            Err(error) => {
                self.emit_rejection(Some(id), None, operation, &error);
                Err(error)
            }
        }
    }

    fn emit_rejection(
        &self,
        leave_id: Option<LeaveId>,
        employee_id: Option<EmployeeId>,
        operation: &str,
        error: &DomainError,
    ) {
        self.audit.emit(
            AuditEvent::new(
                leave_id,
                employee_id,
                format!("leave.{operation}_rejected"),
                AuditCategory::Lifecycle,
                ACTOR,
                AuditOutcome::Rejected,
            )
            .with_metadata("error", error.to_string()),
        );
    }

    // ------------------------------------------------------------------
    // Query layer: read-only projections, always against committed state.
    // ------------------------------------------------------------------

    /// Remaining balance for one leave type.
    pub fn remaining(&self, employee_id: &str, leave_type: LeaveType) -> Result<u32, DomainError> {
        let employee = self.directory.lookup(employee_id)?.clone();
        Ok(self.state().remaining(&employee, leave_type))
    }

    /// Remaining balance across all five leave types.
    pub fn balances(&self, employee_id: &str) -> Result<LeaveBalance, DomainError> {
        let employee = self.directory.lookup(employee_id)?.clone();
        let state = self.state();
        let remaining = LeaveType::ALL
            .into_iter()
            .map(|leave_type| (leave_type, state.remaining(&employee, leave_type)))
            .collect();
        Ok(LeaveBalance { employee_id: employee.id, remaining })
    }

    /// Snapshot of a single request.
    pub fn leave_status(&self, leave_id: &str) -> Result<LeaveRequest, DomainError> {
        let id = LeaveId::new(leave_id);
        self.state()
            .requests
            .iter()
            .find(|request| request.id == id)
            .cloned()
            .ok_or(DomainError::LeaveNotFound { leave_id: id.to_string() })
    }

    /// All pending requests, in creation order.
    pub fn pending_leaves(&self) -> Vec<LeaveRequest> {
        self.state()
            .requests
            .iter()
            .filter(|request| request.status == LeaveStatus::Pending)
            .cloned()
            .collect()
    }

    /// Every request of one employee, in creation order.
    pub fn employee_leaves(&self, employee_id: &str) -> Result<Vec<LeaveRequest>, DomainError> {
        let employee = self.directory.lookup(employee_id)?.clone();
        Ok(self
            .state()
            .requests
            .iter()
            .filter(|request| request.employee_id == employee.id)
            .cloned()
            .collect())
    }

    /// Every request on record, in creation order.
    pub fn all_leaves(&self) -> Vec<LeaveRequest> {
        self.state().requests.clone()
    }
}

fn admit(
    state: &LedgerState,
    employee: &Employee,
    leave_type: LeaveType,
    days: u32,
) -> Result<(), DomainError> {
    if !leave_type.eligible_for(employee.gender) {
        return Err(DomainError::Ineligible { employee_id: employee.id.to_string(), leave_type });
    }
    let available = state.remaining(employee, leave_type);
    if days > available {
        return Err(DomainError::InsufficientBalance { leave_type, requested: days, available });
    }
    Ok(())
}
