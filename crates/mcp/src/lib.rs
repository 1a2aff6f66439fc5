//! Leavedesk MCP (Model Context Protocol) Server
//!
//! This crate exposes the leave lifecycle and balance-accounting engine to
//! AI agents over MCP: nine tools for directory lookup, balance queries, and
//! leave lifecycle operations, three read-only resources, and two static
//! guidance prompts.
//!
//! ## Architecture
//!
//! - `LeaveMcpServer`: the MCP protocol surface over a shared [`LeaveLedger`]
//! - `tools`: tool name registry, grouped by category
//! - `prompts`: the static policy and how-to documents
//!
//! [`LeaveLedger`]: leavedesk_core::LeaveLedger

mod prompts;
mod server;
mod tools;

pub use prompts::{prompt_description, prompt_text, APPLY_LEAVE_GUIDE, LEAVE_POLICY};
pub use server::{
    ApplyLeaveInput, ApproveLeaveInput, CancelLeaveInput, GetEmployeeInfoInput,
    GetLeaveBalanceInput, GetLeaveStatusInput, LeaveMcpServer, ListEmployeeLeavesInput,
    RejectLeaveInput, ALL_LEAVES_RESOURCE_URI, EMPLOYEES_RESOURCE_URI,
    PENDING_LEAVES_RESOURCE_URI,
};
pub use tools::*;

use leavedesk_core::{DomainError, ErrorKind};
use thiserror::Error;

/// Errors surfaced by MCP request handlers.
#[derive(Error, Debug)]
pub enum McpServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl McpServiceError {
    /// JSON-RPC error code embedded in failed tool payloads.
    pub fn error_code(&self) -> i32 {
        match self {
            McpServiceError::Domain(error) => match error.kind() {
                // Invalid params: the caller named something that does not
                // exist or sent malformed arguments.
                ErrorKind::NotFound | ErrorKind::Validation => -32602,
                // Invalid request: well-formed arguments the domain refuses.
                ErrorKind::Ineligible
                | ErrorKind::InsufficientBalance
                | ErrorKind::InvalidState => -32600,
            },
            McpServiceError::Serialization(_) => -32603,
        }
    }
}

/// Result type for MCP operations
pub type McpResult<T> = Result<T, McpServiceError>;
