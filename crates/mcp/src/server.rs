//! MCP Server Implementation
//!
//! Implements the Model Context Protocol server for Leavedesk: nine tools
//! over the leave ledger, three read-only resources, and two static prompts.

use std::collections::BTreeMap;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema},
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData, RoleServer, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use leavedesk_core::{
    parse_date, DomainError, Employee, EmployeeDirectory, LeaveLedger, LeaveRequest, LeaveType,
    TracingAuditSink,
};

use crate::prompts;
use crate::McpServiceError;

/// Resource URIs, mirroring the directory / full set / pending projections.
pub const EMPLOYEES_RESOURCE_URI: &str = "employees://list";
pub const ALL_LEAVES_RESOURCE_URI: &str = "leaves://all";
pub const PENDING_LEAVES_RESOURCE_URI: &str = "leaves://pending";

const SERVER_INSTRUCTIONS: &str = "You are an HR Leave Management Agent. You help employees \
     apply for leaves, check balances, and help managers approve or reject leave requests. \
     Always be polite and professional. Use the available tools to fetch real data before \
     giving answers.";

/// Main MCP server for Leavedesk
#[derive(Clone)]
pub struct LeaveMcpServer {
    ledger: Arc<LeaveLedger>,
    tool_router: ToolRouter<Self>,
}

impl LeaveMcpServer {
    /// Create a new MCP server instance over a shared ledger
    pub fn new(ledger: Arc<LeaveLedger>) -> Self {
        info!("Initializing Leavedesk MCP Server");
        Self { ledger, tool_router: Self::tool_router() }
    }

    /// Create a server over the built-in sample roster with an empty ledger.
    pub fn with_seeded_directory() -> Self {
        let directory = Arc::new(EmployeeDirectory::seeded());
        Self::new(Arc::new(LeaveLedger::new(directory, Arc::new(TracingAuditSink))))
    }

    pub fn ledger(&self) -> &LeaveLedger {
        &self.ledger
    }

    /// Run the server with stdio transport
    pub async fn run_stdio(self) -> anyhow::Result<()> {
        use tokio::io::{stdin, stdout};

        info!("Starting MCP server with stdio transport");

        let service = self.serve((stdin(), stdout())).await?;

        // Wait for shutdown
        let _quit = service.waiting().await?;

        info!("MCP server shutdown complete");
        Ok(())
    }

    /// JSON snapshot behind a resource URI.
    pub fn resource_snapshot(&self, uri: &str) -> Result<String, ErrorData> {
        match uri {
            EMPLOYEES_RESOURCE_URI => to_pretty_json(&self.ledger.directory().all()),
            ALL_LEAVES_RESOURCE_URI => to_pretty_json(&self.ledger.all_leaves()),
            PENDING_LEAVES_RESOURCE_URI => to_pretty_json(&self.ledger.pending_leaves()),
            _ => Err(ErrorData::resource_not_found(
                "unknown resource",
                Some(serde_json::json!({ "uri": uri })),
            )),
        }
    }

    fn resolve_employee(
        &self,
        employee_id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Employee, DomainError> {
        let directory = self.ledger.directory();
        if let Some(id) = employee_id.filter(|id| !id.trim().is_empty()) {
            return directory.lookup(id).cloned();
        }
        let name = name.unwrap_or_default();
        directory.lookup_by_name(name).cloned()
    }
}

// ============================================================================
// Tool inputs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEmployeeInfoInput {
    #[schemars(description = "The employee's ID (e.g. 'E001'). Preferred over name.")]
    #[serde(default)]
    pub employee_id: Option<String>,

    #[schemars(description = "Full name or name prefix of the employee (case-insensitive)")]
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetLeaveBalanceInput {
    #[schemars(description = "The employee's ID (e.g. 'E001')")]
    pub employee_id: String,

    #[schemars(
        description = "Restrict the report to one leave type: casual, sick, annual, maternity, or paternity"
    )]
    #[serde(default)]
    pub leave_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApplyLeaveInput {
    #[schemars(description = "The employee's ID (e.g. 'E001')")]
    pub employee_id: String,

    #[schemars(description = "Type of leave: casual, sick, annual, maternity, or paternity")]
    pub leave_type: String,

    #[schemars(description = "Start date in YYYY-MM-DD format (e.g. '2026-03-10')")]
    pub start_date: String,

    #[schemars(description = "End date in YYYY-MM-DD format (e.g. '2026-03-12')")]
    pub end_date: String,

    #[schemars(description = "Reason for taking the leave")]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetLeaveStatusInput {
    #[schemars(description = "The leave request ID (e.g. 'L001')")]
    pub leave_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListEmployeeLeavesInput {
    #[schemars(description = "The employee's ID (e.g. 'E001')")]
    pub employee_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApproveLeaveInput {
    #[schemars(description = "The leave request ID to approve (e.g. 'L001')")]
    pub leave_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RejectLeaveInput {
    #[schemars(description = "The leave request ID to reject (e.g. 'L001')")]
    pub leave_id: String,

    #[schemars(description = "The reason for rejecting the leave request")]
    pub rejection_reason: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CancelLeaveInput {
    #[schemars(description = "The leave request ID to cancel (e.g. 'L001')")]
    pub leave_id: String,
}

// ============================================================================
// Tool outputs
// ============================================================================

#[derive(Debug, Serialize)]
struct BalanceReport {
    employee_id: String,
    employee_name: String,
    remaining: BTreeMap<LeaveType, u32>,
}

#[derive(Debug, Serialize)]
struct AppliedLeave {
    message: &'static str,
    leave: LeaveRequest,
    remaining_balance: u32,
}

#[derive(Debug, Serialize)]
struct DecidedLeave {
    message: &'static str,
    leave: LeaveRequest,
    remaining_balance: u32,
}

#[derive(Debug, Serialize)]
struct CancelledLeave {
    message: &'static str,
    leave: LeaveRequest,
    /// True when an approved request was cancelled and its days returned to
    /// the available balance.
    restored_approved_days: bool,
    remaining_balance: u32,
}

#[derive(Debug, Serialize)]
struct LeaveListing {
    count: usize,
    leaves: Vec<LeaveRequest>,
}

#[derive(Debug, Serialize)]
struct EmployeeLeaveListing {
    employee_id: String,
    employee_name: String,
    count: usize,
    leaves: Vec<LeaveRequest>,
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl LeaveMcpServer {
    /// Look up an employee by id or name
    #[tool(
        name = "get_employee_info",
        description = "Fetch information about an employee by their employee ID or name"
    )]
    pub async fn get_employee_info(
        &self,
        Parameters(input): Parameters<GetEmployeeInfoInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(employee_id = ?input.employee_id, name = ?input.name, "get_employee_info called");

        let id_given = input.employee_id.as_deref().is_some_and(|id| !id.trim().is_empty());
        let name_given = input.name.as_deref().is_some_and(|name| !name.trim().is_empty());
        if !id_given && !name_given {
            return Err(ErrorData::invalid_params(
                "provide either an employee_id or a name to search",
                None,
            ));
        }

        match self.resolve_employee(input.employee_id.as_deref(), input.name.as_deref()) {
            Ok(employee) => json_result(&employee),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Remaining balance, broken down by leave type
    #[tool(
        name = "get_leave_balance",
        description = "Get the remaining leave balance for an employee, broken down by leave type"
    )]
    pub async fn get_leave_balance(
        &self,
        Parameters(input): Parameters<GetLeaveBalanceInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(employee_id = %input.employee_id, "get_leave_balance called");

        let report = (|| {
            let employee = self.ledger.directory().lookup(&input.employee_id)?.clone();
            let balances = self.ledger.balances(&input.employee_id)?;
            let remaining = match input.leave_type.as_deref() {
                None => balances.remaining,
                Some(raw) => {
                    let leave_type: LeaveType = raw.parse()?;
                    balances
                        .remaining
                        .into_iter()
                        .filter(|(candidate, _)| *candidate == leave_type)
                        .collect()
                }
            };
            Ok(BalanceReport {
                employee_id: employee.id.to_string(),
                employee_name: employee.name,
                remaining,
            })
        })();

        match report {
            Ok(report) => json_result(&report),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Submit a new leave request
    #[tool(
        name = "apply_leave",
        description = "Submit a new leave request on behalf of an employee"
    )]
    pub async fn apply_leave(
        &self,
        Parameters(input): Parameters<ApplyLeaveInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(employee_id = %input.employee_id, leave_type = %input.leave_type, "apply_leave called");

        let applied = (|| {
            let leave_type: LeaveType = input.leave_type.parse()?;
            let start_date = parse_date(&input.start_date)?;
            let end_date = parse_date(&input.end_date)?;
            let leave = self.ledger.apply_leave(
                &input.employee_id,
                leave_type,
                start_date,
                end_date,
                input.reason.clone(),
            )?;
            let remaining_balance = self.ledger.remaining(&input.employee_id, leave_type)?;
            Ok(AppliedLeave {
                message: "Leave request submitted successfully",
                leave,
                remaining_balance,
            })
        })();

        match applied {
            Ok(applied) => json_result(&applied),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Status and details of one request
    #[tool(
        name = "get_leave_status",
        description = "Check the current status and details of a specific leave request"
    )]
    pub async fn get_leave_status(
        &self,
        Parameters(input): Parameters<GetLeaveStatusInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(leave_id = %input.leave_id, "get_leave_status called");

        match self.ledger.leave_status(&input.leave_id) {
            Ok(leave) => json_result(&leave),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// All pending requests, for managers
    #[tool(
        name = "list_pending_leaves",
        description = "List all currently pending leave requests across the organization"
    )]
    pub async fn list_pending_leaves(&self) -> Result<CallToolResult, ErrorData> {
        debug!("list_pending_leaves called");

        let leaves = self.ledger.pending_leaves();
        json_result(&LeaveListing { count: leaves.len(), leaves })
    }

    /// Full history for one employee
    #[tool(
        name = "list_employee_leaves",
        description = "List all leave requests (of any status) submitted by a specific employee"
    )]
    pub async fn list_employee_leaves(
        &self,
        Parameters(input): Parameters<ListEmployeeLeavesInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(employee_id = %input.employee_id, "list_employee_leaves called");

        let listing = (|| {
            let employee = self.ledger.directory().lookup(&input.employee_id)?.clone();
            let leaves = self.ledger.employee_leaves(&input.employee_id)?;
            Ok(EmployeeLeaveListing {
                employee_id: employee.id.to_string(),
                employee_name: employee.name,
                count: leaves.len(),
                leaves,
            })
        })();

        match listing {
            Ok(listing) => json_result(&listing),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Approve a pending request
    #[tool(name = "approve_leave", description = "Approve a pending leave request")]
    pub async fn approve_leave(
        &self,
        Parameters(input): Parameters<ApproveLeaveInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(leave_id = %input.leave_id, "approve_leave called");

        let decided = (|| {
            let leave = self.ledger.approve_leave(&input.leave_id)?;
            let remaining_balance =
                self.ledger.remaining(leave.employee_id.as_str(), leave.leave_type)?;
            Ok(DecidedLeave { message: "Leave request approved", leave, remaining_balance })
        })();

        match decided {
            Ok(decided) => json_result(&decided),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Reject a pending request with a reason
    #[tool(name = "reject_leave", description = "Reject a pending leave request with a reason")]
    pub async fn reject_leave(
        &self,
        Parameters(input): Parameters<RejectLeaveInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(leave_id = %input.leave_id, "reject_leave called");

        let decided = (|| {
            let leave = self.ledger.reject_leave(&input.leave_id, &input.rejection_reason)?;
            let remaining_balance =
                self.ledger.remaining(leave.employee_id.as_str(), leave.leave_type)?;
            Ok(DecidedLeave { message: "Leave request rejected", leave, remaining_balance })
        })();

        match decided {
            Ok(decided) => json_result(&decided),
            Err(error) => Ok(domain_failure(&error)),
        }
    }

    /// Cancel a pending or approved request
    #[tool(
        name = "cancel_leave",
        description = "Cancel a pending or approved leave request; approved days return to the balance"
    )]
    pub async fn cancel_leave(
        &self,
        Parameters(input): Parameters<CancelLeaveInput>,
    ) -> Result<CallToolResult, ErrorData> {
        debug!(leave_id = %input.leave_id, "cancel_leave called");

        let was_approved = self
            .ledger
            .leave_status(&input.leave_id)
            .map(|leave| leave.status == leavedesk_core::LeaveStatus::Approved)
            .unwrap_or(false);

        let cancelled = (|| {
            let leave = self.ledger.cancel_leave(&input.leave_id)?;
            let remaining_balance =
                self.ledger.remaining(leave.employee_id.as_str(), leave.leave_type)?;
            Ok(CancelledLeave {
                message: "Leave request cancelled",
                leave,
                restored_approved_days: was_approved,
                remaining_balance,
            })
        })();

        match cancelled {
            Ok(cancelled) => json_result(&cancelled),
            Err(error) => Ok(domain_failure(&error)),
        }
    }
}

// ============================================================================
// Protocol handler: server info, resources, prompts
// ============================================================================

#[tool_handler]
impl ServerHandler for LeaveMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult {
            resources: vec![
                resource(EMPLOYEES_RESOURCE_URI, "employees", "The full employee directory"),
                resource(ALL_LEAVES_RESOURCE_URI, "all-leaves", "All leave requests on record"),
                resource(
                    PENDING_LEAVES_RESOURCE_URI,
                    "pending-leaves",
                    "Leave requests awaiting a decision",
                ),
            ],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        debug!(uri = %request.uri, "read_resource called");

        let json = self.resource_snapshot(&request.uri)?;
        Ok(ReadResourceResult { contents: vec![ResourceContents::text(json, request.uri)] })
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, ErrorData> {
        let prompts = prompts::PROMPT_NAMES
            .iter()
            .map(|name| Prompt::new(*name, prompts::prompt_description(name), None))
            .collect();
        Ok(ListPromptsResult { prompts, next_cursor: None })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, ErrorData> {
        debug!(name = %request.name, "get_prompt called");

        let text = prompts::prompt_text(&request.name).ok_or_else(|| {
            ErrorData::invalid_params(
                "unknown prompt",
                Some(serde_json::json!({ "name": request.name.clone() })),
            )
        })?;

        Ok(GetPromptResult {
            description: prompts::prompt_description(&request.name).map(str::to_owned),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, ErrorData> {
    let content = to_pretty_json(value)?;
    Ok(CallToolResult::success(vec![Content::text(content)]))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ErrorData> {
    serde_json::to_string_pretty(value)
        .map_err(|error| ErrorData::internal_error(error.to_string(), None))
}

/// Domain refusals come back as failed tool results rather than protocol
/// errors, so the calling agent can read and explain them.
fn domain_failure(error: &DomainError) -> CallToolResult {
    let code = McpServiceError::from(error.clone()).error_code();
    let payload = serde_json::json!({
        "error": error.to_string(),
        "kind": error.kind().as_str(),
        "code": code,
    });
    CallToolResult::error(vec![Content::text(payload.to_string())])
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name);
    raw.description = Some(description.to_owned());
    raw.mime_type = Some("application/json".to_owned());
    raw.no_annotation()
}
