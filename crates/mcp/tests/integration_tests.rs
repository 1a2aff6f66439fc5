//! Integration tests for the Leavedesk MCP server
//!
//! These exercise the tool surface end to end against the built-in sample
//! roster: tool outputs, domain refusals as failed tool results, resource
//! snapshots, and the server handshake metadata.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::ServerHandler;
use serde_json::Value;

use leavedesk_mcp::{
    ApplyLeaveInput, ApproveLeaveInput, CancelLeaveInput, GetEmployeeInfoInput,
    GetLeaveBalanceInput, GetLeaveStatusInput, LeaveMcpServer, ListEmployeeLeavesInput,
    RejectLeaveInput, ALL_LEAVES_RESOURCE_URI, EMPLOYEES_RESOURCE_URI,
    PENDING_LEAVES_RESOURCE_URI,
};

fn first_text(result: &CallToolResult) -> String {
    let value = serde_json::to_value(result).expect("serialize tool result");
    value["content"][0]["text"].as_str().expect("text content").to_owned()
}

fn payload(result: &CallToolResult) -> Value {
    serde_json::from_str(&first_text(result)).expect("json payload")
}

fn is_failure(result: &CallToolResult) -> bool {
    let value = serde_json::to_value(result).expect("serialize tool result");
    value["isError"].as_bool().unwrap_or(false)
}

async fn apply(
    server: &LeaveMcpServer,
    employee_id: &str,
    leave_type: &str,
    start: &str,
    end: &str,
) -> CallToolResult {
    server
        .apply_leave(Parameters(ApplyLeaveInput {
            employee_id: employee_id.to_owned(),
            leave_type: leave_type.to_owned(),
            start_date: start.to_owned(),
            end_date: end.to_owned(),
            reason: "integration test".to_owned(),
        }))
        .await
        .expect("tool call")
}

#[tokio::test]
async fn server_info_advertises_the_full_surface() {
    let server = LeaveMcpServer::with_seeded_directory();
    let info = server.get_info();

    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());
    assert!(info.capabilities.prompts.is_some());
    assert!(info.instructions.unwrap_or_default().contains("Leave Management"));
}

#[tokio::test]
async fn apply_approve_cancel_round_trips_the_balance() {
    let server = LeaveMcpServer::with_seeded_directory();

    let applied = apply(&server, "E001", "sick", "2026-03-10", "2026-03-11").await;
    assert!(!is_failure(&applied));
    let applied = payload(&applied);
    assert_eq!(applied["leave"]["id"], "L001");
    assert_eq!(applied["leave"]["status"], "pending");
    assert_eq!(applied["leave"]["days"], 2);
    assert_eq!(applied["remaining_balance"], 10);

    let approved = server
        .approve_leave(Parameters(ApproveLeaveInput { leave_id: "L001".to_owned() }))
        .await
        .expect("tool call");
    let approved = payload(&approved);
    assert_eq!(approved["leave"]["status"], "approved");
    assert_eq!(approved["remaining_balance"], 10);

    let cancelled = server
        .cancel_leave(Parameters(CancelLeaveInput { leave_id: "L001".to_owned() }))
        .await
        .expect("tool call");
    let cancelled = payload(&cancelled);
    assert_eq!(cancelled["leave"]["status"], "cancelled");
    assert_eq!(cancelled["restored_approved_days"], true);
    assert_eq!(cancelled["remaining_balance"], 12);
}

#[tokio::test]
async fn overdraw_is_a_failed_tool_result_with_no_side_effects() {
    let server = LeaveMcpServer::with_seeded_directory();

    let result = apply(&server, "E001", "casual", "2026-06-01", "2026-06-15").await;
    assert!(is_failure(&result));
    let failure = payload(&result);
    assert_eq!(failure["kind"], "insufficient_balance");
    assert_eq!(failure["code"], -32600);
    assert!(failure["error"].as_str().unwrap_or_default().contains("requested 15 day(s)"));

    let listing = server
        .list_employee_leaves(Parameters(ListEmployeeLeavesInput {
            employee_id: "E001".to_owned(),
        }))
        .await
        .expect("tool call");
    assert_eq!(payload(&listing)["count"], 0);
}

#[tokio::test]
async fn rejection_requires_a_reason() {
    let server = LeaveMcpServer::with_seeded_directory();
    apply(&server, "E002", "annual", "2026-07-01", "2026-07-05").await;

    let rejected = server
        .reject_leave(Parameters(RejectLeaveInput {
            leave_id: "L001".to_owned(),
            rejection_reason: "  ".to_owned(),
        }))
        .await
        .expect("tool call");
    assert!(is_failure(&rejected));
    assert_eq!(payload(&rejected)["kind"], "validation");

    let status = server
        .get_leave_status(Parameters(GetLeaveStatusInput { leave_id: "L001".to_owned() }))
        .await
        .expect("tool call");
    assert_eq!(payload(&status)["status"], "pending");

    let rejected = server
        .reject_leave(Parameters(RejectLeaveInput {
            leave_id: "L001".to_owned(),
            rejection_reason: "Peak campaign season".to_owned(),
        }))
        .await
        .expect("tool call");
    assert!(!is_failure(&rejected));
    assert_eq!(payload(&rejected)["leave"]["rejection_reason"], "Peak campaign season");
}

#[tokio::test]
async fn employee_lookup_resolves_ids_and_name_prefixes() {
    let server = LeaveMcpServer::with_seeded_directory();

    let by_id = server
        .get_employee_info(Parameters(GetEmployeeInfoInput {
            employee_id: Some("e003".to_owned()),
            name: None,
        }))
        .await
        .expect("tool call");
    assert_eq!(payload(&by_id)["name"], "Carol Williams");

    let by_prefix = server
        .get_employee_info(Parameters(GetEmployeeInfoInput {
            employee_id: None,
            name: Some("bob".to_owned()),
        }))
        .await
        .expect("tool call");
    assert_eq!(payload(&by_prefix)["id"], "E002");

    let missing_args = server
        .get_employee_info(Parameters(GetEmployeeInfoInput { employee_id: None, name: None }))
        .await;
    assert!(missing_args.is_err());
}

#[tokio::test]
async fn balance_report_covers_all_types_or_one() {
    let server = LeaveMcpServer::with_seeded_directory();

    let all = server
        .get_leave_balance(Parameters(GetLeaveBalanceInput {
            employee_id: "E005".to_owned(),
            leave_type: None,
        }))
        .await
        .expect("tool call");
    let all = payload(&all);
    assert_eq!(all["employee_name"], "Eva Martinez");
    assert_eq!(all["remaining"]["maternity"], 90);
    assert_eq!(all["remaining"]["paternity"], 0);

    let single = server
        .get_leave_balance(Parameters(GetLeaveBalanceInput {
            employee_id: "E005".to_owned(),
            leave_type: Some("sick".to_owned()),
        }))
        .await
        .expect("tool call");
    let single = payload(&single);
    assert_eq!(single["remaining"]["sick"], 12);
    assert!(single["remaining"]["casual"].is_null());
}

#[tokio::test]
async fn unknown_ids_come_back_as_not_found_failures() {
    let server = LeaveMcpServer::with_seeded_directory();

    let status = server
        .get_leave_status(Parameters(GetLeaveStatusInput { leave_id: "L042".to_owned() }))
        .await
        .expect("tool call");
    assert!(is_failure(&status));
    assert_eq!(payload(&status)["kind"], "not_found");

    let balance = server
        .get_leave_balance(Parameters(GetLeaveBalanceInput {
            employee_id: "E999".to_owned(),
            leave_type: None,
        }))
        .await
        .expect("tool call");
    assert!(is_failure(&balance));
    assert_eq!(payload(&balance)["code"], -32602);
}

#[tokio::test]
async fn resources_project_committed_ledger_state() {
    let server = LeaveMcpServer::with_seeded_directory();

    let employees: Value = serde_json::from_str(
        &server.resource_snapshot(EMPLOYEES_RESOURCE_URI).expect("employees resource"),
    )
    .expect("json");
    assert_eq!(employees.as_array().map(Vec::len), Some(5));

    apply(&server, "E001", "casual", "2026-04-01", "2026-04-02").await;
    apply(&server, "E002", "sick", "2026-04-03", "2026-04-03").await;
    server
        .approve_leave(Parameters(ApproveLeaveInput { leave_id: "L001".to_owned() }))
        .await
        .expect("tool call");

    let all: Value = serde_json::from_str(
        &server.resource_snapshot(ALL_LEAVES_RESOURCE_URI).expect("all leaves resource"),
    )
    .expect("json");
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let pending: Value = serde_json::from_str(
        &server.resource_snapshot(PENDING_LEAVES_RESOURCE_URI).expect("pending resource"),
    )
    .expect("json");
    assert_eq!(pending.as_array().map(Vec::len), Some(1));
    assert_eq!(pending[0]["id"], "L002");

    assert!(server.resource_snapshot("leaves://archived").is_err());
}
