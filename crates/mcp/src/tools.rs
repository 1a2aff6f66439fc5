//! MCP Tools for Leavedesk
//!
//! This module organizes the MCP tools into categories:
//! - Directory: employee lookup and balance queries
//! - Lifecycle: leave submission and decisions
//! - Query: status lookups and listings

/// Directory tools category
pub struct DirectoryTools;

/// Lifecycle tools category
pub struct LifecycleTools;

/// Query tools category
pub struct QueryTools;

/// Tool category trait
pub trait ToolCategory {
    /// Category name
    fn category_name() -> &'static str
    where
        Self: Sized;
    /// List of tool names in this category
    fn tool_names() -> &'static [&'static str]
    where
        Self: Sized;
}

impl ToolCategory for DirectoryTools {
    fn category_name() -> &'static str {
        "directory"
    }
    fn tool_names() -> &'static [&'static str] {
        &["get_employee_info", "get_leave_balance"]
    }
}

impl ToolCategory for LifecycleTools {
    fn category_name() -> &'static str {
        "lifecycle"
    }
    fn tool_names() -> &'static [&'static str] {
        &["apply_leave", "approve_leave", "reject_leave", "cancel_leave"]
    }
}

impl ToolCategory for QueryTools {
    fn category_name() -> &'static str {
        "query"
    }
    fn tool_names() -> &'static [&'static str] {
        &["get_leave_status", "list_pending_leaves", "list_employee_leaves"]
    }
}

/// All tool names
pub const ALL_TOOL_NAMES: &[&str] = &[
    "get_employee_info",
    "get_leave_balance",
    "apply_leave",
    "get_leave_status",
    "list_pending_leaves",
    "list_employee_leaves",
    "approve_leave",
    "reject_leave",
    "cancel_leave",
];

/// Total number of tools
pub const TOTAL_TOOLS: usize = ALL_TOOL_NAMES.len();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_counts() {
        assert_eq!(DirectoryTools::tool_names().len(), 2);
        assert_eq!(LifecycleTools::tool_names().len(), 4);
        assert_eq!(QueryTools::tool_names().len(), 3);
        assert_eq!(TOTAL_TOOLS, 9);
    }

    #[test]
    fn categories_cover_every_tool() {
        let mut names: Vec<&str> = DirectoryTools::tool_names()
            .iter()
            .chain(LifecycleTools::tool_names())
            .chain(QueryTools::tool_names())
            .copied()
            .collect();
        names.sort_unstable();

        let mut all: Vec<&str> = ALL_TOOL_NAMES.to_vec();
        all.sort_unstable();
        assert_eq!(names, all);
    }
}
