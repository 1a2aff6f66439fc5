//! Static guidance documents served as MCP prompts.
//!
//! These are reference texts, not projections of ledger state; they are
//! served verbatim.

pub const LEAVE_POLICY_NAME: &str = "leave_policy";
pub const APPLY_LEAVE_GUIDE_NAME: &str = "apply_leave_guide";

pub const PROMPT_NAMES: &[&str] = &[LEAVE_POLICY_NAME, APPLY_LEAVE_GUIDE_NAME];

pub fn prompt_text(name: &str) -> Option<&'static str> {
    match name {
        LEAVE_POLICY_NAME => Some(LEAVE_POLICY),
        APPLY_LEAVE_GUIDE_NAME => Some(APPLY_LEAVE_GUIDE),
        _ => None,
    }
}

pub fn prompt_description(name: &str) -> Option<&'static str> {
    match name {
        LEAVE_POLICY_NAME => Some("The company leave policy document"),
        APPLY_LEAVE_GUIDE_NAME => Some("A step-by-step guide on how to apply for leave"),
        _ => None,
    }
}

pub const LEAVE_POLICY: &str = r#"# Company Leave Policy

## Leave Types & Entitlements

| Leave Type | Days/Year | Notes                                      |
|------------|-----------|--------------------------------------------|
| Casual     | 10        | For personal errands, short personal needs |
| Sick       | 12        | Requires medical certificate if > 2 days   |
| Annual     | 20        | Must be planned 2 weeks in advance         |
| Maternity  | 90        | For female employees, paid leave           |
| Paternity  | 5         | For male employees upon birth of child     |

## Rules & Guidelines

1. **Application**: All leave requests must be submitted through the Leave Management System before the leave begins.
2. **Approval**: Leave requests must be approved by your direct manager.
3. **Advance Notice**: Annual leaves require at least **14 days** advance notice.
4. **Sick Leave**: If sick leave exceeds **2 consecutive days**, a valid medical certificate must be submitted.
5. **Balance**: Unused casual and sick leaves do **not** carry over to the next year.
6. **Annual Leave**: Up to **5 days** of unused annual leave can be carried over to the next year.
7. **Cancellation**: Employees may cancel an approved leave at least **24 hours** before the leave start date.
8. **Rejection**: Management reserves the right to reject leave during critical project deadlines.

## Contact

For any leave-related queries, contact HR at: hr@company.com
"#;

pub const APPLY_LEAVE_GUIDE: &str = r#"# How to Apply for Leave

Follow these steps to submit a leave request through the Leave Management Agent:

## Step 1: Know Your Employee ID
Your employee ID can be found on your ID card or payslip. Example: `E001`

## Step 2: Check Your Leave Balance
Before applying, check your remaining leave balance:
> "What is my leave balance for employee ID E001?"

## Step 3: Choose Leave Type
Select the appropriate leave type:
- **casual** - Short personal needs
- **sick** - Health-related absences
- **annual** - Pre-planned vacations (14 days advance notice needed)
- **maternity** - For new mothers
- **paternity** - For new fathers

## Step 4: Submit the Request
Provide the following to submit:
- Your Employee ID
- Leave type
- Start date (YYYY-MM-DD format)
- End date (YYYY-MM-DD format)
- Reason for leave

Example:
> "Apply casual leave for E001 from 2026-03-10 to 2026-03-12. Reason: Family function."

## Step 5: Track Your Request
After submission, you'll receive a **Leave ID** (e.g., `L001`).
Use it to track status:
> "What is the status of leave L001?"

## Step 6: Await Approval
Your manager will review and approve or reject the request.
You'll receive a notification once the decision is made.
"#;

#[cfg(test)]
mod tests {
    use super::{prompt_description, prompt_text, PROMPT_NAMES};

    #[test]
    fn every_listed_prompt_resolves() {
        for name in PROMPT_NAMES {
            assert!(prompt_text(name).is_some());
            assert!(prompt_description(name).is_some());
        }
    }

    #[test]
    fn unknown_prompts_do_not_resolve() {
        assert!(prompt_text("overtime_policy").is_none());
        assert!(prompt_description("overtime_policy").is_none());
    }

    #[test]
    fn policy_lists_all_entitlements() {
        let policy = prompt_text("leave_policy").unwrap();
        for leave_type in ["Casual", "Sick", "Annual", "Maternity", "Paternity"] {
            assert!(policy.contains(leave_type), "policy is missing {leave_type}");
        }
    }
}
