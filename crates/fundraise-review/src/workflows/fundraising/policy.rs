use serde::Serialize;

use super::domain::{ActionIcon, FundraisingStatus, Severity};

const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this fundraising? You can restore it later.";

/// A status change the owner may request from the current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusAction {
    pub target_status: FundraisingStatus,
    pub label: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub icon: ActionIcon,
    pub confirmation_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_message: Option<&'static str>,
}

impl StatusAction {
    fn close() -> Self {
        Self {
            target_status: FundraisingStatus::Closed,
            label: "Mark as Closed",
            description: "Mark this fundraising as completed - stops accepting new donations",
            severity: Severity::Warning,
            icon: ActionIcon::Lock,
            confirmation_required: true,
            confirmation_message: Some(
                "Are you sure you want to close this fundraising? You can reopen it later if needed.",
            ),
        }
    }

    fn delete() -> Self {
        Self {
            target_status: FundraisingStatus::Deleted,
            label: "Delete",
            description: "Hide this fundraising from public view",
            severity: Severity::Error,
            icon: ActionIcon::Delete,
            confirmation_required: true,
            confirmation_message: Some(DELETE_CONFIRMATION),
        }
    }

    fn submit_for_review() -> Self {
        Self {
            target_status: FundraisingStatus::ReadyForReview,
            label: "Submit for Review",
            description: "Submit this fundraising for admin review to mark it as archived",
            severity: Severity::Info,
            icon: ActionIcon::Assessment,
            confirmation_required: true,
            confirmation_message: Some(
                "Submit this fundraising for admin review? Once submitted, you cannot make changes until reviewed.",
            ),
        }
    }

    fn reopen() -> Self {
        Self {
            target_status: FundraisingStatus::Open,
            label: "Reopen",
            description: "Reopen this fundraising to continue accepting donations",
            severity: Severity::Success,
            icon: ActionIcon::LockOpen,
            confirmation_required: false,
            confirmation_message: None,
        }
    }

    fn restore() -> Self {
        Self {
            target_status: FundraisingStatus::Open,
            label: "Restore",
            description: "Restore this fundraising and make it public again",
            severity: Severity::Success,
            icon: ActionIcon::Restore,
            confirmation_required: false,
            confirmation_message: None,
        }
    }
}

/// Owner actions available from `status`. `ReadyForReview`, `Archived` and
/// `Hidden` are admin-controlled and yield nothing.
pub fn available_actions(status: FundraisingStatus) -> Vec<StatusAction> {
    match status {
        FundraisingStatus::Open => vec![StatusAction::close(), StatusAction::delete()],
        FundraisingStatus::Closed => vec![
            StatusAction::submit_for_review(),
            StatusAction::reopen(),
            StatusAction::delete(),
        ],
        FundraisingStatus::Deleted => vec![StatusAction::restore()],
        FundraisingStatus::ReadyForReview
        | FundraisingStatus::Archived
        | FundraisingStatus::Hidden => Vec::new(),
    }
}

pub fn can_owner_change_status(status: FundraisingStatus) -> bool {
    !available_actions(status).is_empty()
}

/// Owner action from `current` that lands on `target`, if one exists.
pub fn find_action(current: FundraisingStatus, target: FundraisingStatus) -> Option<StatusAction> {
    available_actions(current)
        .into_iter()
        .find(|action| action.target_status == target)
}

/// How a status is presented to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplayInfo {
    pub label: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub owner_can_edit: bool,
}

impl StatusDisplayInfo {
    /// Fallback for status values the engine does not recognise.
    pub const fn unknown() -> Self {
        Self {
            label: "Unknown",
            severity: Severity::Neutral,
            description: "Unknown status",
            owner_can_edit: false,
        }
    }
}

pub fn status_display_info(status: FundraisingStatus) -> StatusDisplayInfo {
    let (severity, description, owner_can_edit) = match status {
        FundraisingStatus::Open => (
            Severity::Success,
            "This fundraising is actively accepting donations",
            true,
        ),
        FundraisingStatus::Closed => (
            Severity::Warning,
            "This fundraising has been closed but can be reopened",
            true,
        ),
        FundraisingStatus::ReadyForReview => (
            Severity::Info,
            "This fundraising is awaiting admin review",
            false,
        ),
        FundraisingStatus::Archived => (
            Severity::Neutral,
            "This fundraising has been archived by admin",
            false,
        ),
        FundraisingStatus::Hidden => (Severity::Error, "This fundraising is hidden by admin", false),
        FundraisingStatus::Deleted => (Severity::Error, "This fundraising has been deleted", true),
    };

    StatusDisplayInfo {
        label: status.label(),
        severity,
        description,
        owner_can_edit,
    }
}

/// Display info for a raw status value coming from outside the engine.
pub fn status_display_info_raw(raw: &str) -> StatusDisplayInfo {
    raw.parse::<FundraisingStatus>()
        .map(status_display_info)
        .unwrap_or_else(|_| StatusDisplayInfo::unknown())
}
