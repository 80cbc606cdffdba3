use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for fundraising campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FundraisingId(pub String);

impl fmt::Display for FundraisingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication status of a campaign, owned and persisted by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundraisingStatus {
    Open,
    Closed,
    ReadyForReview,
    Archived,
    Hidden,
    Deleted,
}

impl FundraisingStatus {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Open,
            Self::Closed,
            Self::ReadyForReview,
            Self::Archived,
            Self::Hidden,
            Self::Deleted,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::ReadyForReview => "Ready for Review",
            Self::Archived => "Archived",
            Self::Hidden => "Hidden",
            Self::Deleted => "Deleted",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::ReadyForReview => "ready_for_review",
            Self::Archived => "archived",
            Self::Hidden => "hidden",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FundraisingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised fundraising status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for FundraisingStatus {
    type Err = UnknownStatus;

    /// Accepts `ReadyForReview`, `ready_for_review`, `ready-for-review` and
    /// `Ready for Review` alike.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "readyforreview" => Ok(Self::ReadyForReview),
            "archived" => Ok(Self::Archived),
            "hidden" => Ok(Self::Hidden),
            "deleted" => Ok(Self::Deleted),
            _ => Err(UnknownStatus(raw.to_string())),
        }
    }
}

/// Display tone shared by status chips, action buttons, and rating badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Neutral,
    Primary,
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Primary => "primary",
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Icon attached to a status action. Presentation layers match on it
/// exhaustively; the engine never renders anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionIcon {
    Lock,
    LockOpen,
    Delete,
    Restore,
    Assessment,
    Info,
}

/// Progress report published by the campaign owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignReport {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Monobank jar the campaign collects into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonobankJar {
    pub id: String,
    pub title: String,
}

/// Read model returned by the fundraising data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundraisingRecord {
    pub id: FundraisingId,
    pub status: FundraisingStatus,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub avatar_url: Option<String>,
    pub monobank_jar: Option<MonobankJar>,
    #[serde(default)]
    pub reports: Vec<CampaignReport>,
    pub user_id: String,
}
