use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{FundraisingId, FundraisingRecord, FundraisingStatus};

/// Client for the fundraising data service. The service owns and persists
/// campaign status; the engine only requests transitions and re-reads.
#[async_trait]
pub trait FundraisingGateway: Send + Sync {
    async fn get_fundraising(&self, id: &FundraisingId)
        -> Result<FundraisingRecord, GatewayError>;

    async fn update_status(
        &self,
        id: &FundraisingId,
        target: FundraisingStatus,
    ) -> Result<(), GatewayError>;

    /// One page (zero-based) of campaigns whose status is in `statuses`.
    async fn list_by_status(
        &self,
        statuses: &[FundraisingStatus],
        page: usize,
        page_size: usize,
    ) -> Result<Page<FundraisingRecord>, GatewayError>;
}

/// Slice of a larger listing plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// Failure reported by a remote collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("fundraising not found")]
    NotFound,
    /// The service answered with an error payload; the message is user-facing.
    #[error("{0}")]
    Rejected(String),
    #[error("fundraising service unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// Text shown to the user when `fallback` describes the failed operation.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            GatewayError::Rejected(message) if !message.trim().is_empty() => message.clone(),
            GatewayError::NotFound => "Fundraising not found".to_string(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_errors_surface_their_message() {
        let err = GatewayError::Rejected("Jar is not linked".to_string());
        assert_eq!(err.user_message("Failed to update status"), "Jar is not linked");
    }

    #[test]
    fn transport_errors_fall_back() {
        let err = GatewayError::Unavailable("connection reset".to_string());
        assert_eq!(
            err.user_message("Failed to update status"),
            "Failed to update status"
        );
        let blank = GatewayError::Rejected("  ".to_string());
        assert_eq!(blank.user_message("Failed"), "Failed");
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page {
            items: Vec::new(),
            page: 0,
            page_size: 12,
            total: 25,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
