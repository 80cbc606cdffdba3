use std::sync::Arc;

use serde::Serialize;

use crate::config::ReviewConfig;
use crate::workflows::fundraising::{
    FundraisingGateway, FundraisingId, FundraisingRecord, FundraisingStatus, GatewayError, Page,
};

/// Row shown in the admin review queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingReview {
    pub fundraising_id: FundraisingId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub avatar_url: Option<String>,
    pub report_count: usize,
}

impl From<&FundraisingRecord> for PendingReview {
    fn from(record: &FundraisingRecord) -> Self {
        Self {
            fundraising_id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            tags: record.tags.clone(),
            avatar_url: record.avatar_url.clone(),
            report_count: record.reports.len(),
        }
    }
}

/// Campaigns submitted by their owners and waiting for an admin review.
pub struct ReviewQueue<G: ?Sized> {
    gateway: Arc<G>,
    page_size: usize,
}

impl<G> ReviewQueue<G>
where
    G: FundraisingGateway + ?Sized,
{
    pub fn new(gateway: Arc<G>, config: &ReviewConfig) -> Self {
        Self {
            gateway,
            page_size: config.queue_page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Zero-based page of the queue.
    pub async fn pending(&self, page: usize) -> Result<Page<PendingReview>, GatewayError> {
        let listing = self
            .gateway
            .list_by_status(&[FundraisingStatus::ReadyForReview], page, self.page_size)
            .await?;

        Ok(Page {
            items: listing.items.iter().map(PendingReview::from).collect(),
            page: listing.page,
            page_size: listing.page_size,
            total: listing.total,
        })
    }

    pub async fn campaign(&self, id: &FundraisingId) -> Result<FundraisingRecord, GatewayError> {
        self.gateway.get_fundraising(id).await
    }
}
