use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fundraise_review::workflows::fundraising::{
    CampaignReport, FundraisingGateway, FundraisingId, FundraisingRecord, FundraisingStatus,
    GatewayError, MonobankJar, Page,
};
use fundraise_review::workflows::review::{CreateReviewRequest, ReviewGateway};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stand-in for the fundraising data service, shared by the status and
/// review workflows.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFundraisingStore {
    records: Arc<Mutex<BTreeMap<FundraisingId, FundraisingRecord>>>,
    reviews: Arc<Mutex<Vec<CreateReviewRequest>>>,
}

impl InMemoryFundraisingStore {
    pub(crate) fn with_records(records: impl IntoIterator<Item = FundraisingRecord>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records();
            for record in records {
                guard.insert(record.id.clone(), record);
            }
        }
        store
    }

    pub(crate) fn reviews(&self) -> Vec<CreateReviewRequest> {
        self.reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn records(&self) -> MutexGuard<'_, BTreeMap<FundraisingId, FundraisingRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FundraisingGateway for InMemoryFundraisingStore {
    async fn get_fundraising(&self, id: &FundraisingId) -> Result<FundraisingRecord, GatewayError> {
        self.records().get(id).cloned().ok_or(GatewayError::NotFound)
    }

    async fn update_status(
        &self,
        id: &FundraisingId,
        target: FundraisingStatus,
    ) -> Result<(), GatewayError> {
        let mut guard = self.records();
        let record = guard.get_mut(id).ok_or(GatewayError::NotFound)?;
        record.status = target;
        Ok(())
    }

    async fn list_by_status(
        &self,
        statuses: &[FundraisingStatus],
        page: usize,
        page_size: usize,
    ) -> Result<Page<FundraisingRecord>, GatewayError> {
        let guard = self.records();
        let matching: Vec<_> = guard
            .values()
            .filter(|record| statuses.contains(&record.status))
            .collect();
        Ok(Page {
            total: matching.len(),
            items: matching
                .into_iter()
                .skip(page.saturating_mul(page_size))
                .take(page_size)
                .cloned()
                .collect(),
            page,
            page_size,
        })
    }
}

#[async_trait]
impl ReviewGateway for InMemoryFundraisingStore {
    async fn create_review(&self, request: CreateReviewRequest) -> Result<(), GatewayError> {
        if !self.records().contains_key(&request.fundraising_id) {
            return Err(GatewayError::NotFound);
        }
        self.reviews
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(())
    }
}

/// Campaigns the server and demo start with.
pub(crate) fn demo_campaigns() -> Vec<FundraisingRecord> {
    [
        ("night-vision", "Night vision for the 47th", FundraisingStatus::Open),
        ("field-hospital", "Field hospital generators", FundraisingStatus::Closed),
        ("evac-vehicle", "Evacuation pickup", FundraisingStatus::ReadyForReview),
        ("water-filters", "Water filters for Kherson", FundraisingStatus::Deleted),
    ]
    .into_iter()
    .map(|(id, title, status)| FundraisingRecord {
        id: FundraisingId(id.to_string()),
        status,
        title: title.to_string(),
        description: format!("{title}: equipment purchase and delivery"),
        tags: vec!["volunteers".to_string()],
        avatar_url: None,
        monobank_jar: Some(MonobankJar {
            id: format!("jar-{id}"),
            title: title.to_string(),
        }),
        reports: vec![CampaignReport {
            id: format!("{id}-report-1"),
            title: "Purchase receipts".to_string(),
            description: "Invoices and delivery photos".to_string(),
            attachments: vec!["invoice.pdf".to_string()],
            created_at: Utc
                .with_ymd_and_hms(2025, 2, 1, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }],
        user_id: "demo-owner".to_string(),
    })
    .collect()
}

pub(crate) fn parse_status(raw: &str) -> Result<FundraisingStatus, String> {
    raw.parse::<FundraisingStatus>()
        .map_err(|err| err.to_string())
}
