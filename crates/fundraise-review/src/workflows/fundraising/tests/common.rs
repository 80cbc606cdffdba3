use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::fundraising::domain::{
    CampaignReport, FundraisingId, FundraisingRecord, FundraisingStatus, MonobankJar,
};
use crate::workflows::fundraising::gateway::{FundraisingGateway, GatewayError, Page};
use crate::workflows::fundraising::notify::{Notification, NotificationSink};
use crate::workflows::fundraising::policy::{find_action, StatusAction};

pub(crate) fn fundraising(id: &str, status: FundraisingStatus) -> FundraisingRecord {
    FundraisingRecord {
        id: FundraisingId(id.to_string()),
        status,
        title: format!("Drones for unit {id}"),
        description: "Reconnaissance drones for the eastern front".to_string(),
        tags: vec!["military".to_string(), "drones".to_string()],
        avatar_url: Some(format!("https://cdn.example.org/{id}.jpg")),
        monobank_jar: Some(MonobankJar {
            id: format!("jar-{id}"),
            title: "Drones jar".to_string(),
        }),
        reports: vec![CampaignReport {
            id: format!("report-{id}"),
            title: "First delivery".to_string(),
            description: "Six drones handed over".to_string(),
            attachments: vec!["receipt.pdf".to_string()],
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 14, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        }],
        user_id: "owner-1".to_string(),
    }
}

pub(crate) fn action(from: FundraisingStatus, to: FundraisingStatus) -> StatusAction {
    find_action(from, to).expect("transition exists in the owner table")
}

#[derive(Default)]
pub(crate) struct MemoryGateway {
    records: Mutex<HashMap<FundraisingId, FundraisingRecord>>,
    updates: Mutex<Vec<(FundraisingId, FundraisingStatus)>>,
    failure: Mutex<Option<GatewayError>>,
    read_failure_after_update: Mutex<Option<GatewayError>>,
}

impl MemoryGateway {
    pub(crate) fn with_records(records: Vec<FundraisingRecord>) -> Self {
        let gateway = Self::default();
        {
            let mut guard = gateway.records.lock().expect("records mutex poisoned");
            for record in records {
                guard.insert(record.id.clone(), record);
            }
        }
        gateway
    }

    pub(crate) fn fail_updates_with(&self, error: GatewayError) {
        *self.failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    /// Reads start failing with `error` once any status update has landed.
    pub(crate) fn fail_reads_after_update_with(&self, error: GatewayError) {
        *self
            .read_failure_after_update
            .lock()
            .expect("failure mutex poisoned") = Some(error);
    }

    pub(crate) fn updates(&self) -> Vec<(FundraisingId, FundraisingStatus)> {
        self.updates.lock().expect("updates mutex poisoned").clone()
    }

    pub(crate) fn status_of(&self, id: &str) -> Option<FundraisingStatus> {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .get(&FundraisingId(id.to_string()))
            .map(|record| record.status)
    }
}

#[async_trait]
impl FundraisingGateway for MemoryGateway {
    async fn get_fundraising(
        &self,
        id: &FundraisingId,
    ) -> Result<FundraisingRecord, GatewayError> {
        if !self.updates().is_empty() {
            if let Some(error) = self
                .read_failure_after_update
                .lock()
                .expect("failure mutex poisoned")
                .clone()
            {
                return Err(error);
            }
        }

        self.records
            .lock()
            .expect("records mutex poisoned")
            .get(id)
            .cloned()
            .ok_or(GatewayError::NotFound)
    }

    async fn update_status(
        &self,
        id: &FundraisingId,
        target: FundraisingStatus,
    ) -> Result<(), GatewayError> {
        self.updates
            .lock()
            .expect("updates mutex poisoned")
            .push((id.clone(), target));

        if let Some(error) = self.failure.lock().expect("failure mutex poisoned").clone() {
            return Err(error);
        }

        let mut records = self.records.lock().expect("records mutex poisoned");
        let record = records.get_mut(id).ok_or(GatewayError::NotFound)?;
        record.status = target;
        Ok(())
    }

    async fn list_by_status(
        &self,
        statuses: &[FundraisingStatus],
        page: usize,
        page_size: usize,
    ) -> Result<Page<FundraisingRecord>, GatewayError> {
        let mut matching: Vec<FundraisingRecord> = self
            .records
            .lock()
            .expect("records mutex poisoned")
            .values()
            .filter(|record| statuses.contains(&record.status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        Ok(Page {
            items,
            page,
            page_size,
            total,
        })
    }
}

/// Gateway whose status update parks until the test releases it.
#[derive(Default)]
pub(crate) struct GatedGateway {
    pub(crate) entered: Notify,
    pub(crate) release: Notify,
    calls: AtomicUsize,
}

impl GatedGateway {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FundraisingGateway for GatedGateway {
    async fn get_fundraising(
        &self,
        id: &FundraisingId,
    ) -> Result<FundraisingRecord, GatewayError> {
        Ok(fundraising(&id.0, FundraisingStatus::Closed))
    }

    async fn update_status(
        &self,
        _id: &FundraisingId,
        _target: FundraisingStatus,
    ) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(())
    }

    async fn list_by_status(
        &self,
        _statuses: &[FundraisingStatus],
        page: usize,
        page_size: usize,
    ) -> Result<Page<FundraisingRecord>, GatewayError> {
        Ok(Page {
            items: Vec::new(),
            page,
            page_size,
            total: 0,
        })
    }
}

#[derive(Default, Clone)]
pub(crate) struct RecordingNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn publish(&self, notification: Notification) {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
