use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use super::controller::{ChangeOutcome, GuardRejection, StatusChangeController};
use super::domain::{FundraisingId, FundraisingRecord, FundraisingStatus};
use super::gateway::{FundraisingGateway, GatewayError};
use super::notify::NotificationSink;
use super::policy::{
    available_actions, can_owner_change_status, find_action, status_display_info, StatusAction,
    StatusDisplayInfo,
};

/// Owner-facing view of a campaign's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub fundraising_id: FundraisingId,
    pub title: String,
    pub status: FundraisingStatus,
    pub display: StatusDisplayInfo,
    pub can_change: bool,
    pub available_actions: Vec<StatusAction>,
    /// False when the view was rebuilt locally because re-reading the
    /// campaign after a successful update failed.
    pub refreshed: bool,
}

impl StatusView {
    pub fn from_record(record: &FundraisingRecord) -> Self {
        Self::with_status(record, record.status)
    }

    fn with_status(record: &FundraisingRecord, status: FundraisingStatus) -> Self {
        Self {
            fundraising_id: record.id.clone(),
            title: record.title.clone(),
            status,
            display: status_display_info(status),
            can_change: can_owner_change_status(status),
            available_actions: available_actions(status),
            refreshed: true,
        }
    }
}

/// What happened to a one-shot status change request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StatusChangeResult {
    ConfirmationRequired { action: StatusAction },
    Applied { view: StatusView },
}

type Controllers<G, N> = HashMap<FundraisingId, Arc<StatusChangeController<G, N>>>;

/// Entry point used by the HTTP layer. Keeps one controller per campaign so
/// a change already in flight rejects concurrent requests for the same
/// campaign.
pub struct FundraisingStatusService<G, N> {
    gateway: Arc<G>,
    notifier: Arc<N>,
    controllers: Mutex<Controllers<G, N>>,
}

impl<G, N> FundraisingStatusService<G, N>
where
    G: FundraisingGateway + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self {
            gateway,
            notifier,
            controllers: Mutex::new(HashMap::new()),
        }
    }

    pub async fn status_view(
        &self,
        id: &FundraisingId,
    ) -> Result<StatusView, StatusServiceError> {
        let record = self.gateway.get_fundraising(id).await?;
        Ok(StatusView::from_record(&record))
    }

    /// Controller for `id`, created on first use.
    pub fn controller(&self, id: &FundraisingId) -> Arc<StatusChangeController<G, N>> {
        let mut controllers = self
            .controllers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        controllers
            .entry(id.clone())
            .or_insert_with(|| {
                Arc::new(StatusChangeController::new(
                    id.clone(),
                    self.gateway.clone(),
                    self.notifier.clone(),
                ))
            })
            .clone()
    }

    /// Request `target` for the campaign. When the matching action needs
    /// confirmation and `confirmed` is false, nothing is sent.
    pub async fn change_status(
        &self,
        id: &FundraisingId,
        target: FundraisingStatus,
        confirmed: bool,
    ) -> Result<StatusChangeResult, StatusServiceError> {
        let record = self.gateway.get_fundraising(id).await?;
        let action =
            find_action(record.status, target).ok_or(StatusServiceError::NotPermitted {
                current: record.status,
                target,
            })?;

        let controller = self.controller(id);
        if action.confirmation_required && !confirmed {
            if controller.is_submitting() {
                return Err(StatusServiceError::Guard(GuardRejection::Busy));
            }
            return Ok(StatusChangeResult::ConfirmationRequired { action });
        }

        match controller.commit(action).await {
            ChangeOutcome::Applied { target_status } => {
                let view = match self.gateway.get_fundraising(id).await {
                    Ok(refreshed) => StatusView::from_record(&refreshed),
                    Err(err) => {
                        warn!(
                            fundraising_id = %id,
                            error = %err,
                            "status updated but the refreshed campaign could not be read"
                        );
                        StatusView {
                            refreshed: false,
                            ..StatusView::with_status(&record, target_status)
                        }
                    }
                };
                Ok(StatusChangeResult::Applied { view })
            }
            ChangeOutcome::Failed { message } => Err(StatusServiceError::Remote(message)),
            ChangeOutcome::Rejected { reason } => Err(StatusServiceError::Guard(reason)),
            ChangeOutcome::AwaitingConfirmation { action } => {
                Ok(StatusChangeResult::ConfirmationRequired { action })
            }
            ChangeOutcome::Cancelled => Err(StatusServiceError::Guard(
                GuardRejection::NothingPending,
            )),
        }
    }
}

/// Error raised by the status service.
#[derive(Debug, thiserror::Error)]
pub enum StatusServiceError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("owner cannot move a {current:?} fundraising to {target:?}")]
    NotPermitted {
        current: FundraisingStatus,
        target: FundraisingStatus,
    },
    #[error("{0}")]
    Remote(String),
    #[error("status change refused: {0:?}")]
    Guard(GuardRejection),
}
