use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{FundraisingId, FundraisingStatus};
use super::gateway::FundraisingGateway;
use super::notify::{Notification, NotificationSink};
use super::policy::StatusAction;

const UPDATE_FAILED: &str = "Failed to update status";

/// Where a controller sits in the confirm-then-commit sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "action", rename_all = "snake_case")]
pub enum ControllerState {
    Idle,
    PendingConfirmation(StatusAction),
    Submitting(StatusAction),
}

/// Why a call was refused locally without reaching the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardRejection {
    /// A status change is already in flight on this controller.
    Busy,
    /// `confirm` or `cancel` arrived with nothing awaiting confirmation.
    NothingPending,
}

/// Result of every controller call. Nothing escapes as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChangeOutcome {
    AwaitingConfirmation { action: StatusAction },
    Applied { target_status: FundraisingStatus },
    Failed { message: String },
    Cancelled,
    Rejected { reason: GuardRejection },
}

pub type RefreshCallback = Box<dyn Fn() + Send + Sync>;

/// Sequences optional confirmation before asking the data service to move a
/// campaign to a new status. One instance per campaign view; each instance
/// keeps its own state, so several campaigns never interfere.
pub struct StatusChangeController<G: ?Sized, N: ?Sized> {
    fundraising_id: FundraisingId,
    gateway: Arc<G>,
    notifier: Arc<N>,
    on_refresh: Option<RefreshCallback>,
    state: Mutex<ControllerState>,
}

impl<G, N> StatusChangeController<G, N>
where
    G: FundraisingGateway + ?Sized,
    N: NotificationSink + ?Sized,
{
    pub fn new(fundraising_id: FundraisingId, gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self {
            fundraising_id,
            gateway,
            notifier,
            on_refresh: None,
            state: Mutex::new(ControllerState::Idle),
        }
    }

    /// Callback run after a successful update so the caller can re-read the
    /// confirmed status.
    pub fn with_refresh(mut self, on_refresh: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Box::new(on_refresh));
        self
    }

    pub fn fundraising_id(&self) -> &FundraisingId {
        &self.fundraising_id
    }

    pub fn state(&self) -> ControllerState {
        self.lock_state().clone()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(*self.lock_state(), ControllerState::Submitting(_))
    }

    /// Start a status change. Actions needing confirmation park in
    /// `PendingConfirmation`; the rest are submitted immediately.
    pub async fn request_change(&self, action: StatusAction) -> ChangeOutcome {
        {
            let mut state = self.lock_state();
            if matches!(*state, ControllerState::Submitting(_)) {
                warn!(
                    fundraising_id = %self.fundraising_id,
                    target = ?action.target_status,
                    "status change rejected: another change is in flight"
                );
                return ChangeOutcome::Rejected {
                    reason: GuardRejection::Busy,
                };
            }

            if action.confirmation_required {
                info!(
                    fundraising_id = %self.fundraising_id,
                    target = ?action.target_status,
                    "status change awaiting confirmation"
                );
                *state = ControllerState::PendingConfirmation(action.clone());
                return ChangeOutcome::AwaitingConfirmation { action };
            }

            *state = ControllerState::Submitting(action.clone());
        }

        self.submit(action).await
    }

    /// Commit the action awaiting confirmation.
    pub async fn confirm(&self) -> ChangeOutcome {
        let action = {
            let mut state = self.lock_state();
            match &*state {
                ControllerState::PendingConfirmation(action) => {
                    let action = action.clone();
                    *state = ControllerState::Submitting(action.clone());
                    action
                }
                ControllerState::Submitting(_) => {
                    warn!(fundraising_id = %self.fundraising_id, "confirm rejected: change in flight");
                    return ChangeOutcome::Rejected {
                        reason: GuardRejection::Busy,
                    };
                }
                ControllerState::Idle => {
                    return ChangeOutcome::Rejected {
                        reason: GuardRejection::NothingPending,
                    };
                }
            }
        };

        self.submit(action).await
    }

    /// Drop the pending action. Purely local; nothing is sent.
    pub fn cancel(&self) -> ChangeOutcome {
        let mut state = self.lock_state();
        match &*state {
            ControllerState::PendingConfirmation(action) => {
                info!(
                    fundraising_id = %self.fundraising_id,
                    target = ?action.target_status,
                    "status change cancelled"
                );
                *state = ControllerState::Idle;
                ChangeOutcome::Cancelled
            }
            ControllerState::Submitting(_) => ChangeOutcome::Rejected {
                reason: GuardRejection::Busy,
            },
            ControllerState::Idle => ChangeOutcome::Rejected {
                reason: GuardRejection::NothingPending,
            },
        }
    }

    /// Submit `action` with the confirmation already given by the caller.
    /// Goes from Idle or PendingConfirmation straight to Submitting under one
    /// lock, replacing any action that was awaiting confirmation.
    pub async fn commit(&self, action: StatusAction) -> ChangeOutcome {
        {
            let mut state = self.lock_state();
            if matches!(*state, ControllerState::Submitting(_)) {
                warn!(
                    fundraising_id = %self.fundraising_id,
                    target = ?action.target_status,
                    "status change rejected: another change is in flight"
                );
                return ChangeOutcome::Rejected {
                    reason: GuardRejection::Busy,
                };
            }
            *state = ControllerState::Submitting(action.clone());
        }

        self.submit(action).await
    }

    async fn submit(&self, action: StatusAction) -> ChangeOutcome {
        // Returns the controller to Idle however this future ends, including
        // when the caller drops it mid-flight.
        let _reset = ResetOnDrop(&self.state);

        info!(
            fundraising_id = %self.fundraising_id,
            target = ?action.target_status,
            "submitting status change"
        );

        match self
            .gateway
            .update_status(&self.fundraising_id, action.target_status)
            .await
        {
            Ok(()) => {
                self.notifier.publish(Notification::success(format!(
                    "Fundraising status updated to {}",
                    action.label.to_lowercase()
                )));
                if let Some(refresh) = &self.on_refresh {
                    refresh();
                }
                ChangeOutcome::Applied {
                    target_status: action.target_status,
                }
            }
            Err(err) => {
                warn!(
                    fundraising_id = %self.fundraising_id,
                    target = ?action.target_status,
                    error = %err,
                    "status change failed"
                );
                let message = err.user_message(UPDATE_FAILED);
                self.notifier.publish(Notification::error(message.clone()));
                ChangeOutcome::Failed { message }
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct ResetOnDrop<'a>(&'a Mutex<ControllerState>);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = ControllerState::Idle;
    }
}
