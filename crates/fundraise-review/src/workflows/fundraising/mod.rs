//! Owner-facing publication lifecycle for fundraising campaigns.
//!
//! [`policy`] answers which transitions an owner may request; the
//! [`controller`] sequences confirmation and the remote update; the service
//! and router put both behind HTTP.

pub mod controller;
pub mod domain;
pub mod gateway;
pub mod notify;
pub mod policy;
pub mod router;
pub mod service;

#[cfg(test)]
pub(crate) mod tests;

pub use controller::{ChangeOutcome, ControllerState, GuardRejection, StatusChangeController};
pub use domain::{
    ActionIcon, CampaignReport, FundraisingId, FundraisingRecord, FundraisingStatus, MonobankJar,
    Severity, UnknownStatus,
};
pub use gateway::{FundraisingGateway, GatewayError, Page};
pub use notify::{Notification, NotificationSink, TracingNotifier};
pub use policy::{
    available_actions, can_owner_change_status, find_action, status_display_info,
    status_display_info_raw, StatusAction, StatusDisplayInfo,
};
pub use router::status_router;
pub use service::{FundraisingStatusService, StatusChangeResult, StatusServiceError, StatusView};
