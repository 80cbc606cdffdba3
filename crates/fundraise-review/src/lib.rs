//! Lifecycle and review scoring engine for fundraising campaigns.
//!
//! Two subsystems live here: the owner-facing status lifecycle
//! (`workflows::fundraising`) and the admin review rubric
//! (`workflows::review`). Both talk to the fundraising data service through
//! the async gateway traits in [`workflows::fundraising::gateway`].

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
