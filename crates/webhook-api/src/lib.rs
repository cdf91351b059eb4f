//! HTTP surface of the external-dns DreamHost webhook
//!
//! - [`webhook_router`]: the webhook provider contract external-dns talks to
//! - [`health_router`]: liveness/readiness probes on a separate listener
//! - [`with_timeouts`]: read/write deadlines for the webhook listener
//!
//! Handlers are thin: they parse, call the [`webhook_core::Reconciler`], and
//! turn every failure into a generic `500` via [`ApiError`].

pub mod error;
pub mod health;
pub mod timeouts;
pub mod webhook;

pub use error::ApiError;
pub use health::{HealthState, health_router};
pub use timeouts::{ServerTimeouts, with_timeouts};
pub use webhook::{WEBHOOK_CONTENT_TYPE, webhook_router};
