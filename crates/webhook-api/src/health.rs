//! Liveness and readiness probes
//!
//! Served on their own listener so orchestrators can probe the process
//! without touching the webhook port.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

/// Shared health state for readiness and liveness checks
///
/// Starts live but not ready; the daemon marks it ready once the webhook
/// listener is bound and clears both flags when shutdown begins.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready or not ready
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Mark the service as live or not live
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::Release);
    }

    /// Return readiness state
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Return liveness state
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn probe_response(probe_ok: bool) -> Response {
    let status = if probe_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = if probe_ok { "ok" } else { "unavailable" };

    (status, [(header::CACHE_CONTROL, "no-store")], body).into_response()
}

async fn healthz(State(state): State<Arc<HealthState>>) -> Response {
    probe_response(state.is_alive())
}

async fn readyz(State(state): State<Arc<HealthState>>) -> Response {
    probe_response(state.is_ready())
}

/// Router serving `/healthz` and `/readyz`
pub fn health_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .with_state(state)
}
