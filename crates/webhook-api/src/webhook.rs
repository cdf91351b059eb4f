//! The external-dns webhook provider contract
//!
//! | Method | Path               | Operation        |
//! |--------|--------------------|------------------|
//! | GET    | `/`                | Negotiate        |
//! | GET    | `/records`         | Records          |
//! | POST   | `/records`         | ApplyChanges     |
//! | POST   | `/adjustendpoints` | AdjustEndpoints  |

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::Serialize;
use webhook_core::{ChangeBatch, Endpoint, Reconciler};

use crate::error::ApiError;

/// Media type of every JSON answer in the webhook protocol
pub const WEBHOOK_CONTENT_TYPE: &str = "application/external.dns.webhook+json;version=1";

/// Router serving the webhook contract over `reconciler`
pub fn webhook_router(reconciler: Arc<Reconciler>) -> Router {
    Router::new()
        .route("/", get(negotiate))
        .route("/records", get(records).post(apply_changes))
        .route("/adjustendpoints", post(adjust_endpoints))
        .with_state(reconciler)
}

fn webhook_json<T: Serialize>(value: &T) -> webhook_core::Result<Response> {
    let body = serde_json::to_vec(value)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, WEBHOOK_CONTENT_TYPE)],
        body,
    )
        .into_response())
}

async fn negotiate(State(reconciler): State<Arc<Reconciler>>) -> Result<Response, ApiError> {
    reconciler
        .list_domains()
        .await
        .and_then(|domains| webhook_json(&domains))
        .map_err(ApiError::listing_zones)
}

async fn records(State(reconciler): State<Arc<Reconciler>>) -> Result<Response, ApiError> {
    reconciler
        .list_endpoints()
        .await
        .and_then(|endpoints| webhook_json(&endpoints))
        .map_err(ApiError::listing_records)
}

// 204 carries no body; the status is the acknowledgment.
async fn apply_changes(
    State(reconciler): State<Arc<Reconciler>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let batch = ChangeBatch::from_json(&body).map_err(ApiError::applying_changes)?;
    reconciler
        .apply_changes(&batch)
        .await
        .map_err(ApiError::applying_changes)?;

    tracing::info!("Changes were accepted");
    Ok(StatusCode::NO_CONTENT)
}

async fn adjust_endpoints(
    State(reconciler): State<Arc<Reconciler>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let endpoints = Endpoint::list_from_json(&body).map_err(ApiError::adjusting_endpoints)?;
    reconciler
        .adjust_endpoints(&endpoints)
        .await
        .and_then(|adjusted| webhook_json(&adjusted))
        .map_err(ApiError::adjusting_endpoints)
}
