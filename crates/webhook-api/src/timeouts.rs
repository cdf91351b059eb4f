//! Read and write deadlines for the webhook listener
//!
//! The read deadline bounds receiving the request body; a client that stalls
//! gets `408`. The write deadline bounds the handler, registrar calls
//! included; overrunning it yields the usual generic `500`.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use webhook_core::ServerConfig;

/// Deadlines applied to every webhook request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    /// Time allowed to receive the whole request body
    pub read: Duration,
    /// Time allowed to produce the response
    pub write: Duration,
}

impl From<&ServerConfig> for ServerTimeouts {
    fn from(config: &ServerConfig) -> Self {
        Self {
            read: config.read_timeout(),
            write: config.write_timeout(),
        }
    }
}

/// Wrap `router` so every request is held to `timeouts`
pub fn with_timeouts(router: Router, timeouts: ServerTimeouts) -> Router {
    router.layer(middleware::from_fn_with_state(timeouts, enforce))
}

async fn enforce(
    State(timeouts): State<ServerTimeouts>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();

    let bytes = match tokio::time::timeout(timeouts.read, axum::body::to_bytes(body, usize::MAX))
        .await
    {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!("Failed to read {} {} body: {}", parts.method, parts.uri, e);
            return (StatusCode::BAD_REQUEST, "Error reading request").into_response();
        }
        Err(_) => {
            tracing::warn!(
                "Request body for {} {} not received within {:?}",
                parts.method,
                parts.uri,
                timeouts.read
            );
            return (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response();
        }
    };

    let (method, uri) = (parts.method.clone(), parts.uri.clone());
    let request = Request::from_parts(parts, Body::from(bytes));

    match tokio::time::timeout(timeouts.write, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(
                "{} {} did not complete within {:?}",
                method,
                uri,
                timeouts.write
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Request timed out").into_response()
        }
    }
}
