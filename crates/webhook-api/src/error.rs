//! Mapping of reconciler errors onto webhook responses
//!
//! Callers only ever see `500` with a fixed message per operation. The error
//! kind and cause are logged here so they are not lost.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use webhook_core::Error;

/// A failed webhook operation
#[derive(Debug)]
pub struct ApiError {
    /// Fixed text returned to the caller
    message: &'static str,
    /// Underlying cause, logged only
    source: Error,
}

impl ApiError {
    /// Failure of `GET /`
    pub fn listing_zones(source: Error) -> Self {
        Self {
            message: "Error listing zones",
            source,
        }
    }

    /// Failure of `GET /records`
    pub fn listing_records(source: Error) -> Self {
        Self {
            message: "Error listing records",
            source,
        }
    }

    /// Failure of `POST /records`
    pub fn applying_changes(source: Error) -> Self {
        Self {
            message: "Error applying changes",
            source,
        }
    }

    /// Failure of `POST /adjustendpoints`
    pub fn adjusting_endpoints(source: Error) -> Self {
        Self {
            message: "Error adjusting endpoints",
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            kind = self.source.kind(),
            "{}: {}",
            self.message,
            self.source
        );
        (StatusCode::INTERNAL_SERVER_ERROR, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_collapses_to_500() {
        let errors = [
            ApiError::listing_zones(Error::transport("down")),
            ApiError::listing_records(Error::format("bad table")),
            ApiError::applying_changes(Error::validation("no dnsName")),
            ApiError::adjusting_endpoints(Error::transport("down")),
        ];

        for error in errors {
            assert_eq!(
                error.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
