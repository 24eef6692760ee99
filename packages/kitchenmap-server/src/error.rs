//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kitchenmap_core::{ErrorKind, KitchenmapError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] KitchenmapError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl AppError {
    /// Caller-facing category and HTTP status
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Service(err) => {
                let status = match err.kind {
                    ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                    ErrorKind::NotFound | ErrorKind::NoData => StatusCode::NOT_FOUND,
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                    ErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
                    ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.kind.as_str())
            }
            AppError::Bind { .. } | AppError::Serve(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();
        let message = match &self {
            AppError::Service(err) => err.message.clone(),
            other => other.to_string(),
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (KitchenmapError::invalid_input("bad"), StatusCode::BAD_REQUEST),
            (KitchenmapError::kitchen_not_found(1), StatusCode::NOT_FOUND),
            (KitchenmapError::no_data("empty"), StatusCode::NOT_FOUND),
            (KitchenmapError::conflict("taken"), StatusCode::CONFLICT),
            (KitchenmapError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (KitchenmapError::external_service("down"), StatusCode::BAD_GATEWAY),
            (KitchenmapError::storage("disk"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_kind_label() {
        let (_, kind) = AppError::from(KitchenmapError::no_data("empty")).status();
        assert_eq!(kind, "no_data");
    }
}
