//! HTTP response types and error mapping
//!
//! Every failure leaves the service as a status code plus `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, UnavailableReason};
use crate::models::VinLookup;

/// Decoded VIN with its cache flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VinLookupResponse {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub model_year: String,
    pub body_class: String,
    /// True when served from the local cache
    pub cached: bool,
}

impl From<VinLookup> for VinLookupResponse {
    fn from(lookup: VinLookup) -> Self {
        let record = lookup.record;
        Self {
            vin: record.vin,
            make: record.make,
            model: record.model,
            model_year: record.model_year,
            body_class: record.body_class,
            cached: lookup.cached,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DependencyUnavailable { reason, .. } => match reason {
                UnavailableReason::BadResponse => StatusCode::BAD_GATEWAY,
                UnavailableReason::Unreachable | UnavailableReason::Timeout => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
            AppError::Storage(_) | AppError::Export { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to API clients
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound { vin } => format!("VIN could not be decoded: {}", vin),
            AppError::Validation { message } => message.clone(),
            AppError::DependencyUnavailable { service, reason, .. } => match reason {
                UnavailableReason::Timeout => format!("{} timed out", service),
                UnavailableReason::Unreachable => format!("{} is unreachable", service),
                UnavailableReason::BadResponse => format!("{} returned an invalid response", service),
            },
            AppError::Storage(_) => "Storage operation failed".to_string(),
            AppError::Export { .. } => "Failed to export the VIN cache".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, "Request failed: {}", self);
        } else {
            tracing::debug!(status = %status, "Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::not_found("X"), StatusCode::NOT_FOUND)]
    #[case(AppError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(
        AppError::dependency_unavailable("vin-decoder", UnavailableReason::Timeout, "t"),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case(
        AppError::dependency_unavailable("vin-decoder", UnavailableReason::Unreachable, "u"),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case(
        AppError::dependency_unavailable("vin-decoder", UnavailableReason::BadResponse, "b"),
        StatusCode::BAD_GATEWAY
    )]
    #[case(AppError::Storage(sea_orm::DbErr::Custom("disk".into())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_codes(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[test]
    fn test_storage_error_does_not_leak_details() {
        let error = AppError::Storage(sea_orm::DbErr::Custom("SELECT * FROM vins".into()));
        assert_eq!(error.public_message(), "Storage operation failed");
    }
}
