//! Request extractors
//!
//! Path rejections are turned into `AppError` so malformed requests get the
//! same `{"error": ...}` body as every other failure.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::errors::AppError;
use crate::web::utils::validate_vin;

/// A validated, upper-cased VIN taken from the `{vin}` path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VinPath(pub String);

impl<S> FromRequestParts<S> for VinPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    AppError::validation(format!("Invalid VIN path: {}", rejection.body_text()))
                })?;

        validate_vin(&raw).map(VinPath)
    }
}
