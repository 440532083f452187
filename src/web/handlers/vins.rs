//! VIN lookup, removal and export handlers
//!
//! Thin wrappers around `VinCacheService`: validate the path, call the
//! service, shape the response.

use axum::{
    Json,
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::services::parquet_export::PARQUET_CONTENT_TYPE;
use crate::web::{
    AppState,
    extractors::VinPath,
    responses::{ErrorResponse, MessageResponse, VinLookupResponse},
};

/// Look up a VIN, decoding and caching it on first use
#[utoipa::path(
    get,
    path = "/v1/lookup/{vin}",
    tag = "vins",
    params(("vin" = String, Path, description = "17 alphanumeric characters")),
    responses(
        (status = 200, description = "Decoded VIN", body = VinLookupResponse),
        (status = 404, description = "VIN could not be decoded", body = ErrorResponse),
        (status = 422, description = "Malformed VIN", body = ErrorResponse),
        (status = 502, description = "Decoder returned an invalid response", body = ErrorResponse),
        (status = 503, description = "Decoder unreachable or timed out", body = ErrorResponse)
    )
)]
pub async fn lookup_vin(
    State(state): State<AppState>,
    VinPath(vin): VinPath,
) -> Result<Json<VinLookupResponse>, AppError> {
    let lookup = state.vin_cache.lookup(&vin).await?;
    Ok(Json(lookup.into()))
}

/// Remove a VIN from the cache; succeeds whether or not it was cached
#[utoipa::path(
    delete,
    path = "/v1/remove/{vin}",
    tag = "vins",
    params(("vin" = String, Path, description = "17 alphanumeric characters")),
    responses(
        (status = 200, description = "Removal result", body = MessageResponse),
        (status = 422, description = "Malformed VIN", body = ErrorResponse)
    )
)]
pub async fn remove_vin(
    State(state): State<AppState>,
    VinPath(vin): VinPath,
) -> Result<Json<MessageResponse>, AppError> {
    let message = if state.vin_cache.remove(&vin).await? {
        format!("Successfully removed VIN: {}.", vin)
    } else {
        format!("No record found with VIN: {}. No deletion.", vin)
    };
    Ok(Json(MessageResponse { message }))
}

/// Download the whole cache as a Parquet file
#[utoipa::path(
    get,
    path = "/v1/export",
    tag = "vins",
    responses(
        (status = 200, description = "Parquet file (application/vnd.apache.parquet) with one row per cached VIN"),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
pub async fn export_vins(State(state): State<AppState>) -> Result<Response, AppError> {
    let bytes = state.vin_cache.export().await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        state.config.export.filename
    ))
    .map_err(|e| AppError::internal(format!("Invalid export filename: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(PARQUET_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
