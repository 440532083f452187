//! OpenAPI documentation generated from the handler annotations

use utoipa::OpenApi;

use crate::web::handlers;
use crate::web::responses::{ErrorResponse, HealthResponse, MessageResponse, VinLookupResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VIN Cache API",
        description = "Decode VINs through NHTSA vPIC with a local lookaside cache and Parquet export"
    ),
    paths(
        handlers::vins::lookup_vin,
        handlers::vins::remove_vin,
        handlers::vins::export_vins,
        handlers::health::health_check,
    ),
    components(schemas(VinLookupResponse, MessageResponse, ErrorResponse, HealthResponse)),
    tags(
        (name = "vins", description = "VIN lookup, removal and export"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
