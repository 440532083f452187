//! VIN decoding clients
//!
//! The cache only needs `decode(vin) -> attributes | not found | unavailable`;
//! [`VinDecoder`] is that seam, with [`NhtsaDecoder`] as the production client.

use async_trait::async_trait;

use crate::errors::DecodeError;
use crate::models::VehicleAttributes;

pub mod nhtsa;

pub use nhtsa::NhtsaDecoder;

/// Resolves a VIN to vehicle attributes using an external source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VinDecoder: Send + Sync {
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes, DecodeError>;
}
