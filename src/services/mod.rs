//! Service layer

pub mod parquet_export;
pub mod vin_cache;

pub use vin_cache::VinCacheService;
