/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/vin-cache.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT: &str = "5s";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Decoder defaults
pub const DEFAULT_DECODER_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
pub const DEFAULT_DECODER_TIMEOUT: &str = "10s";
pub const DEFAULT_DECODER_CONNECT_TIMEOUT: &str = "5s";

// Export defaults
pub const DEFAULT_EXPORT_FILENAME: &str = "vin_cache.parquet";

/// Prefix for environment variable overrides, e.g. `VIN_CACHE_WEB__PORT`
pub const ENV_PREFIX: &str = "VIN_CACHE_";
