//! SeaORM repository implementations

pub mod vin;

// Re-export for convenience
pub use vin::{InsertOutcome, VinSeaOrmRepository};
