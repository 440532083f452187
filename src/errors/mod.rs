//! Centralized error handling for the VIN cache service
//!
//! # Error Categories
//!
//! - **NotFound**: the decoder could not resolve the VIN
//! - **DependencyUnavailable**: the decoder could not be reached or answered badly
//! - **Storage**: local persistence failures
//! - **Validation**: malformed input rejected at the HTTP boundary
//!
//! Insert races on the same VIN are resolved inside the repository layer and
//! never surface as errors.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
