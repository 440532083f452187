//! Error type definitions for the VIN cache service

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The decoder could not resolve the VIN
    #[error("VIN not found: {vin}")]
    NotFound { vin: String },

    /// The decoder could not be used to answer the request
    #[error("Dependency unavailable: {service} - {message}")]
    DependencyUnavailable {
        service: String,
        reason: UnavailableReason,
        message: String,
    },

    /// Local persistence failures
    #[error("Storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// Export encoding failures
    #[error("Export error: {message}")]
    Export { message: String },

    /// Rejected input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Why a dependency could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Connection refused, DNS failure and similar
    Unreachable,
    /// The request did not complete within the configured timeout
    Timeout,
    /// The dependency answered, but with an error status or an unreadable body
    BadResponse,
}

/// Errors produced by a VIN decoder
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("VIN could not be decoded: {vin}")]
    NotFound { vin: String },

    #[error("Decoder request timed out: {message}")]
    Timeout { message: String },

    #[error("Decoder unreachable: {message}")]
    Unreachable { message: String },

    #[error("Decoder returned an invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    pub fn not_found<V: Into<String>>(vin: V) -> Self {
        Self::NotFound { vin: vin.into() }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn dependency_unavailable<S: Into<String>, M: Into<String>>(
        service: S,
        reason: UnavailableReason,
        message: M,
    ) -> Self {
        Self::DependencyUnavailable {
            service: service.into(),
            reason,
            message: message.into(),
        }
    }
}

impl From<DecodeError> for AppError {
    fn from(error: DecodeError) -> Self {
        const SERVICE: &str = "vin-decoder";
        match error {
            DecodeError::NotFound { vin } => Self::NotFound { vin },
            DecodeError::Timeout { message } => {
                Self::dependency_unavailable(SERVICE, UnavailableReason::Timeout, message)
            }
            DecodeError::Unreachable { message } => {
                Self::dependency_unavailable(SERVICE, UnavailableReason::Unreachable, message)
            }
            DecodeError::InvalidResponse { message } => {
                Self::dependency_unavailable(SERVICE, UnavailableReason::BadResponse, message)
            }
        }
    }
}

impl From<parquet::errors::ParquetError> for AppError {
    fn from(error: parquet::errors::ParquetError) -> Self {
        Self::export(error.to_string())
    }
}

impl From<arrow_schema::ArrowError> for AppError {
    fn from(error: arrow_schema::ArrowError) -> Self {
        Self::export(error.to_string())
    }
}
