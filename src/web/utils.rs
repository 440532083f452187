//! Web utility functions

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::AppError;

/// 17 alphanumeric characters, the shape of a modern VIN
static VIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{17}$").expect("VIN pattern is valid"));

/// Validate a VIN path parameter and normalise it to upper case
pub fn validate_vin(vin: &str) -> Result<String, AppError> {
    if VIN_PATTERN.is_match(vin) {
        Ok(vin.to_ascii_uppercase())
    } else {
        Err(AppError::validation(format!(
            "Invalid VIN '{}': expected 17 alphanumeric characters",
            vin
        )))
    }
}
