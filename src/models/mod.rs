use serde::{Deserialize, Serialize};

/// Attributes returned by the decoder for a resolvable VIN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    pub make: String,
    pub model: String,
    pub model_year: String,
    pub body_class: String,
}

/// One decoded VIN as stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VinRecord {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub model_year: String,
    pub body_class: String,
}

impl VinRecord {
    pub fn new(vin: impl Into<String>, attributes: VehicleAttributes) -> Self {
        Self {
            vin: vin.into(),
            make: attributes.make,
            model: attributes.model,
            model_year: attributes.model_year,
            body_class: attributes.body_class,
        }
    }

    pub fn attributes(&self) -> VehicleAttributes {
        VehicleAttributes {
            make: self.make.clone(),
            model: self.model.clone(),
            model_year: self.model_year.clone(),
            body_class: self.body_class.clone(),
        }
    }
}

/// Result of a cache-aside lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VinLookup {
    pub record: VinRecord,
    /// False only for the lookup whose decode produced the stored row
    pub cached: bool,
}

impl VinLookup {
    pub fn hit(record: VinRecord) -> Self {
        Self {
            record,
            cached: true,
        }
    }

    pub fn miss(record: VinRecord) -> Self {
        Self {
            record,
            cached: false,
        }
    }
}
