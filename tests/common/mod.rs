//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vin_cache::{
    config::Config,
    database::Database,
    decoder::VinDecoder,
    errors::DecodeError,
    models::VehicleAttributes,
    services::VinCacheService,
    web::{AppState, create_app},
};

pub const PETERBILT_VIN: &str = "1XPWD40X1ED215307";
pub const TESLA_VIN: &str = "5YJ3E1EA7KF317000";
pub const UNKNOWN_VIN: &str = "AAAAAAAAAAAAAAAAA";

pub fn peterbilt() -> VehicleAttributes {
    VehicleAttributes {
        make: "PETERBILT".to_string(),
        model: "388".to_string(),
        model_year: "2014".to_string(),
        body_class: "Truck-Tractor".to_string(),
    }
}

pub fn tesla() -> VehicleAttributes {
    VehicleAttributes {
        make: "TESLA".to_string(),
        model: "Model 3".to_string(),
        model_year: "2019".to_string(),
        body_class: "Sedan/Saloon".to_string(),
    }
}

/// In-memory decoder answering from a fixed table and counting calls
#[derive(Default)]
pub struct StaticDecoder {
    vehicles: HashMap<String, VehicleAttributes>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl StaticDecoder {
    pub fn with_known_vehicles() -> Self {
        let mut vehicles = HashMap::new();
        vehicles.insert(PETERBILT_VIN.to_string(), peterbilt());
        vehicles.insert(TESLA_VIN.to_string(), tesla());
        Self {
            vehicles,
            ..Self::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VinDecoder for StaticDecoder {
    async fn decode(&self, vin: &str) -> Result<VehicleAttributes, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(DecodeError::Unreachable {
                message: "connection refused".to_string(),
            });
        }
        self.vehicles
            .get(vin)
            .cloned()
            .ok_or_else(|| DecodeError::NotFound {
                vin: vin.to_string(),
            })
    }
}

/// Router backed by a fresh in-memory database and the given decoder
pub async fn create_test_app(decoder: Arc<dyn VinDecoder>) -> (axum::Router, Database) {
    let database = Database::new_in_memory()
        .await
        .expect("Failed to create test database");
    let service = VinCacheService::new(&database, decoder);
    let state = AppState::new(Config::default(), database.clone(), service);
    (create_app(state), database)
}
