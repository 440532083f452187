//! Cache-aside VIN lookup service
//!
//! The store is consulted first; on a miss the decoder is called and the
//! result persisted. Two lookups racing on the same unseen VIN both decode,
//! but only one insert lands: the other sees `InsertOutcome::AlreadyExists`,
//! re-reads the stored row and reports it as cached.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::database::Database;
use crate::database::repositories::{InsertOutcome, VinSeaOrmRepository};
use crate::decoder::VinDecoder;
use crate::errors::{AppError, AppResult};
use crate::models::{VinLookup, VinRecord};
use crate::services::parquet_export;

#[derive(Clone)]
pub struct VinCacheService {
    repository: VinSeaOrmRepository,
    decoder: Arc<dyn VinDecoder>,
}

impl VinCacheService {
    pub fn new(database: &Database, decoder: Arc<dyn VinDecoder>) -> Self {
        Self {
            repository: VinSeaOrmRepository::new(database.connection()),
            decoder,
        }
    }

    /// Return the attributes for a VIN, decoding and caching them on a miss
    pub async fn lookup(&self, vin: &str) -> AppResult<VinLookup> {
        if let Some(record) = self.find(vin).await? {
            info!("Returning VIN {} from cache", vin);
            return Ok(VinLookup::hit(record));
        }

        info!("Cache miss for VIN {}, querying decoder", vin);
        let attributes = self.decoder.decode(vin).await.map_err(|e| {
            warn!("Decoding VIN {} failed: {}", vin, e);
            AppError::from(e)
        })?;
        let record = VinRecord::new(vin, attributes);

        debug!("Writing VIN {} to cache", vin);
        match self.store(&record).await? {
            InsertOutcome::Inserted => Ok(VinLookup::miss(record)),
            InsertOutcome::AlreadyExists => {
                info!("VIN {} was cached by a concurrent lookup, using stored row", vin);
                self.adopt_stored_row(record).await
            }
        }
    }

    /// Settle an insert that lost to another writer. The stored row wins; if it
    /// was removed before it could be read back, this record is stored instead.
    async fn adopt_stored_row(&self, record: VinRecord) -> AppResult<VinLookup> {
        if let Some(stored) = self.find(&record.vin).await? {
            return Ok(VinLookup::hit(stored));
        }

        debug!("VIN {} was removed after a conflicting insert, retrying", record.vin);
        match self.store(&record).await? {
            InsertOutcome::Inserted => Ok(VinLookup::miss(record)),
            InsertOutcome::AlreadyExists => match self.find(&record.vin).await? {
                Some(stored) => Ok(VinLookup::hit(stored)),
                None => Err(AppError::internal(format!(
                    "VIN {} was removed while being cached",
                    record.vin
                ))),
            },
        }
    }

    /// Delete a cached VIN; true when a record existed
    pub async fn remove(&self, vin: &str) -> AppResult<bool> {
        let removed = self.repository.delete(vin).await.map_err(|e| {
            error!("Error occurred deleting VIN {}: {}", vin, e);
            AppError::from(e)
        })?;

        if removed {
            info!("Successfully removed VIN: {}", vin);
        } else {
            info!("No record found with VIN: {}. No deletion performed.", vin);
        }
        Ok(removed)
    }

    /// Encode the whole cache as a Parquet file
    pub async fn export(&self) -> AppResult<Bytes> {
        let records = self.repository.list_all().await?;
        let count = records.len();

        // Encoding is CPU-bound; keep it off the async workers
        let bytes = tokio::task::spawn_blocking(move || parquet_export::encode_records(&records))
            .await
            .map_err(|e| AppError::internal(format!("Export task failed: {}", e)))??;

        info!("Exported {} cached VINs ({} bytes)", count, bytes.len());
        Ok(bytes)
    }

    async fn store(&self, record: &VinRecord) -> AppResult<InsertOutcome> {
        self.repository.insert(record).await.map_err(|e| {
            error!("Failed to cache VIN {}: {}", record.vin, e);
            AppError::from(e)
        })
    }

    async fn find(&self, vin: &str) -> AppResult<Option<VinRecord>> {
        self.repository.find_by_vin(vin).await.map_err(|e| {
            error!("Cache read for VIN {} failed: {}", vin, e);
            AppError::from(e)
        })
    }
}
