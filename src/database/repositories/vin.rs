//! SeaORM-based repository for cached VIN records

use sea_orm::{
    ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, SqlErr,
    sea_query::OnConflict,
};
use std::sync::Arc;
use tracing::debug;

use crate::entities::{prelude::Vins, vins};
use crate::models::VinRecord;

/// Outcome of inserting a freshly decoded record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another writer stored this VIN first; the existing row was left untouched
    AlreadyExists,
}

/// SeaORM-based repository for the vins table
#[derive(Clone)]
pub struct VinSeaOrmRepository {
    connection: Arc<DatabaseConnection>,
}

impl VinSeaOrmRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Find a record by exact VIN
    pub async fn find_by_vin(&self, vin: &str) -> Result<Option<VinRecord>, DbErr> {
        let model = Vins::find_by_id(vin.to_string())
            .one(&*self.connection)
            .await?;
        Ok(model.map(VinRecord::from))
    }

    /// Insert a record, relying on the primary key to settle concurrent inserts
    pub async fn insert(&self, record: &VinRecord) -> Result<InsertOutcome, DbErr> {
        let active_model = vins::ActiveModel {
            vin: Set(record.vin.clone()),
            make: Set(record.make.clone()),
            model: Set(record.model.clone()),
            model_year: Set(record.model_year.clone()),
            body_class: Set(record.body_class.clone()),
        };

        let result = Vins::insert(active_model)
            .on_conflict(OnConflict::column(vins::Column::Vin).do_nothing().to_owned())
            .exec_without_returning(&*self.connection)
            .await;

        match result {
            Ok(0) => {
                debug!("Insert for VIN {} skipped, row already present", record.vin);
                Ok(InsertOutcome::AlreadyExists)
            }
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(DbErr::RecordNotInserted) => Ok(InsertOutcome::AlreadyExists),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a record, reporting whether one existed
    pub async fn delete(&self, vin: &str) -> Result<bool, DbErr> {
        let result = Vins::delete_by_id(vin.to_string())
            .exec(&*self.connection)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Every stored record, ordered by VIN
    pub async fn list_all(&self) -> Result<Vec<VinRecord>, DbErr> {
        let models = Vins::find()
            .order_by_asc(vins::Column::Vin)
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(VinRecord::from).collect())
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Vins::find().count(&*self.connection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn peterbilt() -> VinRecord {
        VinRecord {
            vin: "1XPWD40X1ED215307".to_string(),
            make: "PETERBILT".to_string(),
            model: "388".to_string(),
            model_year: "2014".to_string(),
            body_class: "Truck-Tractor".to_string(),
        }
    }

    async fn create_test_repository() -> VinSeaOrmRepository {
        let database = Database::new_in_memory().await.unwrap();
        VinSeaOrmRepository::new(database.connection())
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = create_test_repository().await;
        let record = peterbilt();

        assert_eq!(repo.find_by_vin(&record.vin).await.unwrap(), None);
        assert_eq!(repo.insert(&record).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(repo.find_by_vin(&record.vin).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_first_row() {
        let repo = create_test_repository().await;
        let record = peterbilt();
        repo.insert(&record).await.unwrap();

        let mut rival = record.clone();
        rival.model = "389".to_string();
        let outcome = repo.insert(&rival).await.unwrap();

        assert_eq!(outcome, InsertOutcome::AlreadyExists);
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_vin(&record.vin).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let repo = create_test_repository().await;
        let record = peterbilt();
        repo.insert(&record).await.unwrap();

        assert!(repo.delete(&record.vin).await.unwrap());
        assert!(!repo.delete(&record.vin).await.unwrap());
        assert_eq!(repo.find_by_vin(&record.vin).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_all_is_ordered_by_vin() {
        let repo = create_test_repository().await;
        let mut second = peterbilt();
        second.vin = "5YJ3E1EA7KF317000".to_string();
        repo.insert(&second).await.unwrap();
        repo.insert(&peterbilt()).await.unwrap();

        let vins: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.vin)
            .collect();

        assert_eq!(vins, vec!["1XPWD40X1ED215307", "5YJ3E1EA7KF317000"]);
    }
}
