//! SeaORM migrations for the VIN cache schema

use sea_orm_migration::prelude::*;

pub mod m20250101_000001_create_vins;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_vins::Migration)]
    }
}
