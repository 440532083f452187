//! Create the vins table
//!
//! One row per decoded VIN. The primary key on `vin` is what makes racing
//! first-time inserts of the same VIN safe.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vins::Vin).string().not_null().primary_key())
                    .col(ColumnDef::new(Vins::Make).string().not_null())
                    .col(ColumnDef::new(Vins::Model).string().not_null())
                    .col(ColumnDef::new(Vins::ModelYear).string().not_null())
                    .col(ColumnDef::new(Vins::BodyClass).string().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Vins {
    Table,
    Vin,
    Make,
    Model,
    ModelYear,
    BodyClass,
}
