use sea_orm::entity::prelude::*;

use crate::models::VinRecord;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vin: String,
    pub make: String,
    pub model: String,
    pub model_year: String,
    pub body_class: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for VinRecord {
    fn from(model: Model) -> Self {
        Self {
            vin: model.vin,
            make: model.make,
            model: model.model,
            model_year: model.model_year,
            body_class: model.body_class,
        }
    }
}
