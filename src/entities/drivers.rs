//! `SeaORM` Entity for drivers table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "drivers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub driver_id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::driver_sponsor::Entity")]
    DriverSponsor,
}

impl Related<super::driver_sponsor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DriverSponsor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
