//! `SeaORM` Entity for sponsors table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sponsors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub sponsor_id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub name: String,
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
