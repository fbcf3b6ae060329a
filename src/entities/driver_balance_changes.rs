//! SeaORM Entity for driver_balance_changes table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_balance_changes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub balance_change_id: i32,
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub reason: String,
    pub points_change: i64,
    pub balance_after: i64,
    pub actor_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
