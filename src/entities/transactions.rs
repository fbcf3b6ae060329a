//! SeaORM Entity for transactions table
//!
//! Append-only: rows are inserted by the order recorder and never updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i32,
    pub date: DateTimeWithTimeZone,
    pub user_id: i32,
    pub amount: i64,
    pub item_id: String,
    pub driver_sponsor_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
