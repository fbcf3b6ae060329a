//! SeaORM Entity for driver_sponsor table
//!
//! One row per driver/sponsor enrollment. `balance` is in points and is only
//! ever written by the ledger store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_sponsor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub driver_sponsor_id: i32,
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub balance: i64,
    pub status: String,
    pub since_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::drivers::Entity",
        from = "Column::DriverId",
        to = "super::drivers::Column::DriverId"
    )]
    Driver,
    #[sea_orm(
        belongs_to = "super::sponsors::Entity",
        from = "Column::SponsorId",
        to = "super::sponsors::Column::SponsorId"
    )]
    Sponsor,
}

impl Related<super::drivers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Driver.def()
    }
}

impl Related<super::sponsors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sponsor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
