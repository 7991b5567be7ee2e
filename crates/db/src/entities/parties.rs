//! `SeaORM` Entity for gl_parties table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mservice_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub party_id: i64,
    pub party_name: String,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
    pub deleted: Option<DateTimeWithTimeZone>,
    pub is_deleted: bool,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
