//! `SeaORM` Entity for gl_account_types table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_account_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub mservice_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub account_type_id: i32,
    pub account_type: String,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
    pub deleted: Option<DateTimeWithTimeZone>,
    pub is_deleted: bool,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
