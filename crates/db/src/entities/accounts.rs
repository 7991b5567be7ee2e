//! `SeaORM` Entity for gl_accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub gl_account_id: Uuid,
    pub mservice_id: i64,
    pub organization_id: Uuid,
    pub account_type_id: i32,
    pub account_name: String,
    pub account_description: String,
    pub created: DateTimeWithTimeZone,
    pub modified: DateTimeWithTimeZone,
    pub deleted: Option<DateTimeWithTimeZone>,
    pub is_deleted: bool,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::OrganizationId"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::account_types::Entity",
        from = "(Column::MserviceId, Column::AccountTypeId)",
        to = "(super::account_types::Column::MserviceId, super::account_types::Column::AccountTypeId)"
    )]
    AccountTypes,
    #[sea_orm(has_many = "super::transaction_details::Entity")]
    TransactionDetails,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::account_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountTypes.def()
    }
}

impl Related<super::transaction_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
