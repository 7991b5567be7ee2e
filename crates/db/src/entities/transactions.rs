//! `SeaORM` Entity for gl_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub gl_transaction_id: i64,
    pub mservice_id: i64,
    pub organization_id: Uuid,
    pub transaction_type_id: i32,
    pub transaction_date: Date,
    pub transaction_description: String,
    pub from_party_id: Option<i64>,
    pub to_party_id: Option<i64>,
    pub posted_via_key: Option<String>,
    pub posted_via_date: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::transaction_types::Entity",
        from = "(Column::MserviceId, Column::TransactionTypeId)",
        to = "(super::transaction_types::Column::MserviceId, super::transaction_types::Column::TransactionTypeId)"
    )]
    TransactionTypes,
    #[sea_orm(has_many = "super::transaction_details::Entity")]
    TransactionDetails,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::transaction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionTypes.def()
    }
}

impl Related<super::transaction_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
