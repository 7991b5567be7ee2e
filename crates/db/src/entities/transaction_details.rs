//! `SeaORM` Entity for gl_transaction_details table.
//!
//! Detail rows are append-only; nothing updates or deletes them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_transaction_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub gl_transaction_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub sequence_number: i32,
    pub mservice_id: i64,
    pub gl_account_id: Uuid,
    #[sea_orm(column_type = "Decimal(None)")]
    pub amount: Decimal,
    pub is_debit: bool,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::GlTransactionId",
        to = "super::transactions::Column::GlTransactionId"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::GlAccountId",
        to = "super::accounts::Column::GlAccountId"
    )]
    Accounts,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
