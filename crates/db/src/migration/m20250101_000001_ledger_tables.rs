//! Initial ledger schema.
//!
//! Parents are created before the tables holding foreign keys to them.

use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entities::{
    account_types, accounts, organizations, parties, transaction_details, transaction_types,
    transactions,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        create_table_for(manager, &schema, organizations::Entity).await?;
        create_table_for(manager, &schema, account_types::Entity).await?;
        create_table_for(manager, &schema, transaction_types::Entity).await?;
        create_table_for(manager, &schema, parties::Entity).await?;
        create_table_for(manager, &schema, accounts::Entity).await?;
        create_table_for(manager, &schema, transactions::Entity).await?;
        create_table_for(manager, &schema, transaction_details::Entity).await?;

        // By-date assembly filters on exactly these columns.
        manager
            .create_index(
                Index::create()
                    .name("idx_gl_transactions_tenant_org_date")
                    .table(transactions::Entity)
                    .col(transactions::Column::MserviceId)
                    .col(transactions::Column::OrganizationId)
                    .col(transactions::Column::TransactionDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gl_accounts_tenant_org")
                    .table(accounts::Entity)
                    .col(accounts::Column::MserviceId)
                    .col(accounts::Column::OrganizationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_for(manager, transaction_details::Entity).await?;
        drop_table_for(manager, transactions::Entity).await?;
        drop_table_for(manager, accounts::Entity).await?;
        drop_table_for(manager, parties::Entity).await?;
        drop_table_for(manager, transaction_types::Entity).await?;
        drop_table_for(manager, account_types::Entity).await?;
        drop_table_for(manager, organizations::Entity).await
    }
}

async fn create_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

async fn drop_table_for<E: EntityTrait>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
