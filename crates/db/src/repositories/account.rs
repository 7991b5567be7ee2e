//! Account repository for database operations.
//!
//! Account reads are joined with the owning organization's name and the
//! account type label.

use chrono::{DateTime, FixedOffset, Utc};
use gledger_core::ledger::validate_name;
use gledger_shared::types::AccountId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, JoinType, QueryFilter, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{account_types, accounts, organizations};
use crate::error::StoreError;
use crate::store;

/// Mutable account fields.
#[derive(Debug, Clone)]
pub struct AccountFields {
    /// Owning organization; must be live in the same tenant.
    pub organization_id: Uuid,
    /// Account type; must be live in the same tenant.
    pub account_type_id: i32,
    /// Name, `[a-z0-9_-]{1,32}`.
    pub account_name: String,
    /// Free-form description.
    pub account_description: String,
}

/// An account row joined with its organization name and type label.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct AccountView {
    /// Account id.
    pub gl_account_id: Uuid,
    /// Owning tenant.
    pub mservice_id: i64,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Account type id.
    pub account_type_id: i32,
    /// Account name.
    pub account_name: String,
    /// Free-form description.
    pub account_description: String,
    /// Creation time.
    pub created: DateTime<FixedOffset>,
    /// Last modification time.
    pub modified: DateTime<FixedOffset>,
    /// Current version.
    pub version: i32,
    /// Name of the owning organization.
    pub organization_name: String,
    /// Label of the account type.
    pub account_type: String,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account at version 1.
    ///
    /// The references are checked and locked in the same database
    /// transaction as the insert.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed name, `NotFound` if the
    /// organization or account type is not live in the tenant, or a database
    /// error.
    pub async fn create(
        &self,
        tenant: i64,
        fields: AccountFields,
    ) -> Result<accounts::Model, StoreError> {
        validate_name("account_name", &fields.account_name)?;

        let txn = self.db.begin().await?;
        check_references(&txn, tenant, &fields).await?;

        let now = Utc::now().fixed_offset();
        let account = accounts::ActiveModel {
            gl_account_id: Set(AccountId::new().into_inner()),
            mservice_id: Set(tenant),
            organization_id: Set(fields.organization_id),
            account_type_id: Set(fields.account_type_id),
            account_name: Set(fields.account_name),
            account_description: Set(fields.account_description),
            created: Set(now),
            modified: Set(now),
            deleted: Set(None),
            is_deleted: Set(false),
            version: Set(1),
        };

        let account = account.insert(&txn).await?;
        txn.commit().await?;
        Ok(account)
    }

    /// Updates an account, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch, or when a new
    /// reference does not resolve.
    pub async fn update(
        &self,
        tenant: i64,
        id: Uuid,
        version: i32,
        fields: AccountFields,
    ) -> Result<i32, StoreError> {
        validate_name("account_name", &fields.account_name)?;

        let txn = self.db.begin().await?;
        check_references(&txn, tenant, &fields).await?;

        let version = store::update::<accounts::Entity, _>(
            &txn,
            tenant,
            id,
            version,
            vec![
                store::set::<accounts::Entity, _>(
                    accounts::Column::OrganizationId,
                    fields.organization_id,
                ),
                store::set::<accounts::Entity, _>(
                    accounts::Column::AccountTypeId,
                    fields.account_type_id,
                ),
                store::set::<accounts::Entity, _>(
                    accounts::Column::AccountName,
                    fields.account_name,
                ),
                store::set::<accounts::Entity, _>(
                    accounts::Column::AccountDescription,
                    fields.account_description,
                ),
            ],
        )
        .await?;

        txn.commit().await?;
        Ok(version)
    }

    /// Soft-deletes an account, returning the new version.
    ///
    /// Detail lines already posted against it keep referencing the row.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn delete(&self, tenant: i64, id: Uuid, version: i32) -> Result<i32, StoreError> {
        store::soft_delete::<accounts::Entity, _>(&self.db, tenant, id, version).await
    }

    /// Gets a live account with its organization name and type label.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live row.
    pub async fn get(&self, tenant: i64, id: Uuid) -> Result<AccountView, StoreError> {
        live_views(tenant)
            .filter(accounts::Column::GlAccountId.eq(id))
            .into_model::<AccountView>()
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("account"))
    }

    /// Lists the tenant's live accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant: i64) -> Result<Vec<AccountView>, StoreError> {
        Ok(live_views(tenant)
            .into_model::<AccountView>()
            .all(&self.db)
            .await?)
    }

    /// Lists the live accounts of one organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_organization(
        &self,
        tenant: i64,
        organization_id: Uuid,
    ) -> Result<Vec<AccountView>, StoreError> {
        Ok(live_views(tenant)
            .filter(accounts::Column::OrganizationId.eq(organization_id))
            .into_model::<AccountView>()
            .all(&self.db)
            .await?)
    }
}

fn live_views(tenant: i64) -> Select<accounts::Entity> {
    accounts::Entity::find()
        .join(JoinType::InnerJoin, accounts::Relation::Organizations.def())
        .join(JoinType::InnerJoin, accounts::Relation::AccountTypes.def())
        .column_as(organizations::Column::OrganizationName, "organization_name")
        .column_as(account_types::Column::AccountType, "account_type")
        .filter(accounts::Column::MserviceId.eq(tenant))
        .filter(accounts::Column::IsDeleted.eq(false))
}

async fn check_references<C: ConnectionTrait>(
    conn: &C,
    tenant: i64,
    fields: &AccountFields,
) -> Result<(), StoreError> {
    store::lock_live::<organizations::Entity, _>(conn, tenant, fields.organization_id).await?;
    store::lock_live::<account_types::Entity, _>(conn, tenant, fields.account_type_id).await?;
    Ok(())
}
