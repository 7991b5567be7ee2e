//! Organization repository for database operations.

use chrono::{NaiveDate, Utc};
use gledger_core::ledger::validate_name;
use gledger_shared::types::OrganizationId;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

use crate::entities::organizations;
use crate::error::StoreError;
use crate::store;

/// Mutable organization fields.
#[derive(Debug, Clone)]
pub struct OrganizationFields {
    /// Name, `[a-z0-9_-]{1,32}`.
    pub organization_name: String,
    /// First effective day.
    pub from_date: NaiveDate,
    /// Last effective day, open-ended when `None`.
    pub to_date: Option<NaiveDate>,
}

/// Organization repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an organization at version 1.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed name, or a database error.
    pub async fn create(
        &self,
        tenant: i64,
        fields: OrganizationFields,
    ) -> Result<organizations::Model, StoreError> {
        validate_name("organization_name", &fields.organization_name)?;

        let now = Utc::now().fixed_offset();
        let organization = organizations::ActiveModel {
            organization_id: Set(OrganizationId::new().into_inner()),
            mservice_id: Set(tenant),
            organization_name: Set(fields.organization_name),
            from_date: Set(fields.from_date),
            to_date: Set(fields.to_date),
            created: Set(now),
            modified: Set(now),
            deleted: Set(None),
            is_deleted: Set(false),
            version: Set(1),
        };

        Ok(organization.insert(&self.db).await?)
    }

    /// Updates an organization, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn update(
        &self,
        tenant: i64,
        id: Uuid,
        version: i32,
        fields: OrganizationFields,
    ) -> Result<i32, StoreError> {
        validate_name("organization_name", &fields.organization_name)?;

        store::update::<organizations::Entity, _>(
            &self.db,
            tenant,
            id,
            version,
            vec![
                store::set::<organizations::Entity, _>(
                    organizations::Column::OrganizationName,
                    fields.organization_name,
                ),
                store::set::<organizations::Entity, _>(
                    organizations::Column::FromDate,
                    fields.from_date,
                ),
                store::set::<organizations::Entity, _>(
                    organizations::Column::ToDate,
                    fields.to_date,
                ),
            ],
        )
        .await
    }

    /// Soft-deletes an organization, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn delete(&self, tenant: i64, id: Uuid, version: i32) -> Result<i32, StoreError> {
        store::soft_delete::<organizations::Entity, _>(&self.db, tenant, id, version).await
    }

    /// Gets a live organization.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist, is deleted, or belongs to
    /// another tenant.
    pub async fn get(&self, tenant: i64, id: Uuid) -> Result<organizations::Model, StoreError> {
        store::get_live::<organizations::Entity, _>(&self.db, tenant, id).await
    }

    /// Lists the tenant's live organizations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant: i64) -> Result<Vec<organizations::Model>, StoreError> {
        Ok(store::list_live::<organizations::Entity, _>(&self.db, tenant).await?)
    }
}
