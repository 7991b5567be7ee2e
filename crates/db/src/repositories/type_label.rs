//! Account type and transaction type repositories.
//!
//! Both tables hold a tenant-scoped, caller-keyed label with the usual
//! version/soft-delete lifecycle, so one macro generates both repositories.

use chrono::Utc;
use gledger_core::ledger::validate_label;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::entities::{account_types, transaction_types};
use crate::error::StoreError;
use crate::store;

macro_rules! type_repository {
    (
        $(#[$meta:meta])*
        $repository:ident,
        $module:ident,
        $field:literal,
        $key:ident,
        $label:ident => $label_column:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $repository {
            db: DatabaseConnection,
        }

        impl $repository {
            /// Creates a new repository.
            #[must_use]
            pub const fn new(db: DatabaseConnection) -> Self {
                Self { db }
            }

            /// Creates a row at version 1 under a caller-assigned id.
            ///
            /// # Errors
            ///
            /// Returns a validation error for a bad label, or a database
            /// error if the id is already taken within the tenant.
            pub async fn create(
                &self,
                tenant: i64,
                id: i32,
                label: String,
            ) -> Result<$module::Model, StoreError> {
                validate_label($field, &label)?;

                let now = Utc::now().fixed_offset();
                let model = $module::ActiveModel {
                    mservice_id: Set(tenant),
                    $key: Set(id),
                    $label: Set(label),
                    created: Set(now),
                    modified: Set(now),
                    deleted: Set(None),
                    is_deleted: Set(false),
                    version: Set(1),
                };

                Ok(model.insert(&self.db).await?)
            }

            /// Renames the row, returning the new version.
            ///
            /// # Errors
            ///
            /// Returns `NotFound` on a version or liveness mismatch.
            pub async fn update(
                &self,
                tenant: i64,
                id: i32,
                version: i32,
                label: String,
            ) -> Result<i32, StoreError> {
                validate_label($field, &label)?;

                store::update::<$module::Entity, _>(
                    &self.db,
                    tenant,
                    id,
                    version,
                    vec![store::set::<$module::Entity, _>(
                        $module::Column::$label_column,
                        label,
                    )],
                )
                .await
            }

            /// Soft-deletes the row, returning the new version.
            ///
            /// # Errors
            ///
            /// Returns `NotFound` on a version or liveness mismatch.
            pub async fn delete(
                &self,
                tenant: i64,
                id: i32,
                version: i32,
            ) -> Result<i32, StoreError> {
                store::soft_delete::<$module::Entity, _>(&self.db, tenant, id, version).await
            }

            /// Gets a live row.
            ///
            /// # Errors
            ///
            /// Returns `NotFound` if there is no live row.
            pub async fn get(&self, tenant: i64, id: i32) -> Result<$module::Model, StoreError> {
                store::get_live::<$module::Entity, _>(&self.db, tenant, id).await
            }

            /// Lists the tenant's live rows.
            ///
            /// # Errors
            ///
            /// Returns an error if the database query fails.
            pub async fn list(&self, tenant: i64) -> Result<Vec<$module::Model>, StoreError> {
                Ok(store::list_live::<$module::Entity, _>(&self.db, tenant).await?)
            }
        }
    };
}

type_repository!(
    /// Account type repository.
    AccountTypeRepository,
    account_types,
    "account_type",
    account_type_id,
    account_type => AccountType
);

type_repository!(
    /// Transaction type repository.
    TransactionTypeRepository,
    transaction_types,
    "transaction_type",
    transaction_type_id,
    transaction_type => TransactionType
);
