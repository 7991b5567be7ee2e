//! Optimistic-concurrency store shared by every versioned entity.
//!
//! Each versioned table describes its tenant, key and lifecycle columns once
//! through [`VersionedEntity`]. The functions here implement the update,
//! soft-delete and live-read rules on top of that description, so no
//! repository repeats them.
//!
//! An update or delete matches a row only when tenant, key and expected
//! version all match and the row is live. A miss is reported as
//! [`StoreError::NotFound`], which is the only conflict signal callers get.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, SimpleExpr},
};
use uuid::Uuid;

use crate::entities::{
    account_types, accounts, organizations, parties, transaction_types, transactions,
};
use crate::error::StoreError;

/// Describes a tenant-scoped table with the version/soft-delete lifecycle.
pub trait VersionedEntity: EntityTrait {
    /// Key identifying a row within a tenant.
    type Key: Copy + Send + Sync + std::fmt::Debug;

    /// Entity name used in error messages.
    const NAME: &'static str;

    /// The tenant column.
    fn tenant_column() -> Self::Column;
    /// The version counter column.
    fn version_column() -> Self::Column;
    /// The soft-delete flag column.
    fn is_deleted_column() -> Self::Column;
    /// The modified timestamp column.
    fn modified_column() -> Self::Column;
    /// The deleted timestamp column.
    fn deleted_column() -> Self::Column;
    /// Condition selecting the row with `key`.
    fn key_condition(key: Self::Key) -> Condition;
}

/// A column assignment applied by [`update`].
pub type Assignment<E> = (<E as EntityTrait>::Column, SimpleExpr);

/// Builds an assignment from a plain value.
pub fn set<E, V>(column: E::Column, value: V) -> Assignment<E>
where
    E: EntityTrait,
    V: Into<sea_orm::Value>,
{
    (column, Expr::value(value.into()))
}

fn live<E: VersionedEntity>(tenant: i64) -> Condition {
    Condition::all()
        .add(E::tenant_column().eq(tenant))
        .add(E::is_deleted_column().eq(false))
}

fn next_version<E: VersionedEntity>(expected: i32) -> Result<i32, StoreError> {
    expected.checked_add(1).ok_or(StoreError::NotFound(E::NAME))
}

/// Finds a live row by key within the tenant.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn find_live<E, C>(conn: &C, tenant: i64, key: E::Key) -> Result<Option<E::Model>, DbErr>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(live::<E>(tenant))
        .filter(E::key_condition(key))
        .one(conn)
        .await
}

/// Finds a live row by key, mapping a miss to `NotFound`.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no live row matches.
pub async fn get_live<E, C>(conn: &C, tenant: i64, key: E::Key) -> Result<E::Model, StoreError>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    find_live::<E, C>(conn, tenant, key)
        .await?
        .ok_or(StoreError::NotFound(E::NAME))
}

/// Finds a live row by key and holds a share lock on it until the
/// surrounding transaction ends.
///
/// A concurrent update or soft delete of the row waits for the lock, so a
/// reference checked this way stays live until the referencing write commits.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no live row matches.
pub async fn lock_live<E, C>(conn: &C, tenant: i64, key: E::Key) -> Result<E::Model, StoreError>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(live::<E>(tenant))
        .filter(E::key_condition(key))
        .lock_shared()
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound(E::NAME))
}

/// Lists every live row of the tenant.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_live<E, C>(conn: &C, tenant: i64) -> Result<Vec<E::Model>, DbErr>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    E::find().filter(live::<E>(tenant)).all(conn).await
}

/// Applies `assignments` to the live row at `expected_version`.
///
/// Bumps the version and the modified timestamp in the same statement and
/// returns the new version.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no live row matches tenant, key and
/// version, or a database error.
pub async fn update<E, C>(
    conn: &C,
    tenant: i64,
    key: E::Key,
    expected_version: i32,
    assignments: Vec<Assignment<E>>,
) -> Result<i32, StoreError>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    let version = next_version::<E>(expected_version)?;

    let mut statement = E::update_many()
        .col_expr(E::version_column(), Expr::value(version))
        .col_expr(E::modified_column(), Expr::value(Utc::now().fixed_offset()));
    for (column, value) in assignments {
        statement = statement.col_expr(column, value);
    }

    let result = statement
        .filter(live::<E>(tenant))
        .filter(E::key_condition(key))
        .filter(E::version_column().eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 1 {
        Ok(version)
    } else {
        Err(StoreError::NotFound(E::NAME))
    }
}

/// Soft-deletes the live row at `expected_version` and returns the new version.
///
/// The row stays in the table so historical references keep resolving.
///
/// # Errors
///
/// Returns `StoreError::NotFound` if no live row matches tenant, key and
/// version, or a database error.
pub async fn soft_delete<E, C>(
    conn: &C,
    tenant: i64,
    key: E::Key,
    expected_version: i32,
) -> Result<i32, StoreError>
where
    E: VersionedEntity,
    C: ConnectionTrait,
{
    let version = next_version::<E>(expected_version)?;

    let result = E::update_many()
        .col_expr(E::version_column(), Expr::value(version))
        .col_expr(E::is_deleted_column(), Expr::value(true))
        .col_expr(E::deleted_column(), Expr::value(Utc::now().fixed_offset()))
        .filter(live::<E>(tenant))
        .filter(E::key_condition(key))
        .filter(E::version_column().eq(expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 1 {
        Ok(version)
    } else {
        Err(StoreError::NotFound(E::NAME))
    }
}

// ============================================================================
// Entity descriptions
// ============================================================================

macro_rules! versioned_entity {
    ($module:ident, $name:literal, $key:ty, |$k:ident| $condition:expr) => {
        impl VersionedEntity for $module::Entity {
            type Key = $key;

            const NAME: &'static str = $name;

            fn tenant_column() -> Self::Column {
                $module::Column::MserviceId
            }

            fn version_column() -> Self::Column {
                $module::Column::Version
            }

            fn is_deleted_column() -> Self::Column {
                $module::Column::IsDeleted
            }

            fn modified_column() -> Self::Column {
                $module::Column::Modified
            }

            fn deleted_column() -> Self::Column {
                $module::Column::Deleted
            }

            fn key_condition($k: Self::Key) -> Condition {
                Condition::all().add($condition)
            }
        }
    };
}

versioned_entity!(organizations, "organization", Uuid, |id| {
    organizations::Column::OrganizationId.eq(id)
});
versioned_entity!(account_types, "account type", i32, |id| {
    account_types::Column::AccountTypeId.eq(id)
});
versioned_entity!(transaction_types, "transaction type", i32, |id| {
    transaction_types::Column::TransactionTypeId.eq(id)
});
versioned_entity!(parties, "party", i64, |id| parties::Column::PartyId.eq(id));
versioned_entity!(accounts, "account", Uuid, |id| accounts::Column::GlAccountId.eq(id));
versioned_entity!(transactions, "transaction", i64, |id| {
    transactions::Column::GlTransactionId.eq(id)
});
