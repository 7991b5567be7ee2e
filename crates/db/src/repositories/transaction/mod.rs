//! Transaction repository: header lifecycle and detail posting.
//!
//! Headers follow the same versioned lifecycle as every other entity.
//! Detail lines are appended only through [`TransactionRepository::add_details`],
//! which commits a balanced batch atomically or writes nothing.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use gledger_core::ledger::{
    DetailLine, LedgerError, NumberedLine, number_lines, validate_balance,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, organizations, parties, transaction_details, transaction_types, transactions,
};
use crate::error::StoreError;
use crate::store;

mod assembly;

pub use assembly::{TransactionView, TransactionWrapper};

/// Mutable transaction header fields.
#[derive(Debug, Clone)]
pub struct TransactionFields {
    /// Owning organization; must be live in the same tenant.
    pub organization_id: Uuid,
    /// Transaction type; must be live in the same tenant.
    pub transaction_type_id: i32,
    /// Accounting date.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub transaction_description: String,
    /// Optional paying party.
    pub from_party_id: Option<i64>,
    /// Optional receiving party.
    pub to_party_id: Option<i64>,
    /// Key of the external event this transaction was posted from.
    pub posted_via_key: Option<String>,
    /// When the external event happened.
    pub posted_via_date: Option<DateTime<FixedOffset>>,
}

/// Transaction repository.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a transaction header at version 1 with a store-assigned id.
    ///
    /// References are checked and locked in the insert's database
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if a referenced organization, type or party is not
    /// live in the tenant, or a database error.
    pub async fn create(
        &self,
        tenant: i64,
        fields: TransactionFields,
    ) -> Result<transactions::Model, StoreError> {
        let txn = self.db.begin().await?;
        check_references(&txn, tenant, &fields).await?;

        let now = Utc::now().fixed_offset();
        let header = transactions::ActiveModel {
            mservice_id: Set(tenant),
            organization_id: Set(fields.organization_id),
            transaction_type_id: Set(fields.transaction_type_id),
            transaction_date: Set(fields.transaction_date),
            transaction_description: Set(fields.transaction_description),
            from_party_id: Set(fields.from_party_id),
            to_party_id: Set(fields.to_party_id),
            posted_via_key: Set(fields.posted_via_key),
            posted_via_date: Set(fields.posted_via_date),
            created: Set(now),
            modified: Set(now),
            deleted: Set(None),
            is_deleted: Set(false),
            version: Set(1),
            ..Default::default()
        };

        let header = header.insert(&txn).await?;
        txn.commit().await?;
        Ok(header)
    }

    /// Updates header fields only, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch, or when a
    /// reference does not resolve.
    pub async fn update(
        &self,
        tenant: i64,
        id: i64,
        version: i32,
        fields: TransactionFields,
    ) -> Result<i32, StoreError> {
        type T = transactions::Entity;

        let txn = self.db.begin().await?;
        check_references(&txn, tenant, &fields).await?;

        let version = store::update::<T, _>(
            &txn,
            tenant,
            id,
            version,
            vec![
                store::set::<T, _>(transactions::Column::OrganizationId, fields.organization_id),
                store::set::<T, _>(
                    transactions::Column::TransactionTypeId,
                    fields.transaction_type_id,
                ),
                store::set::<T, _>(
                    transactions::Column::TransactionDate,
                    fields.transaction_date,
                ),
                store::set::<T, _>(
                    transactions::Column::TransactionDescription,
                    fields.transaction_description,
                ),
                store::set::<T, _>(transactions::Column::FromPartyId, fields.from_party_id),
                store::set::<T, _>(transactions::Column::ToPartyId, fields.to_party_id),
                store::set::<T, _>(transactions::Column::PostedViaKey, fields.posted_via_key),
                store::set::<T, _>(transactions::Column::PostedViaDate, fields.posted_via_date),
            ],
        )
        .await?;

        txn.commit().await?;
        Ok(version)
    }

    /// Soft-deletes a transaction header, returning the new version.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` on a version or liveness mismatch.
    pub async fn delete(&self, tenant: i64, id: i64, version: i32) -> Result<i32, StoreError> {
        store::soft_delete::<transactions::Entity, _>(&self.db, tenant, id, version).await
    }

    /// Appends a balanced batch of detail lines to a transaction.
    ///
    /// Runs in one database transaction:
    /// 1. Lock the live header row of the tenant.
    /// 2. Check every referenced account is live in the tenant and lock it.
    /// 3. Check the batch balances exactly.
    /// 4. Number the lines after the highest committed sequence number and
    ///    insert them together.
    ///
    /// Any failure rolls back, so either all lines are committed or none.
    /// An empty batch is balanced and commits nothing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::TransactionNotFound`,
    /// `LedgerError::AccountNotFound`, `LedgerError::UnbalancedTransaction`,
    /// or a database error.
    pub async fn add_details(
        &self,
        tenant: i64,
        id: i64,
        lines: Vec<DetailLine>,
    ) -> Result<Vec<NumberedLine>, StoreError> {
        let txn = self.db.begin().await?;

        transactions::Entity::find()
            .filter(transactions::Column::GlTransactionId.eq(id))
            .filter(transactions::Column::MserviceId.eq(tenant))
            .filter(transactions::Column::IsDeleted.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))?;

        check_accounts(&txn, tenant, &lines).await?;
        validate_balance(&lines)?;

        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let last_committed = transaction_details::Entity::find()
            .filter(transaction_details::Column::GlTransactionId.eq(id))
            .order_by_desc(transaction_details::Column::SequenceNumber)
            .one(&txn)
            .await?
            .map_or(0, |last| last.sequence_number);

        let numbered = number_lines(last_committed, lines)?;
        let now = Utc::now().fixed_offset();
        let rows = numbered.iter().map(|n| transaction_details::ActiveModel {
            gl_transaction_id: Set(id),
            sequence_number: Set(n.sequence_number),
            mservice_id: Set(tenant),
            gl_account_id: Set(n.line.account_id.into_inner()),
            amount: Set(n.line.amount),
            is_debit: Set(n.line.entry_type.is_debit()),
            created: Set(now),
        });

        transaction_details::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;

        tracing::debug!(
            transaction_id = id,
            lines = numbered.len(),
            "detail lines committed"
        );

        Ok(numbered)
    }
}

/// Checks and share-locks every account referenced by the batch in one query.
async fn check_accounts<C: ConnectionTrait>(
    conn: &C,
    tenant: i64,
    lines: &[DetailLine],
) -> Result<(), StoreError> {
    let wanted: HashSet<Uuid> = lines.iter().map(|l| l.account_id.into_inner()).collect();
    if wanted.is_empty() {
        return Ok(());
    }

    let found: HashSet<Uuid> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::GlAccountId)
        .filter(accounts::Column::MserviceId.eq(tenant))
        .filter(accounts::Column::IsDeleted.eq(false))
        .filter(accounts::Column::GlAccountId.is_in(wanted.iter().copied()))
        .lock_shared()
        .into_tuple::<Uuid>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    // Report the first missing account in submission order.
    match lines
        .iter()
        .map(|l| l.account_id.into_inner())
        .find(|id| !found.contains(id))
    {
        Some(missing) => Err(LedgerError::AccountNotFound(missing).into()),
        None => Ok(()),
    }
}

async fn check_references<C: ConnectionTrait>(
    conn: &C,
    tenant: i64,
    fields: &TransactionFields,
) -> Result<(), StoreError> {
    store::lock_live::<organizations::Entity, _>(conn, tenant, fields.organization_id).await?;
    store::lock_live::<transaction_types::Entity, _>(conn, tenant, fields.transaction_type_id)
        .await?;
    for party in [fields.from_party_id, fields.to_party_id].into_iter().flatten() {
        store::lock_live::<parties::Entity, _>(conn, tenant, party).await?;
    }
    Ok(())
}
