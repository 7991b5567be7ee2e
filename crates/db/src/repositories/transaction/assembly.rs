//! Read views of transactions.
//!
//! The by-date view is built from a fixed number of batch queries no matter
//! how many transactions match: headers, party names, then every detail line
//! of the same filter, joined in memory by transaction id.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate};
use gledger_core::ledger::{LedgerError, PostingState};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::Serialize;
use uuid::Uuid;

use super::TransactionRepository;
use crate::entities::{transaction_details, transaction_types, transactions};
use crate::error::StoreError;
use crate::repositories::party::party_names;

/// A transaction header joined with its type label.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct TransactionView {
    /// Store-assigned id.
    pub gl_transaction_id: i64,
    /// Owning tenant.
    pub mservice_id: i64,
    /// Owning organization.
    pub organization_id: Uuid,
    /// Type id.
    pub transaction_type_id: i32,
    /// Accounting date.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub transaction_description: String,
    /// Optional paying party.
    pub from_party_id: Option<i64>,
    /// Optional receiving party.
    pub to_party_id: Option<i64>,
    /// External provenance key.
    pub posted_via_key: Option<String>,
    /// External provenance date.
    pub posted_via_date: Option<DateTime<FixedOffset>>,
    /// Creation time.
    pub created: DateTime<FixedOffset>,
    /// Last modification time.
    pub modified: DateTime<FixedOffset>,
    /// Current version.
    pub version: i32,
    /// Label of the transaction type.
    pub transaction_type: String,
}

/// A header with its committed detail lines in sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionWrapper {
    /// The header.
    pub transaction: TransactionView,
    /// Name of the paying party, if any.
    pub from_party_name: Option<String>,
    /// Name of the receiving party, if any.
    pub to_party_name: Option<String>,
    /// Committed lines ordered by sequence number.
    pub details: Vec<transaction_details::Model>,
}

impl TransactionWrapper {
    /// Whether any lines have been posted.
    #[must_use]
    pub fn posting_state(&self) -> PostingState {
        PostingState::from_line_count(self.details.len() as u64)
    }
}

impl TransactionRepository {
    /// Gets a live transaction header with its type label.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::TransactionNotFound` if there is no live row.
    pub async fn get(&self, tenant: i64, id: i64) -> Result<TransactionView, StoreError> {
        live_headers(tenant)
            .filter(transactions::Column::GlTransactionId.eq(id))
            .into_model::<TransactionView>()
            .one(&self.db)
            .await?
            .ok_or_else(|| LedgerError::TransactionNotFound(id).into())
    }

    /// Gets a transaction with its detail lines.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::TransactionNotFound` if there is no live header.
    pub async fn get_wrapper(&self, tenant: i64, id: i64) -> Result<TransactionWrapper, StoreError> {
        let header = self.get(tenant, id).await?;

        let names = party_names(&self.db, tenant, party_ids(std::slice::from_ref(&header))).await?;

        let details = transaction_details::Entity::find()
            .filter(transaction_details::Column::GlTransactionId.eq(id))
            .filter(transaction_details::Column::MserviceId.eq(tenant))
            .order_by_asc(transaction_details::Column::SequenceNumber)
            .all(&self.db)
            .await?;

        Ok(wrap(header, &names, details))
    }

    /// Gets every live transaction of an organization dated within
    /// `[start, end]`, each with its detail lines.
    ///
    /// Wrappers are ordered by date, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn wrappers_by_date(
        &self,
        tenant: i64,
        organization_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TransactionWrapper>, StoreError> {
        let headers = live_headers(tenant)
            .filter(transactions::Column::OrganizationId.eq(organization_id))
            .filter(transactions::Column::TransactionDate.between(start, end))
            .order_by_asc(transactions::Column::TransactionDate)
            .order_by_asc(transactions::Column::GlTransactionId)
            .into_model::<TransactionView>()
            .all(&self.db)
            .await?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let names = party_names(&self.db, tenant, party_ids(&headers)).await?;

        let details = transaction_details::Entity::find()
            .join(
                JoinType::InnerJoin,
                transaction_details::Relation::Transactions.def(),
            )
            .filter(transactions::Column::MserviceId.eq(tenant))
            .filter(transactions::Column::IsDeleted.eq(false))
            .filter(transactions::Column::OrganizationId.eq(organization_id))
            .filter(transactions::Column::TransactionDate.between(start, end))
            .order_by_asc(transaction_details::Column::GlTransactionId)
            .order_by_asc(transaction_details::Column::SequenceNumber)
            .all(&self.db)
            .await?;

        let mut by_transaction: HashMap<i64, Vec<transaction_details::Model>> = HashMap::new();
        for detail in details {
            by_transaction
                .entry(detail.gl_transaction_id)
                .or_default()
                .push(detail);
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let lines = by_transaction
                    .remove(&header.gl_transaction_id)
                    .unwrap_or_default();
                wrap(header, &names, lines)
            })
            .collect())
    }
}

fn live_headers(tenant: i64) -> Select<transactions::Entity> {
    transactions::Entity::find()
        .join(
            JoinType::InnerJoin,
            transactions::Relation::TransactionTypes.def(),
        )
        .column_as(transaction_types::Column::TransactionType, "transaction_type")
        .filter(transactions::Column::MserviceId.eq(tenant))
        .filter(transactions::Column::IsDeleted.eq(false))
}

fn party_ids(headers: &[TransactionView]) -> HashSet<i64> {
    headers
        .iter()
        .flat_map(|h| [h.from_party_id, h.to_party_id])
        .flatten()
        .collect()
}

fn wrap(
    transaction: TransactionView,
    names: &HashMap<i64, String>,
    details: Vec<transaction_details::Model>,
) -> TransactionWrapper {
    let name_of = |id: Option<i64>| id.and_then(|id| names.get(&id).cloned());
    TransactionWrapper {
        from_party_name: name_of(transaction.from_party_id),
        to_party_name: name_of(transaction.to_party_id),
        transaction,
        details,
    }
}
