//! The ledger operation set.
//!
//! [`LedgerApi`] is implemented twice: by [`crate::service::LedgerService`],
//! which talks to the store, and by [`crate::gate::AuthGate`], which wraps
//! any other implementation with token checks. The transport only ever sees
//! the trait.

mod requests;

pub use requests::*;

use async_trait::async_trait;
use gledger_db::entities::{account_types, organizations, parties, transaction_types};
use gledger_db::{AccountView, TransactionView, TransactionWrapper};
use gledger_shared::{AppError, ErrorCode};
use serde::Serialize;
use uuid::Uuid;

/// Per-call metadata supplied by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallMetadata {
    /// Bearer token, if the caller sent one.
    pub token: Option<String>,
}

impl CallMetadata {
    /// Metadata carrying a token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Response envelope shared by every operation.
///
/// Business failures are reported here, never as transport errors.
/// `data` is present only when `error_code` is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply<T> {
    /// Numeric outcome code.
    pub error_code: ErrorCode,
    /// Human readable failure description, empty on success.
    pub error_message: String,
    /// Operation payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Reply<T> {
    /// A successful reply.
    pub const fn ok(data: T) -> Self {
        Self {
            error_code: ErrorCode::Ok,
            error_message: String::new(),
            data: Some(data),
        }
    }

    /// A failed reply.
    pub fn error(err: &AppError) -> Self {
        Self {
            error_code: err.code(),
            error_message: err.message(),
            data: None,
        }
    }

    /// Whether the call succeeded.
    pub const fn is_ok(&self) -> bool {
        self.error_code.is_ok()
    }
}

impl<T, E> From<Result<T, E>> for Reply<T>
where
    E: Into<AppError>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::error(&err.into()),
        }
    }
}

/// Key and version of a row after a create, update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Versioned<K> {
    /// The row key.
    pub id: K,
    /// The row version after the write.
    pub version: i32,
}

/// Build and uptime of the running server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerVersion {
    /// Crate version.
    pub version: String,
    /// Whole seconds since the service was constructed.
    pub uptime_secs: u64,
}

/// Sequence numbers assigned to a posted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedDetails {
    /// The transaction the lines were added to.
    pub gl_transaction_id: i64,
    /// Numbers given to the submitted lines, in submission order.
    pub sequence_numbers: Vec<i32>,
}

/// The complete ledger operation set.
///
/// Every request carries an `mservice_id` tenant field. Implementations
/// behind the gate may trust it; the gate overwrites whatever the caller
/// sent with the tenant from the token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Reports the build version and uptime. Needs no token.
    async fn get_server_version(
        &self,
        meta: &CallMetadata,
        req: GetServerVersionRequest,
    ) -> Reply<ServerVersion>;

    // ========== Organizations ==========

    /// Creates an organization.
    async fn create_organization(
        &self,
        meta: &CallMetadata,
        req: CreateOrganizationRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Updates an organization at the given version.
    async fn update_organization(
        &self,
        meta: &CallMetadata,
        req: UpdateOrganizationRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Soft-deletes an organization at the given version.
    async fn delete_organization(
        &self,
        meta: &CallMetadata,
        req: DeleteOrganizationRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Gets a live organization.
    async fn get_organization_by_id(
        &self,
        meta: &CallMetadata,
        req: GetOrganizationByIdRequest,
    ) -> Reply<organizations::Model>;

    /// Lists the tenant's live organizations.
    async fn get_organizations_by_tenant(
        &self,
        meta: &CallMetadata,
        req: GetOrganizationsByTenantRequest,
    ) -> Reply<Vec<organizations::Model>>;

    // ========== Account types ==========

    /// Creates an account type under a caller-chosen id.
    async fn create_account_type(
        &self,
        meta: &CallMetadata,
        req: CreateAccountTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Relabels an account type at the given version.
    async fn update_account_type(
        &self,
        meta: &CallMetadata,
        req: UpdateAccountTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Soft-deletes an account type at the given version.
    async fn delete_account_type(
        &self,
        meta: &CallMetadata,
        req: DeleteAccountTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Gets a live account type.
    async fn get_account_type_by_id(
        &self,
        meta: &CallMetadata,
        req: GetAccountTypeByIdRequest,
    ) -> Reply<account_types::Model>;

    /// Lists the tenant's live account types.
    async fn get_account_types_by_tenant(
        &self,
        meta: &CallMetadata,
        req: GetAccountTypesByTenantRequest,
    ) -> Reply<Vec<account_types::Model>>;

    // ========== Transaction types ==========

    /// Creates a transaction type under a caller-chosen id.
    async fn create_transaction_type(
        &self,
        meta: &CallMetadata,
        req: CreateTransactionTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Relabels a transaction type at the given version.
    async fn update_transaction_type(
        &self,
        meta: &CallMetadata,
        req: UpdateTransactionTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Soft-deletes a transaction type at the given version.
    async fn delete_transaction_type(
        &self,
        meta: &CallMetadata,
        req: DeleteTransactionTypeRequest,
    ) -> Reply<Versioned<i32>>;

    /// Gets a live transaction type.
    async fn get_transaction_type_by_id(
        &self,
        meta: &CallMetadata,
        req: GetTransactionTypeByIdRequest,
    ) -> Reply<transaction_types::Model>;

    /// Lists the tenant's live transaction types.
    async fn get_transaction_types_by_tenant(
        &self,
        meta: &CallMetadata,
        req: GetTransactionTypesByTenantRequest,
    ) -> Reply<Vec<transaction_types::Model>>;

    // ========== Parties ==========

    /// Creates a party under a caller-chosen id.
    async fn create_party(
        &self,
        meta: &CallMetadata,
        req: CreatePartyRequest,
    ) -> Reply<Versioned<i64>>;

    /// Renames a party at the given version.
    async fn update_party(
        &self,
        meta: &CallMetadata,
        req: UpdatePartyRequest,
    ) -> Reply<Versioned<i64>>;

    /// Soft-deletes a party at the given version.
    async fn delete_party(
        &self,
        meta: &CallMetadata,
        req: DeletePartyRequest,
    ) -> Reply<Versioned<i64>>;

    /// Gets a live party.
    async fn get_party_by_id(
        &self,
        meta: &CallMetadata,
        req: GetPartyByIdRequest,
    ) -> Reply<parties::Model>;

    /// Lists the tenant's live parties.
    async fn get_parties_by_tenant(
        &self,
        meta: &CallMetadata,
        req: GetPartiesByTenantRequest,
    ) -> Reply<Vec<parties::Model>>;

    // ========== Accounts ==========

    /// Creates an account.
    async fn create_account(
        &self,
        meta: &CallMetadata,
        req: CreateAccountRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Updates an account at the given version.
    async fn update_account(
        &self,
        meta: &CallMetadata,
        req: UpdateAccountRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Soft-deletes an account at the given version.
    async fn delete_account(
        &self,
        meta: &CallMetadata,
        req: DeleteAccountRequest,
    ) -> Reply<Versioned<Uuid>>;

    /// Gets a live account with its organization name and type label.
    async fn get_account_by_id(
        &self,
        meta: &CallMetadata,
        req: GetAccountByIdRequest,
    ) -> Reply<AccountView>;

    /// Lists the tenant's live accounts.
    async fn get_accounts_by_tenant(
        &self,
        meta: &CallMetadata,
        req: GetAccountsByTenantRequest,
    ) -> Reply<Vec<AccountView>>;

    /// Lists the live accounts of one organization.
    async fn get_accounts_by_organization(
        &self,
        meta: &CallMetadata,
        req: GetAccountsByOrganizationRequest,
    ) -> Reply<Vec<AccountView>>;

    // ========== Transactions ==========

    /// Creates a transaction header.
    async fn create_transaction(
        &self,
        meta: &CallMetadata,
        req: CreateTransactionRequest,
    ) -> Reply<Versioned<i64>>;

    /// Updates header fields at the given version.
    async fn update_transaction(
        &self,
        meta: &CallMetadata,
        req: UpdateTransactionRequest,
    ) -> Reply<Versioned<i64>>;

    /// Soft-deletes a header at the given version.
    async fn delete_transaction(
        &self,
        meta: &CallMetadata,
        req: DeleteTransactionRequest,
    ) -> Reply<Versioned<i64>>;

    /// Gets a live header with its type label.
    async fn get_transaction_by_id(
        &self,
        meta: &CallMetadata,
        req: GetTransactionByIdRequest,
    ) -> Reply<TransactionView>;

    /// Appends a balanced batch of detail lines, all or nothing.
    async fn add_transaction_details(
        &self,
        meta: &CallMetadata,
        req: AddTransactionDetailsRequest,
    ) -> Reply<PostedDetails>;

    /// Gets a header with its party names and detail lines.
    async fn get_transaction_wrapper_by_id(
        &self,
        meta: &CallMetadata,
        req: GetTransactionWrapperByIdRequest,
    ) -> Reply<TransactionWrapper>;

    /// Gets every wrapper of an organization within a date range.
    async fn get_transaction_wrappers_by_date(
        &self,
        meta: &CallMetadata,
        req: GetTransactionWrappersByDateRequest,
    ) -> Reply<Vec<TransactionWrapper>>;
}
