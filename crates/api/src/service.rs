//! Store-backed implementation of the operation set.
//!
//! The service trusts the tenant on every request. It must only be reached
//! through [`crate::gate::AuthGate`].

use std::time::Instant;

use async_trait::async_trait;
use gledger_core::access::Operation;
use gledger_core::ledger::DetailLine;
use gledger_db::entities::{account_types, organizations, parties, transaction_types};
use gledger_db::{
    AccountRepository, AccountTypeRepository, AccountView, OrganizationRepository,
    PartyRepository, StoreError, TransactionRepository, TransactionTypeRepository,
    TransactionView, TransactionWrapper,
};
use gledger_shared::ErrorCode;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::rpc::*;

/// The ledger engine: repositories plus server bookkeeping.
#[derive(Debug, Clone)]
pub struct LedgerService {
    organizations: OrganizationRepository,
    account_types: AccountTypeRepository,
    transaction_types: TransactionTypeRepository,
    parties: PartyRepository,
    accounts: AccountRepository,
    transactions: TransactionRepository,
    started: Instant,
}

impl LedgerService {
    /// Creates a service over one connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            organizations: OrganizationRepository::new(db.clone()),
            account_types: AccountTypeRepository::new(db.clone()),
            transaction_types: TransactionTypeRepository::new(db.clone()),
            parties: PartyRepository::new(db.clone()),
            accounts: AccountRepository::new(db.clone()),
            transactions: TransactionRepository::new(db),
            started: Instant::now(),
        }
    }
}

/// Turns a repository result into a reply, logging store failures.
fn respond<T>(operation: Operation, result: Result<T, StoreError>) -> Reply<T> {
    if let Err(err) = &result {
        match err.code() {
            ErrorCode::Persistence | ErrorCode::Internal => {
                tracing::error!(%operation, error = %err, "ledger call failed");
            }
            _ => tracing::debug!(%operation, error = %err, "ledger call rejected"),
        }
    }
    result.into()
}

const fn versioned<K>(id: K, version: i32) -> Versioned<K> {
    Versioned { id, version }
}

#[async_trait]
impl LedgerApi for LedgerService {
    async fn get_server_version(
        &self,
        _meta: &CallMetadata,
        _req: GetServerVersionRequest,
    ) -> Reply<ServerVersion> {
        Reply::ok(ServerVersion {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: self.started.elapsed().as_secs(),
        })
    }

    async fn create_organization(
        &self,
        _meta: &CallMetadata,
        req: CreateOrganizationRequest,
    ) -> Reply<Versioned<Uuid>> {
        let tenant = req.mservice_id;
        let result = self.organizations.create(tenant, req.fields()).await;
        respond(
            Operation::CreateOrganization,
            result.map(|org| versioned(org.organization_id, org.version)),
        )
    }

    async fn update_organization(
        &self,
        _meta: &CallMetadata,
        req: UpdateOrganizationRequest,
    ) -> Reply<Versioned<Uuid>> {
        let (tenant, id, version) = (req.mservice_id, req.organization_id, req.version);
        let result = self.organizations.update(tenant, id, version, req.fields()).await;
        respond(Operation::UpdateOrganization, result.map(|v| versioned(id, v)))
    }

    async fn delete_organization(
        &self,
        _meta: &CallMetadata,
        req: DeleteOrganizationRequest,
    ) -> Reply<Versioned<Uuid>> {
        let id = req.organization_id;
        let result = self.organizations.delete(req.mservice_id, id, req.version).await;
        respond(Operation::DeleteOrganization, result.map(|v| versioned(id, v)))
    }

    async fn get_organization_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetOrganizationByIdRequest,
    ) -> Reply<organizations::Model> {
        respond(
            Operation::GetOrganizationById,
            self.organizations.get(req.mservice_id, req.organization_id).await,
        )
    }

    async fn get_organizations_by_tenant(
        &self,
        _meta: &CallMetadata,
        req: GetOrganizationsByTenantRequest,
    ) -> Reply<Vec<organizations::Model>> {
        respond(
            Operation::GetOrganizationsByTenant,
            self.organizations.list(req.mservice_id).await,
        )
    }

    async fn create_account_type(
        &self,
        _meta: &CallMetadata,
        req: CreateAccountTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let result = self
            .account_types
            .create(req.mservice_id, req.account_type_id, req.account_type)
            .await;
        respond(
            Operation::CreateAccountType,
            result.map(|t| versioned(t.account_type_id, t.version)),
        )
    }

    async fn update_account_type(
        &self,
        _meta: &CallMetadata,
        req: UpdateAccountTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let id = req.account_type_id;
        let result = self
            .account_types
            .update(req.mservice_id, id, req.version, req.account_type)
            .await;
        respond(Operation::UpdateAccountType, result.map(|v| versioned(id, v)))
    }

    async fn delete_account_type(
        &self,
        _meta: &CallMetadata,
        req: DeleteAccountTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let id = req.account_type_id;
        let result = self.account_types.delete(req.mservice_id, id, req.version).await;
        respond(Operation::DeleteAccountType, result.map(|v| versioned(id, v)))
    }

    async fn get_account_type_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetAccountTypeByIdRequest,
    ) -> Reply<account_types::Model> {
        respond(
            Operation::GetAccountTypeById,
            self.account_types.get(req.mservice_id, req.account_type_id).await,
        )
    }

    async fn get_account_types_by_tenant(
        &self,
        _meta: &CallMetadata,
        req: GetAccountTypesByTenantRequest,
    ) -> Reply<Vec<account_types::Model>> {
        respond(
            Operation::GetAccountTypesByTenant,
            self.account_types.list(req.mservice_id).await,
        )
    }

    async fn create_transaction_type(
        &self,
        _meta: &CallMetadata,
        req: CreateTransactionTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let result = self
            .transaction_types
            .create(req.mservice_id, req.transaction_type_id, req.transaction_type)
            .await;
        respond(
            Operation::CreateTransactionType,
            result.map(|t| versioned(t.transaction_type_id, t.version)),
        )
    }

    async fn update_transaction_type(
        &self,
        _meta: &CallMetadata,
        req: UpdateTransactionTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let id = req.transaction_type_id;
        let result = self
            .transaction_types
            .update(req.mservice_id, id, req.version, req.transaction_type)
            .await;
        respond(Operation::UpdateTransactionType, result.map(|v| versioned(id, v)))
    }

    async fn delete_transaction_type(
        &self,
        _meta: &CallMetadata,
        req: DeleteTransactionTypeRequest,
    ) -> Reply<Versioned<i32>> {
        let id = req.transaction_type_id;
        let result = self
            .transaction_types
            .delete(req.mservice_id, id, req.version)
            .await;
        respond(Operation::DeleteTransactionType, result.map(|v| versioned(id, v)))
    }

    async fn get_transaction_type_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetTransactionTypeByIdRequest,
    ) -> Reply<transaction_types::Model> {
        respond(
            Operation::GetTransactionTypeById,
            self.transaction_types
                .get(req.mservice_id, req.transaction_type_id)
                .await,
        )
    }

    async fn get_transaction_types_by_tenant(
        &self,
        _meta: &CallMetadata,
        req: GetTransactionTypesByTenantRequest,
    ) -> Reply<Vec<transaction_types::Model>> {
        respond(
            Operation::GetTransactionTypesByTenant,
            self.transaction_types.list(req.mservice_id).await,
        )
    }

    async fn create_party(
        &self,
        _meta: &CallMetadata,
        req: CreatePartyRequest,
    ) -> Reply<Versioned<i64>> {
        let result = self
            .parties
            .create(req.mservice_id, req.party_id, req.party_name)
            .await;
        respond(Operation::CreateParty, result.map(|p| versioned(p.party_id, p.version)))
    }

    async fn update_party(
        &self,
        _meta: &CallMetadata,
        req: UpdatePartyRequest,
    ) -> Reply<Versioned<i64>> {
        let id = req.party_id;
        let result = self
            .parties
            .update(req.mservice_id, id, req.version, req.party_name)
            .await;
        respond(Operation::UpdateParty, result.map(|v| versioned(id, v)))
    }

    async fn delete_party(
        &self,
        _meta: &CallMetadata,
        req: DeletePartyRequest,
    ) -> Reply<Versioned<i64>> {
        let id = req.party_id;
        let result = self.parties.delete(req.mservice_id, id, req.version).await;
        respond(Operation::DeleteParty, result.map(|v| versioned(id, v)))
    }

    async fn get_party_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetPartyByIdRequest,
    ) -> Reply<parties::Model> {
        respond(
            Operation::GetPartyById,
            self.parties.get(req.mservice_id, req.party_id).await,
        )
    }

    async fn get_parties_by_tenant(
        &self,
        _meta: &CallMetadata,
        req: GetPartiesByTenantRequest,
    ) -> Reply<Vec<parties::Model>> {
        respond(Operation::GetPartiesByTenant, self.parties.list(req.mservice_id).await)
    }

    async fn create_account(
        &self,
        _meta: &CallMetadata,
        req: CreateAccountRequest,
    ) -> Reply<Versioned<Uuid>> {
        let tenant = req.mservice_id;
        let result = self.accounts.create(tenant, req.fields()).await;
        respond(
            Operation::CreateAccount,
            result.map(|a| versioned(a.gl_account_id, a.version)),
        )
    }

    async fn update_account(
        &self,
        _meta: &CallMetadata,
        req: UpdateAccountRequest,
    ) -> Reply<Versioned<Uuid>> {
        let (tenant, id, version) = (req.mservice_id, req.gl_account_id, req.version);
        let result = self.accounts.update(tenant, id, version, req.fields()).await;
        respond(Operation::UpdateAccount, result.map(|v| versioned(id, v)))
    }

    async fn delete_account(
        &self,
        _meta: &CallMetadata,
        req: DeleteAccountRequest,
    ) -> Reply<Versioned<Uuid>> {
        let id = req.gl_account_id;
        let result = self.accounts.delete(req.mservice_id, id, req.version).await;
        respond(Operation::DeleteAccount, result.map(|v| versioned(id, v)))
    }

    async fn get_account_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetAccountByIdRequest,
    ) -> Reply<AccountView> {
        respond(
            Operation::GetAccountById,
            self.accounts.get(req.mservice_id, req.gl_account_id).await,
        )
    }

    async fn get_accounts_by_tenant(
        &self,
        _meta: &CallMetadata,
        req: GetAccountsByTenantRequest,
    ) -> Reply<Vec<AccountView>> {
        respond(
            Operation::GetAccountsByTenant,
            self.accounts.list(req.mservice_id).await,
        )
    }

    async fn get_accounts_by_organization(
        &self,
        _meta: &CallMetadata,
        req: GetAccountsByOrganizationRequest,
    ) -> Reply<Vec<AccountView>> {
        respond(
            Operation::GetAccountsByOrganization,
            self.accounts
                .list_by_organization(req.mservice_id, req.organization_id)
                .await,
        )
    }

    async fn create_transaction(
        &self,
        _meta: &CallMetadata,
        req: CreateTransactionRequest,
    ) -> Reply<Versioned<i64>> {
        let result = self
            .transactions
            .create(req.mservice_id, req.header.into())
            .await;
        respond(
            Operation::CreateTransaction,
            result.map(|t| versioned(t.gl_transaction_id, t.version)),
        )
    }

    async fn update_transaction(
        &self,
        _meta: &CallMetadata,
        req: UpdateTransactionRequest,
    ) -> Reply<Versioned<i64>> {
        let id = req.gl_transaction_id;
        let result = self
            .transactions
            .update(req.mservice_id, id, req.version, req.header.into())
            .await;
        respond(Operation::UpdateTransaction, result.map(|v| versioned(id, v)))
    }

    async fn delete_transaction(
        &self,
        _meta: &CallMetadata,
        req: DeleteTransactionRequest,
    ) -> Reply<Versioned<i64>> {
        let id = req.gl_transaction_id;
        let result = self.transactions.delete(req.mservice_id, id, req.version).await;
        respond(Operation::DeleteTransaction, result.map(|v| versioned(id, v)))
    }

    async fn get_transaction_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetTransactionByIdRequest,
    ) -> Reply<TransactionView> {
        respond(
            Operation::GetTransactionById,
            self.transactions
                .get(req.mservice_id, req.gl_transaction_id)
                .await,
        )
    }

    async fn add_transaction_details(
        &self,
        _meta: &CallMetadata,
        req: AddTransactionDetailsRequest,
    ) -> Reply<PostedDetails> {
        let id = req.gl_transaction_id;
        let lines: Vec<DetailLine> = req
            .transaction_details
            .into_iter()
            .map(Into::into)
            .collect();

        let result = self.transactions.add_details(req.mservice_id, id, lines).await;
        respond(
            Operation::AddTransactionDetails,
            result.map(|numbered| PostedDetails {
                gl_transaction_id: id,
                sequence_numbers: numbered.iter().map(|n| n.sequence_number).collect(),
            }),
        )
    }

    async fn get_transaction_wrapper_by_id(
        &self,
        _meta: &CallMetadata,
        req: GetTransactionWrapperByIdRequest,
    ) -> Reply<TransactionWrapper> {
        respond(
            Operation::GetTransactionWrapperById,
            self.transactions
                .get_wrapper(req.mservice_id, req.gl_transaction_id)
                .await,
        )
    }

    async fn get_transaction_wrappers_by_date(
        &self,
        _meta: &CallMetadata,
        req: GetTransactionWrappersByDateRequest,
    ) -> Reply<Vec<TransactionWrapper>> {
        respond(
            Operation::GetTransactionWrappersByDate,
            self.transactions
                .wrappers_by_date(
                    req.mservice_id,
                    req.organization_id,
                    req.start_date,
                    req.end_date,
                )
                .await,
        )
    }
}
