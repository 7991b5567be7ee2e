//! Authorization gate.
//!
//! Wraps another [`LedgerApi`] and, for every guarded operation:
//! 1. Reads the bearer token from the call metadata
//! 2. Verifies its signature and expiry
//! 3. Maps the ledger role to an access tier and checks it against the
//!    operation
//! 4. Overwrites the request tenant with the token tenant
//! 5. Forwards the call and writes one audit record
//!
//! Rejected calls never reach the inner implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use gledger_core::access::{AccessTier, Operation};
use gledger_db::entities::{account_types, organizations, parties, transaction_types};
use gledger_db::{AccountView, TransactionView, TransactionWrapper};
use gledger_shared::{AppError, ErrorCode, JwtError, JwtVerifier};
use uuid::Uuid;

use crate::rpc::*;

/// Audit records are emitted on this tracing target.
pub const AUDIT_TARGET: &str = "gledger::audit";

/// [`LedgerApi`] decorator enforcing token checks and tenant isolation.
#[derive(Clone)]
pub struct AuthGate {
    inner: Arc<dyn LedgerApi>,
    verifier: JwtVerifier,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Wraps `inner` behind token verification.
    #[must_use]
    pub fn new(inner: Arc<dyn LedgerApi>, verifier: JwtVerifier) -> Self {
        Self { inner, verifier }
    }

    /// Checks that the caller may run `op`.
    ///
    /// Returns the tenant to act on, or `None` for unguarded operations.
    ///
    /// # Errors
    ///
    /// Returns `AppError::TokenExpired` for an expired token and
    /// `AppError::Unauthorized` for a missing, invalid or insufficient one.
    pub fn authorize(&self, op: Operation, meta: &CallMetadata) -> Result<Option<i64>, AppError> {
        let Some(required) = op.required_tier() else {
            return Ok(None);
        };

        let token = meta
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("missing token".to_string()))?;

        let claims = self.verifier.verify(token).map_err(|e| match e {
            JwtError::Expired => AppError::TokenExpired,
            other => {
                tracing::debug!(operation = %op, error = %other, "token rejected");
                AppError::Unauthorized("invalid token".to_string())
            }
        })?;

        let tier = AccessTier::from_role(claims.role())
            .ok_or_else(|| AppError::Unauthorized("no ledger access".to_string()))?;

        if !tier.satisfies(required) {
            return Err(AppError::Unauthorized(format!(
                "{op} requires {required} access"
            )));
        }

        Ok(Some(claims.tenant_id()))
    }

    async fn guard<Req, Res, F, Fut>(
        &self,
        op: Operation,
        meta: &CallMetadata,
        mut req: Req,
        forward: F,
    ) -> Reply<Res>
    where
        Req: TenantScoped,
        F: FnOnce(Req) -> Fut,
        Fut: Future<Output = Reply<Res>>,
    {
        let started = Instant::now();
        let correlation = req.correlation();

        let (tenant, reply) = match self.authorize(op, meta) {
            Ok(tenant) => {
                if let Some(tenant) = tenant {
                    req.set_tenant(tenant);
                }
                (tenant, forward(req).await)
            }
            Err(err) => (None, Reply::error(&err)),
        };

        audit(op, tenant, &correlation, reply.error_code, started.elapsed());
        reply
    }
}

fn audit(
    op: Operation,
    tenant: Option<i64>,
    correlation: &str,
    code: ErrorCode,
    elapsed: Duration,
) {
    tracing::info!(
        target: AUDIT_TARGET,
        method = op.name(),
        tenant = ?tenant,
        correlation,
        error_code = code.as_i32(),
        duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "rpc call"
    );
}

macro_rules! guarded {
    ($($method:ident($request:ty) -> $response:ty => $op:ident;)+) => {
        #[async_trait]
        impl LedgerApi for AuthGate {
            $(
                async fn $method(&self, meta: &CallMetadata, req: $request) -> Reply<$response> {
                    self.guard(Operation::$op, meta, req, |req| self.inner.$method(meta, req))
                        .await
                }
            )+
        }
    };
}

guarded! {
    get_server_version(GetServerVersionRequest) -> ServerVersion => GetServerVersion;

    create_organization(CreateOrganizationRequest) -> Versioned<Uuid> => CreateOrganization;
    update_organization(UpdateOrganizationRequest) -> Versioned<Uuid> => UpdateOrganization;
    delete_organization(DeleteOrganizationRequest) -> Versioned<Uuid> => DeleteOrganization;
    get_organization_by_id(GetOrganizationByIdRequest) -> organizations::Model => GetOrganizationById;
    get_organizations_by_tenant(GetOrganizationsByTenantRequest) -> Vec<organizations::Model> => GetOrganizationsByTenant;

    create_account_type(CreateAccountTypeRequest) -> Versioned<i32> => CreateAccountType;
    update_account_type(UpdateAccountTypeRequest) -> Versioned<i32> => UpdateAccountType;
    delete_account_type(DeleteAccountTypeRequest) -> Versioned<i32> => DeleteAccountType;
    get_account_type_by_id(GetAccountTypeByIdRequest) -> account_types::Model => GetAccountTypeById;
    get_account_types_by_tenant(GetAccountTypesByTenantRequest) -> Vec<account_types::Model> => GetAccountTypesByTenant;

    create_transaction_type(CreateTransactionTypeRequest) -> Versioned<i32> => CreateTransactionType;
    update_transaction_type(UpdateTransactionTypeRequest) -> Versioned<i32> => UpdateTransactionType;
    delete_transaction_type(DeleteTransactionTypeRequest) -> Versioned<i32> => DeleteTransactionType;
    get_transaction_type_by_id(GetTransactionTypeByIdRequest) -> transaction_types::Model => GetTransactionTypeById;
    get_transaction_types_by_tenant(GetTransactionTypesByTenantRequest) -> Vec<transaction_types::Model> => GetTransactionTypesByTenant;

    create_party(CreatePartyRequest) -> Versioned<i64> => CreateParty;
    update_party(UpdatePartyRequest) -> Versioned<i64> => UpdateParty;
    delete_party(DeletePartyRequest) -> Versioned<i64> => DeleteParty;
    get_party_by_id(GetPartyByIdRequest) -> parties::Model => GetPartyById;
    get_parties_by_tenant(GetPartiesByTenantRequest) -> Vec<parties::Model> => GetPartiesByTenant;

    create_account(CreateAccountRequest) -> Versioned<Uuid> => CreateAccount;
    update_account(UpdateAccountRequest) -> Versioned<Uuid> => UpdateAccount;
    delete_account(DeleteAccountRequest) -> Versioned<Uuid> => DeleteAccount;
    get_account_by_id(GetAccountByIdRequest) -> AccountView => GetAccountById;
    get_accounts_by_tenant(GetAccountsByTenantRequest) -> Vec<AccountView> => GetAccountsByTenant;
    get_accounts_by_organization(GetAccountsByOrganizationRequest) -> Vec<AccountView> => GetAccountsByOrganization;

    create_transaction(CreateTransactionRequest) -> Versioned<i64> => CreateTransaction;
    update_transaction(UpdateTransactionRequest) -> Versioned<i64> => UpdateTransaction;
    delete_transaction(DeleteTransactionRequest) -> Versioned<i64> => DeleteTransaction;
    get_transaction_by_id(GetTransactionByIdRequest) -> TransactionView => GetTransactionById;
    add_transaction_details(AddTransactionDetailsRequest) -> PostedDetails => AddTransactionDetails;
    get_transaction_wrapper_by_id(GetTransactionWrapperByIdRequest) -> TransactionWrapper => GetTransactionWrapperById;
    get_transaction_wrappers_by_date(GetTransactionWrappersByDateRequest) -> Vec<TransactionWrapper> => GetTransactionWrappersByDate;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Duration as ChronoDuration, Utc};
    use gledger_core::access::{ROLE_ADMIN, ROLE_READ_ONLY, ROLE_READ_WRITE};
    use gledger_shared::{Claims, JwtSigner};
    use rstest::rstest;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    use super::*;

    const PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/jwt_private.pem");
    const PUBLIC_KEY: &[u8] = include_bytes!("../tests/fixtures/jwt_public.pem");
    const FOREIGN_KEY: &[u8] = include_bytes!("../tests/fixtures/foreign_private.pem");

    const TENANT: i64 = 1001;

    fn token_with(key: &[u8], role: &str, expires_in: ChronoDuration) -> CallMetadata {
        let signer = JwtSigner::from_rsa_pem(key, "PS256").unwrap();
        let claims = Claims::new(TENANT, role, Utc::now() + expires_in);
        CallMetadata::with_token(signer.sign(&claims).unwrap())
    }

    fn token(role: &str) -> CallMetadata {
        token_with(PRIVATE_KEY, role, ChronoDuration::hours(1))
    }

    fn gate(inner: MockLedgerApi) -> AuthGate {
        let verifier = JwtVerifier::from_rsa_pem(PUBLIC_KEY, "PS256", 0).unwrap();
        AuthGate::new(Arc::new(inner), verifier)
    }

    fn party(mservice_id: i64) -> CreatePartyRequest {
        CreatePartyRequest {
            mservice_id,
            party_id: 7,
            party_name: "Globex".to_string(),
        }
    }

    #[test]
    fn test_read_only_rejected_for_every_mutation() {
        let gate = gate(MockLedgerApi::new());
        let meta = token(ROLE_READ_ONLY);

        for op in Operation::ALL.iter().filter(|op| op.is_mutation()) {
            let err = gate.authorize(*op, &meta).unwrap_err();
            assert_eq!(err.code(), ErrorCode::NotAuthorized, "{op}");
        }
    }

    #[test]
    fn test_read_only_allowed_for_every_read() {
        let gate = gate(MockLedgerApi::new());
        let meta = token(ROLE_READ_ONLY);

        for op in Operation::ALL.iter().filter(|op| !op.is_mutation()) {
            assert!(gate.authorize(*op, &meta).is_ok(), "{op}");
        }
    }

    #[rstest]
    #[case(ROLE_ADMIN, Operation::CreateAccount, true)]
    #[case(ROLE_READ_WRITE, Operation::CreateAccount, false)]
    #[case(ROLE_READ_WRITE, Operation::AddTransactionDetails, true)]
    #[case(ROLE_READ_WRITE, Operation::UpdateParty, true)]
    #[case(ROLE_READ_WRITE, Operation::DeleteOrganization, false)]
    #[case(ROLE_ADMIN, Operation::AddTransactionDetails, true)]
    #[case(ROLE_ADMIN, Operation::GetTransactionWrappersByDate, true)]
    #[case("glsuper", Operation::GetPartyById, false)]
    #[case("", Operation::GetPartyById, false)]
    fn test_tier_matrix(#[case] role: &str, #[case] op: Operation, #[case] allowed: bool) {
        let gate = gate(MockLedgerApi::new());
        assert_eq!(gate.authorize(op, &token(role)).is_ok(), allowed);
    }

    #[test]
    fn test_missing_token_is_unauthorized() {
        let gate = gate(MockLedgerApi::new());

        let err = gate
            .authorize(Operation::GetPartyById, &CallMetadata::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthorized);

        let err = gate
            .authorize(Operation::GetPartyById, &CallMetadata::with_token(""))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[test]
    fn test_expired_token_has_its_own_code() {
        let gate = gate(MockLedgerApi::new());
        let meta = token_with(PRIVATE_KEY, ROLE_ADMIN, ChronoDuration::minutes(-10));

        let err = gate.authorize(Operation::GetPartyById, &meta).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TokenExpired);
    }

    #[test]
    fn test_foreign_signature_is_unauthorized() {
        let gate = gate(MockLedgerApi::new());
        let meta = token_with(FOREIGN_KEY, ROLE_ADMIN, ChronoDuration::hours(1));

        let err = gate.authorize(Operation::GetPartyById, &meta).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotAuthorized);
    }

    #[test]
    fn test_server_version_needs_no_token() {
        let gate = gate(MockLedgerApi::new());
        assert_eq!(
            gate.authorize(Operation::GetServerVersion, &CallMetadata::default())
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_tenant_from_token_replaces_caller_tenant() {
        let mut inner = MockLedgerApi::new();
        inner
            .expect_create_party()
            .withf(|_, req| req.mservice_id == TENANT && req.party_id == 7)
            .times(1)
            .returning(|_, req| Reply::ok(Versioned { id: req.party_id, version: 1 }));

        let reply = gate(inner)
            .create_party(&token(ROLE_READ_WRITE), party(9999))
            .await;

        assert!(reply.is_ok());
        assert_eq!(reply.data, Some(Versioned { id: 7, version: 1 }));
    }

    #[tokio::test]
    async fn test_rejected_call_never_reaches_inner() {
        // No expectations: any forwarded call panics.
        let gate = gate(MockLedgerApi::new());

        let reply = gate.create_party(&token(ROLE_READ_ONLY), party(TENANT)).await;
        assert_eq!(reply.error_code, ErrorCode::NotAuthorized);
        assert!(reply.data.is_none());

        let expired = token_with(PRIVATE_KEY, ROLE_ADMIN, ChronoDuration::minutes(-10));
        let reply = gate.create_party(&expired, party(TENANT)).await;
        assert_eq!(reply.error_code, ErrorCode::TokenExpired);
    }

    #[tokio::test]
    async fn test_inner_failure_passes_through() {
        let mut inner = MockLedgerApi::new();
        inner.expect_get_party_by_id().times(1).returning(|_, _| {
            Reply::error(&AppError::NotFound("party not found".to_string()))
        });

        let reply = gate(inner)
            .get_party_by_id(
                &token(ROLE_READ_ONLY),
                GetPartyByIdRequest {
                    mservice_id: 0,
                    party_id: 3,
                },
            )
            .await;

        assert_eq!(reply.error_code, ErrorCode::NotFound);
        assert_eq!(reply.error_message, "party not found");
    }

    #[tokio::test]
    async fn test_server_version_forwarded_without_token() {
        let mut inner = MockLedgerApi::new();
        inner.expect_get_server_version().times(1).returning(|_, _| {
            Reply::ok(ServerVersion {
                version: "0.0.0".to_string(),
                uptime_secs: 5,
            })
        });

        let reply = gate(inner)
            .get_server_version(&CallMetadata::default(), GetServerVersionRequest {})
            .await;
        assert!(reply.is_ok());
    }

    /// Collects the fields of audit events.
    #[derive(Clone, Default)]
    struct AuditCapture(Arc<Mutex<Vec<String>>>);

    struct FieldWriter(String);

    impl tracing::field::Visit for FieldWriter {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for AuditCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if event.metadata().target() == AUDIT_TARGET {
                let mut writer = FieldWriter(String::new());
                event.record(&mut writer);
                self.0.lock().unwrap().push(writer.0);
            }
        }
    }

    #[tokio::test]
    async fn test_one_audit_record_per_call() {
        let capture = AuditCapture::default();
        let _guard =
            tracing::subscriber::set_default(Registry::default().with(capture.clone()));

        let mut inner = MockLedgerApi::new();
        inner
            .expect_create_party()
            .returning(|_, req| Reply::ok(Versioned { id: req.party_id, version: 1 }));
        let gate = gate(inner);

        gate.create_party(&token(ROLE_READ_WRITE), party(0)).await;
        gate.create_party(&token(ROLE_READ_ONLY), party(0)).await;
        gate.create_party(&CallMetadata::default(), party(0)).await;

        let records = capture.0.lock().unwrap().clone();
        assert_eq!(records.len(), 3);
        assert!(records[0].contains("method=\"CreateParty\""));
        assert!(records[0].contains("tenant=Some(1001)"));
        assert!(records[0].contains("error_code=0"));
        assert!(records[0].contains("correlation=\"7\""));
        assert!(records[1].contains("error_code=401"));
        assert!(records[1].contains("tenant=None"));
        assert!(records[2].contains("error_code=401"));
    }
}
