//! Request messages.
//!
//! Field names follow the wire format. `mservice_id` is accepted from the
//! caller only so that old clients keep deserializing; the gate replaces it.

use chrono::{DateTime, FixedOffset, NaiveDate};
use gledger_core::ledger::{DetailLine, EntryType};
use gledger_db::{AccountFields, OrganizationFields, TransactionFields};
use gledger_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request bound to one tenant.
pub trait TenantScoped {
    /// Replaces the tenant the request acts on.
    fn set_tenant(&mut self, tenant: i64);

    /// Key used to correlate the audit record with the request.
    fn correlation(&self) -> String;
}

macro_rules! tenant_scoped {
    ($($request:ty => |$req:ident| $correlation:expr;)+) => {
        $(
            impl TenantScoped for $request {
                fn set_tenant(&mut self, tenant: i64) {
                    self.mservice_id = tenant;
                }

                fn correlation(&self) -> String {
                    let $req = self;
                    $correlation
                }
            }
        )+
    };
}

/// Asks for the server version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetServerVersionRequest {}

impl TenantScoped for GetServerVersionRequest {
    fn set_tenant(&mut self, _tenant: i64) {}

    fn correlation(&self) -> String {
        String::new()
    }
}

// ========== Organizations ==========

/// Creates an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Name, `[a-z0-9_-]{1,32}`.
    pub organization_name: String,
    /// First day the organization is active.
    pub from_date: NaiveDate,
    /// Last day the organization is active, if it has ended.
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

/// Updates an organization at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
    /// Version the caller last read.
    pub version: i32,
    /// Name, `[a-z0-9_-]{1,32}`.
    pub organization_name: String,
    /// First day the organization is active.
    pub from_date: NaiveDate,
    /// Last day the organization is active, if it has ended.
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

/// Soft-deletes an organization at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOrganizationRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one organization by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOrganizationByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
}

/// Lists the tenant's organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOrganizationsByTenantRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
}

impl CreateOrganizationRequest {
    pub(crate) fn fields(self) -> OrganizationFields {
        OrganizationFields {
            organization_name: self.organization_name,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }
}

impl UpdateOrganizationRequest {
    pub(crate) fn fields(self) -> OrganizationFields {
        OrganizationFields {
            organization_name: self.organization_name,
            from_date: self.from_date,
            to_date: self.to_date,
        }
    }
}

// ========== Account types ==========

/// Creates an account type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
    /// Account type label.
    pub account_type: String,
}

/// Updates an account type at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
    /// Version the caller last read.
    pub version: i32,
    /// Account type label.
    pub account_type: String,
}

/// Soft-deletes an account type at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAccountTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one account type by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountTypeByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
}

/// Lists the tenant's account types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountTypesByTenantRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
}

// ========== Transaction types ==========

/// Creates a transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction type id, chosen by the caller.
    pub transaction_type_id: i32,
    /// Transaction type label.
    pub transaction_type: String,
}

/// Updates a transaction type at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransactionTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction type id, chosen by the caller.
    pub transaction_type_id: i32,
    /// Version the caller last read.
    pub version: i32,
    /// Transaction type label.
    pub transaction_type: String,
}

/// Soft-deletes a transaction type at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTransactionTypeRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction type id, chosen by the caller.
    pub transaction_type_id: i32,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one transaction type by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionTypeByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction type id, chosen by the caller.
    pub transaction_type_id: i32,
}

/// Lists the tenant's transaction types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionTypesByTenantRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
}

// ========== Parties ==========

/// Creates a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePartyRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Party id, chosen by the caller.
    pub party_id: i64,
    /// Party name.
    pub party_name: String,
}

/// Updates a party at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePartyRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Party id, chosen by the caller.
    pub party_id: i64,
    /// Version the caller last read.
    pub version: i32,
    /// Party name.
    pub party_name: String,
}

/// Soft-deletes a party at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePartyRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Party id, chosen by the caller.
    pub party_id: i64,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one party by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPartyByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Party id, chosen by the caller.
    pub party_id: i64,
}

/// Lists the tenant's parties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPartiesByTenantRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
}

// ========== Accounts ==========

/// Creates an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
    /// Name, `[a-z0-9_-]{1,32}`.
    pub account_name: String,
    /// Free-form description.
    #[serde(default)]
    pub account_description: String,
}

/// Updates an account at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account id.
    pub gl_account_id: Uuid,
    /// Version the caller last read.
    pub version: i32,
    /// Organization id.
    pub organization_id: Uuid,
    /// Account type id, chosen by the caller.
    pub account_type_id: i32,
    /// Name, `[a-z0-9_-]{1,32}`.
    pub account_name: String,
    /// Free-form description.
    #[serde(default)]
    pub account_description: String,
}

/// Soft-deletes an account at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account id.
    pub gl_account_id: Uuid,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one account by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Account id.
    pub gl_account_id: Uuid,
}

/// Lists the tenant's accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountsByTenantRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
}

/// Lists one organization's accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAccountsByOrganizationRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
}

impl CreateAccountRequest {
    pub(crate) fn fields(self) -> AccountFields {
        AccountFields {
            organization_id: self.organization_id,
            account_type_id: self.account_type_id,
            account_name: self.account_name,
            account_description: self.account_description,
        }
    }
}

impl UpdateAccountRequest {
    pub(crate) fn fields(self) -> AccountFields {
        AccountFields {
            organization_id: self.organization_id,
            account_type_id: self.account_type_id,
            account_name: self.account_name,
            account_description: self.account_description,
        }
    }
}

// ========== Transactions ==========

/// Header fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Owning organization.
    pub organization_id: Uuid,
    /// Transaction type id.
    pub transaction_type_id: i32,
    /// Accounting date.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    #[serde(default)]
    pub transaction_description: String,
    /// Optional paying party.
    #[serde(default)]
    pub from_party_id: Option<i64>,
    /// Optional receiving party.
    #[serde(default)]
    pub to_party_id: Option<i64>,
    /// Key of the external event the transaction came from.
    #[serde(default)]
    pub posted_via_key: Option<String>,
    /// When that event happened.
    #[serde(default)]
    pub posted_via_date: Option<DateTime<FixedOffset>>,
}

impl From<TransactionHeader> for TransactionFields {
    fn from(header: TransactionHeader) -> Self {
        Self {
            organization_id: header.organization_id,
            transaction_type_id: header.transaction_type_id,
            transaction_date: header.transaction_date,
            transaction_description: header.transaction_description,
            from_party_id: header.from_party_id,
            to_party_id: header.to_party_id,
            posted_via_key: header.posted_via_key,
            posted_via_date: header.posted_via_date,
        }
    }
}

/// Creates a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,
}

/// Updates a transaction at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction id.
    pub gl_transaction_id: i64,
    /// Version the caller last read.
    pub version: i32,
    /// Header fields.
    #[serde(flatten)]
    pub header: TransactionHeader,
}

/// Soft-deletes a transaction at a version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTransactionRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction id.
    pub gl_transaction_id: i64,
    /// Version the caller last read.
    pub version: i32,
}

/// Gets one transaction by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction id.
    pub gl_transaction_id: i64,
}

/// One submitted detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetailInput {
    /// Account the line posts to.
    pub gl_account_id: Uuid,
    /// Exact amount, any sign.
    pub amount: Decimal,
    /// `true` for a debit, `false` for a credit.
    pub is_debit: bool,
}

impl From<TransactionDetailInput> for DetailLine {
    fn from(input: TransactionDetailInput) -> Self {
        Self {
            account_id: AccountId::from_uuid(input.gl_account_id),
            amount: input.amount,
            entry_type: EntryType::from_is_debit(input.is_debit),
        }
    }
}

/// Appends detail lines to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTransactionDetailsRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction id.
    pub gl_transaction_id: i64,
    /// Lines to append, in submission order.
    #[serde(default)]
    pub transaction_details: Vec<TransactionDetailInput>,
}

/// Gets one transaction wrapper by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionWrapperByIdRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Transaction id.
    pub gl_transaction_id: i64,
}

/// Gets the transaction wrappers of an organization within a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionWrappersByDateRequest {
    /// Tenant; replaced by the gate.
    #[serde(default)]
    pub mservice_id: i64,
    /// Organization id.
    pub organization_id: Uuid,
    /// First date included.
    pub start_date: NaiveDate,
    /// Last date included.
    pub end_date: NaiveDate,
}

tenant_scoped! {
    CreateOrganizationRequest => |req| req.organization_name.clone();
    UpdateOrganizationRequest => |req| req.organization_id.to_string();
    DeleteOrganizationRequest => |req| req.organization_id.to_string();
    GetOrganizationByIdRequest => |req| req.organization_id.to_string();
    GetOrganizationsByTenantRequest => |_req| String::new();
    CreateAccountTypeRequest => |req| req.account_type_id.to_string();
    UpdateAccountTypeRequest => |req| req.account_type_id.to_string();
    DeleteAccountTypeRequest => |req| req.account_type_id.to_string();
    GetAccountTypeByIdRequest => |req| req.account_type_id.to_string();
    GetAccountTypesByTenantRequest => |_req| String::new();
    CreateTransactionTypeRequest => |req| req.transaction_type_id.to_string();
    UpdateTransactionTypeRequest => |req| req.transaction_type_id.to_string();
    DeleteTransactionTypeRequest => |req| req.transaction_type_id.to_string();
    GetTransactionTypeByIdRequest => |req| req.transaction_type_id.to_string();
    GetTransactionTypesByTenantRequest => |_req| String::new();
    CreatePartyRequest => |req| req.party_id.to_string();
    UpdatePartyRequest => |req| req.party_id.to_string();
    DeletePartyRequest => |req| req.party_id.to_string();
    GetPartyByIdRequest => |req| req.party_id.to_string();
    GetPartiesByTenantRequest => |_req| String::new();
    CreateAccountRequest => |req| req.account_name.clone();
    UpdateAccountRequest => |req| req.gl_account_id.to_string();
    DeleteAccountRequest => |req| req.gl_account_id.to_string();
    GetAccountByIdRequest => |req| req.gl_account_id.to_string();
    GetAccountsByTenantRequest => |_req| String::new();
    GetAccountsByOrganizationRequest => |req| req.organization_id.to_string();
    CreateTransactionRequest => |req| req.header.posted_via_key.clone().unwrap_or_default();
    UpdateTransactionRequest => |req| req.gl_transaction_id.to_string();
    DeleteTransactionRequest => |req| req.gl_transaction_id.to_string();
    GetTransactionByIdRequest => |req| req.gl_transaction_id.to_string();
    AddTransactionDetailsRequest => |req| req.gl_transaction_id.to_string();
    GetTransactionWrapperByIdRequest => |req| req.gl_transaction_id.to_string();
    GetTransactionWrappersByDateRequest => |req| req.organization_id.to_string();
}
