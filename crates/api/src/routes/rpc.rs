//! The RPC endpoint.
//!
//! `POST /api/v1/rpc/{method}` with the request message as a JSON body.
//! Every business outcome, including authorization failures, is returned
//! with HTTP 200 and an error code in the envelope. Transport status codes
//! are reserved for unknown methods and unreadable bodies.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gledger_core::access::Operation;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::AppState;
use crate::rpc::CallMetadata;

fn transport_error(status: StatusCode, error: &str, message: String) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Decodes a request body; an empty body reads as `{}`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| {
        transport_error(StatusCode::BAD_REQUEST, "invalid_request", e.to_string())
    })
}

macro_rules! dispatch {
    ($op:expr, $api:expr, $meta:expr, $body:expr, { $($variant:ident => $method:ident,)+ }) => {
        match $op {
            $(
                Operation::$variant => match parse_body(&$body) {
                    Ok(req) => Json($api.$method(&$meta, req).await).into_response(),
                    Err(rejection) => rejection,
                },
            )+
        }
    };
}

/// Runs one operation through the gated API.
pub async fn call(
    State(state): State<AppState>,
    Path(method): Path<String>,
    meta: CallMetadata,
    body: Bytes,
) -> Response {
    let Ok(op) = method.parse::<Operation>() else {
        return transport_error(
            StatusCode::NOT_FOUND,
            "unknown_method",
            format!("unknown method: {method}"),
        );
    };

    let api = state.api.as_ref();

    dispatch!(op, api, meta, body, {
        GetServerVersion => get_server_version,
        CreateOrganization => create_organization,
        UpdateOrganization => update_organization,
        DeleteOrganization => delete_organization,
        GetOrganizationById => get_organization_by_id,
        GetOrganizationsByTenant => get_organizations_by_tenant,
        CreateAccountType => create_account_type,
        UpdateAccountType => update_account_type,
        DeleteAccountType => delete_account_type,
        GetAccountTypeById => get_account_type_by_id,
        GetAccountTypesByTenant => get_account_types_by_tenant,
        CreateTransactionType => create_transaction_type,
        UpdateTransactionType => update_transaction_type,
        DeleteTransactionType => delete_transaction_type,
        GetTransactionTypeById => get_transaction_type_by_id,
        GetTransactionTypesByTenant => get_transaction_types_by_tenant,
        CreateParty => create_party,
        UpdateParty => update_party,
        DeleteParty => delete_party,
        GetPartyById => get_party_by_id,
        GetPartiesByTenant => get_parties_by_tenant,
        CreateAccount => create_account,
        UpdateAccount => update_account,
        DeleteAccount => delete_account,
        GetAccountById => get_account_by_id,
        GetAccountsByTenant => get_accounts_by_tenant,
        GetAccountsByOrganization => get_accounts_by_organization,
        CreateTransaction => create_transaction,
        UpdateTransaction => update_transaction,
        DeleteTransaction => delete_transaction,
        GetTransactionById => get_transaction_by_id,
        AddTransactionDetails => add_transaction_details,
        GetTransactionWrapperById => get_transaction_wrapper_by_id,
        GetTransactionWrappersByDate => get_transaction_wrappers_by_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::GetPartyByIdRequest;

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let req: crate::rpc::GetPartiesByTenantRequest = parse_body(b"").unwrap();
        assert_eq!(req.mservice_id, 0);
    }

    #[test]
    fn test_bad_body_is_bad_request() {
        let err = parse_body::<GetPartyByIdRequest>(b"{\"party_id\": \"x\"}").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
