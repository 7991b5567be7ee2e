//! Bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by a ledger bearer token.
///
/// Tokens are issued by the account service, not by this process. Only the
/// tenant (`aid`) and the ledger role (`ledger`) are consulted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Tenant (mservice) identifier.
    #[serde(default)]
    pub aid: i64,
    /// Ledger role label, e.g. `gladmin`, `glrw`, `glro`.
    #[serde(default)]
    pub ledger: String,
    /// Subject, usually the account name of the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a tenant and ledger role.
    #[must_use]
    pub fn new(tenant_id: i64, role: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            aid: tenant_id,
            ledger: role.to_string(),
            sub: None,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the tenant id from claims.
    #[must_use]
    pub const fn tenant_id(&self) -> i64 {
        self.aid
    }

    /// Returns the ledger role label.
    #[must_use]
    pub fn role(&self) -> &str {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let expires_at = Utc::now() + Duration::hours(1);
        let claims = Claims::new(42, "glrw", expires_at);

        assert_eq!(claims.tenant_id(), 42);
        assert_eq!(claims.role(), "glrw");
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_missing_role_deserializes_empty() {
        let claims: Claims = serde_json::from_str(r#"{"aid": 7, "exp": 1}"#).unwrap();
        assert_eq!(claims.aid, 7);
        assert!(claims.ledger.is_empty());
    }
}
