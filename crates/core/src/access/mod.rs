//! Access tiers and the per-operation tier table.
//!
//! Tiers are ordered: `Admin` satisfies everything `ReadWrite` does, which in
//! turn satisfies everything `ReadOnly` does. A caller whose role label is not
//! recognised has no tier at all and is refused every guarded operation.

mod operation;

pub use operation::{Operation, UnknownOperation};

use serde::{Deserialize, Serialize};

/// Role label granting `Admin`.
pub const ROLE_ADMIN: &str = "gladmin";
/// Role label granting `ReadWrite`.
pub const ROLE_READ_WRITE: &str = "glrw";
/// Role label granting `ReadOnly`.
pub const ROLE_READ_ONLY: &str = "glro";

/// Access tier derived from a caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// Reads only.
    ReadOnly,
    /// Reads, party mutations and transaction posting.
    ReadWrite,
    /// Everything.
    Admin,
}

impl AccessTier {
    /// Maps a role label to a tier. Unknown labels map to `None`.
    #[must_use]
    pub fn from_role(role: &str) -> Option<Self> {
        match role {
            ROLE_ADMIN => Some(Self::Admin),
            ROLE_READ_WRITE => Some(Self::ReadWrite),
            ROLE_READ_ONLY => Some(Self::ReadOnly),
            _ => None,
        }
    }

    /// Returns true if this tier meets `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read_only"),
            Self::ReadWrite => write!(f, "read_write"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gladmin", Some(AccessTier::Admin))]
    #[case("glrw", Some(AccessTier::ReadWrite))]
    #[case("glro", Some(AccessTier::ReadOnly))]
    #[case("GLADMIN", None)]
    #[case("", None)]
    #[case("admin", None)]
    fn test_role_mapping(#[case] role: &str, #[case] expected: Option<AccessTier>) {
        assert_eq!(AccessTier::from_role(role), expected);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(AccessTier::Admin.satisfies(AccessTier::ReadWrite));
        assert!(AccessTier::Admin.satisfies(AccessTier::ReadOnly));
        assert!(AccessTier::ReadWrite.satisfies(AccessTier::ReadOnly));
        assert!(AccessTier::ReadWrite.satisfies(AccessTier::ReadWrite));
        assert!(!AccessTier::ReadWrite.satisfies(AccessTier::Admin));
        assert!(!AccessTier::ReadOnly.satisfies(AccessTier::ReadWrite));
    }
}
