//! The RPC operations and the tier each one requires.

use std::str::FromStr;

use thiserror::Error;

use super::AccessTier;

/// Returned when a method name is not a known operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

macro_rules! operations {
    ($($variant:ident => $tier:expr,)+) => {
        /// Every operation exposed over RPC.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl Operation {
            /// All operations, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// The method name used on the wire and in audit records.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }

            /// The tier a caller needs, or `None` for unguarded operations.
            #[must_use]
            pub const fn required_tier(self) -> Option<AccessTier> {
                match self {
                    $(Self::$variant => $tier,)+
                }
            }
        }

        impl FromStr for Operation {
            type Err = UnknownOperation;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(UnknownOperation(s.to_string())),
                }
            }
        }
    };
}

const ADMIN: Option<AccessTier> = Some(AccessTier::Admin);
const READ_WRITE: Option<AccessTier> = Some(AccessTier::ReadWrite);
const READ_ONLY: Option<AccessTier> = Some(AccessTier::ReadOnly);

operations! {
    GetServerVersion => None,

    CreateOrganization => ADMIN,
    UpdateOrganization => ADMIN,
    DeleteOrganization => ADMIN,
    GetOrganizationById => READ_ONLY,
    GetOrganizationsByTenant => READ_ONLY,

    CreateAccountType => ADMIN,
    UpdateAccountType => ADMIN,
    DeleteAccountType => ADMIN,
    GetAccountTypeById => READ_ONLY,
    GetAccountTypesByTenant => READ_ONLY,

    CreateTransactionType => ADMIN,
    UpdateTransactionType => ADMIN,
    DeleteTransactionType => ADMIN,
    GetTransactionTypeById => READ_ONLY,
    GetTransactionTypesByTenant => READ_ONLY,

    CreateParty => READ_WRITE,
    UpdateParty => READ_WRITE,
    DeleteParty => READ_WRITE,
    GetPartyById => READ_ONLY,
    GetPartiesByTenant => READ_ONLY,

    CreateAccount => ADMIN,
    UpdateAccount => ADMIN,
    DeleteAccount => ADMIN,
    GetAccountById => READ_ONLY,
    GetAccountsByTenant => READ_ONLY,
    GetAccountsByOrganization => READ_ONLY,

    CreateTransaction => READ_WRITE,
    UpdateTransaction => READ_WRITE,
    DeleteTransaction => READ_WRITE,
    AddTransactionDetails => READ_WRITE,
    GetTransactionById => READ_ONLY,
    GetTransactionWrapperById => READ_ONLY,
    GetTransactionWrappersByDate => READ_ONLY,
}

impl Operation {
    /// Returns true if the operation changes stored state.
    #[must_use]
    pub fn is_mutation(self) -> bool {
        self.required_tier()
            .is_some_and(|tier| tier > AccessTier::ReadOnly)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
