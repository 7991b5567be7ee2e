//! Repository layer for database operations.
//!
//! Every repository owns a `DatabaseConnection` and routes its versioned
//! mutations through [`crate::store`].

pub mod account;
pub mod organization;
pub mod party;
pub mod transaction;
pub mod type_label;

pub use account::{AccountFields, AccountRepository, AccountView};
pub use organization::{OrganizationFields, OrganizationRepository};
pub use party::PartyRepository;
pub use transaction::{
    TransactionFields, TransactionRepository, TransactionView, TransactionWrapper,
};
pub use type_label::{AccountTypeRepository, TransactionTypeRepository};
