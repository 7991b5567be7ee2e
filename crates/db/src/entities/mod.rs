//! `SeaORM` entity definitions for the ledger tables.
//!
//! Every table except `gl_transaction_details` carries the same lifecycle
//! columns: `created`, `modified`, `deleted`, `is_deleted` and `version`.

pub mod account_types;
pub mod accounts;
pub mod organizations;
pub mod parties;
pub mod transaction_details;
pub mod transaction_types;
pub mod transactions;

pub mod prelude {
    //! Entity re-exports.

    pub use super::account_types::Entity as AccountTypes;
    pub use super::accounts::Entity as Accounts;
    pub use super::organizations::Entity as Organizations;
    pub use super::parties::Entity as Parties;
    pub use super::transaction_details::Entity as TransactionDetails;
    pub use super::transaction_types::Entity as TransactionTypes;
    pub use super::transactions::Entity as Transactions;
}
