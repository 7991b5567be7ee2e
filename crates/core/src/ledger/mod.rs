//! Double-entry bookkeeping logic.
//!
//! This module implements the rules the posting engine enforces before
//! anything reaches the store:
//! - Detail lines (debits and credits)
//! - The exact-decimal balance check
//! - Server-side sequence numbering of committed lines
//! - Lexical rules for names and labels
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod posting;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{BalanceTotals, DetailLine, EntryType, NumberedLine};
pub use error::LedgerError;
pub use posting::{PostingState, number_lines};
pub use validation::{validate_balance, validate_label, validate_name};
