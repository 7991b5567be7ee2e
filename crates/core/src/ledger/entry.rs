//! Transaction detail line types.

use gledger_shared::types::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a detail line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl EntryType {
    /// Maps the stored debit flag to an entry type.
    #[must_use]
    pub const fn from_is_debit(is_debit: bool) -> Self {
        if is_debit { Self::Debit } else { Self::Credit }
    }

    /// Returns the debit flag as stored.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::Debit)
    }
}

/// A detail line as submitted for posting.
///
/// Amounts are exact decimals and may carry any sign; only the per-side sums
/// are constrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailLine {
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Line amount.
    pub amount: Decimal,
    /// Whether this is a debit or credit.
    pub entry_type: EntryType,
}

impl DetailLine {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            entry_type: EntryType::Debit,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            amount,
            entry_type: EntryType::Credit,
        }
    }
}

/// A detail line with its committed position inside the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedLine {
    /// 1-based sequence number, unique within the transaction.
    pub sequence_number: i32,
    /// The submitted line.
    pub line: DetailLine,
}

/// Per-side sums of a line batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceTotals {
    /// Sum of debit amounts.
    pub debit: Decimal,
    /// Sum of credit amounts.
    pub credit: Decimal,
}

impl BalanceTotals {
    /// Sums a batch of lines.
    ///
    /// Returns `None` if either side overflows the decimal range.
    #[must_use]
    pub fn of(lines: &[DetailLine]) -> Option<Self> {
        lines.iter().try_fold(
            Self {
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
            |mut totals, line| {
                match line.entry_type {
                    EntryType::Debit => totals.debit = totals.debit.checked_add(line.amount)?,
                    EntryType::Credit => totals.credit = totals.credit.checked_add(line.amount)?,
                }
                Some(totals)
            },
        )
    }

    /// Exact decimal equality of both sides.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debit == self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_type_flag_round_trip() {
        assert_eq!(EntryType::from_is_debit(true), EntryType::Debit);
        assert_eq!(EntryType::from_is_debit(false), EntryType::Credit);
        assert!(EntryType::Debit.is_debit());
        assert!(!EntryType::Credit.is_debit());
    }

    #[test]
    fn test_totals_sum_each_side() {
        let a = AccountId::new();
        let lines = vec![
            DetailLine::debit(a, dec!(10.00)),
            DetailLine::debit(a, dec!(2.50)),
            DetailLine::credit(a, dec!(12.5)),
        ];
        let totals = BalanceTotals::of(&lines).unwrap();
        assert_eq!(totals.debit, dec!(12.50));
        assert_eq!(totals.credit, dec!(12.5));
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_totals_empty_batch_is_zero() {
        let totals = BalanceTotals::of(&[]).unwrap();
        assert_eq!(totals.debit, Decimal::ZERO);
        assert!(totals.is_balanced());
    }

    #[test]
    fn test_totals_overflow_is_none() {
        let a = AccountId::new();
        let lines = vec![
            DetailLine::debit(a, Decimal::MAX),
            DetailLine::debit(a, Decimal::MAX),
        ];
        assert!(BalanceTotals::of(&lines).is_none());
    }
}
