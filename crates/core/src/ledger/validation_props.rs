//! Property-based tests for the balance rule.

use gledger_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::entry::DetailLine;
use super::error::LedgerError;
use super::posting::number_lines;
use super::validation::validate_balance;

/// Amounts from -1,000,000.00 to 1,000,000.00 with two decimals.
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Amounts with up to six decimals.
fn fine_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64, 0u32..=6).prop_map(|(units, scale)| Decimal::new(units, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Mirroring every debit with a credit of the same amount always balances.
    #[test]
    fn prop_mirrored_batch_balances(amounts in prop::collection::vec(signed_amount(), 0..20)) {
        let account = AccountId::new();
        let mut lines = Vec::with_capacity(amounts.len() * 2);
        for amount in &amounts {
            lines.push(DetailLine::debit(account, *amount));
            lines.push(DetailLine::credit(account, *amount));
        }

        let totals = validate_balance(&lines).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
    }

    /// Any non-zero skew on one side is rejected and reports both sums.
    #[test]
    fn prop_skewed_batch_rejected(
        amounts in prop::collection::vec(fine_amount(), 1..10),
        skew in fine_amount(),
    ) {
        let account = AccountId::new();
        let mut lines: Vec<DetailLine> = amounts
            .iter()
            .flat_map(|a| [DetailLine::debit(account, *a), DetailLine::credit(account, *a)])
            .collect();
        lines.push(DetailLine::debit(account, skew));

        let expected_credit: Decimal = amounts.iter().copied().sum();
        match validate_balance(&lines) {
            Err(LedgerError::UnbalancedTransaction { debit, credit }) => {
                prop_assert_eq!(credit, expected_credit);
                prop_assert_eq!(debit, expected_credit + skew);
            }
            other => prop_assert!(false, "expected imbalance, got {:?}", other),
        }
    }

    /// Line order never changes the verdict.
    #[test]
    fn prop_order_independent(amounts in prop::collection::vec(signed_amount(), 1..10)) {
        let account = AccountId::new();
        let mut lines: Vec<DetailLine> = amounts
            .iter()
            .flat_map(|a| [DetailLine::debit(account, *a), DetailLine::credit(account, *a)])
            .collect();
        let forward = validate_balance(&lines).is_ok();
        lines.reverse();
        prop_assert_eq!(forward, validate_balance(&lines).is_ok());
    }

    /// Sequence numbers are dense and continue from the last committed one.
    #[test]
    fn prop_numbering_is_dense(last in 0i32..10_000, count in 0usize..30) {
        let account = AccountId::new();
        let lines = vec![DetailLine::debit(account, Decimal::ONE); count];
        let numbered = number_lines(last, lines).unwrap();

        prop_assert_eq!(numbered.len(), count);
        for (offset, line) in numbered.iter().enumerate() {
            prop_assert_eq!(line.sequence_number, last + 1 + i32::try_from(offset).unwrap());
        }
    }
}
