//! Business rule validation for ledger operations.

use super::entry::{BalanceTotals, DetailLine};
use super::error::LedgerError;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Longest accepted type label or party name, in characters.
pub const MAX_LABEL_LEN: usize = 64;

/// Validates that a batch of detail lines is balanced.
///
/// The batch is balanced iff the sum of debit amounts equals the sum of
/// credit amounts exactly. No tolerance is applied and no other amount rule
/// exists, so an empty batch is balanced.
///
/// # Errors
///
/// Returns `LedgerError::UnbalancedTransaction` with both sums when they
/// differ, `LedgerError::AmountOverflow` if a sum leaves the decimal range.
pub fn validate_balance(lines: &[DetailLine]) -> Result<BalanceTotals, LedgerError> {
    let totals = BalanceTotals::of(lines).ok_or(LedgerError::AmountOverflow)?;

    if !totals.is_balanced() {
        return Err(LedgerError::UnbalancedTransaction {
            debit: totals.debit,
            credit: totals.credit,
        });
    }

    Ok(totals)
}

/// Validates a name against `^[a-z0-9_-]{1,32}$`.
///
/// # Errors
///
/// Returns `LedgerError::InvalidName` naming the field.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), LedgerError> {
    let valid = !value.is_empty()
        && value.len() <= MAX_NAME_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');

    if valid {
        Ok(())
    } else {
        Err(LedgerError::InvalidName(field))
    }
}

/// Validates a free-form label: non-blank and at most 64 characters.
///
/// # Errors
///
/// Returns `LedgerError::InvalidLabel` naming the field.
pub fn validate_label(field: &'static str, value: &str) -> Result<(), LedgerError> {
    if value.trim().is_empty() || value.chars().count() > MAX_LABEL_LEN {
        return Err(LedgerError::InvalidLabel(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gledger_shared::types::AccountId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_lines() {
        let (a, b) = (AccountId::new(), AccountId::new());
        let lines = vec![DetailLine::debit(a, dec!(10.00)), DetailLine::credit(b, dec!(10.00))];
        let totals = validate_balance(&lines).unwrap();
        assert_eq!(totals.debit, dec!(10.00));
    }

    #[test]
    fn test_off_by_one_cent_rejected() {
        let (a, b) = (AccountId::new(), AccountId::new());
        let lines = vec![DetailLine::debit(a, dec!(10.01)), DetailLine::credit(b, dec!(10.00))];
        match validate_balance(&lines) {
            Err(LedgerError::UnbalancedTransaction { debit, credit }) => {
                assert_eq!(debit, dec!(10.01));
                assert_eq!(credit, dec!(10.00));
            }
            other => panic!("expected imbalance, got {other:?}"),
        }
    }

    #[test]
    fn test_scale_does_not_matter() {
        let a = AccountId::new();
        let lines = vec![DetailLine::debit(a, dec!(10)), DetailLine::credit(a, dec!(10.0000))];
        assert!(validate_balance(&lines).is_ok());
    }

    #[test]
    fn test_tiny_difference_is_not_tolerated() {
        let a = AccountId::new();
        let lines = vec![
            DetailLine::debit(a, dec!(0.1)),
            DetailLine::debit(a, dec!(0.2)),
            DetailLine::credit(a, dec!(0.3000000000000000000000000001)),
        ];
        assert!(validate_balance(&lines).is_err());
    }

    #[test]
    fn test_decimal_sum_has_no_float_drift() {
        let a = AccountId::new();
        let lines = vec![
            DetailLine::debit(a, dec!(0.1)),
            DetailLine::debit(a, dec!(0.2)),
            DetailLine::credit(a, dec!(0.3)),
        ];
        assert!(validate_balance(&lines).is_ok());
    }

    #[test]
    fn test_empty_batch_is_balanced() {
        assert!(validate_balance(&[]).is_ok());
    }

    #[test]
    fn test_overflow_reported() {
        let a = AccountId::new();
        let lines = vec![
            DetailLine::credit(a, rust_decimal::Decimal::MAX),
            DetailLine::credit(a, rust_decimal::Decimal::MAX),
        ];
        assert!(matches!(validate_balance(&lines), Err(LedgerError::AmountOverflow)));
    }

    #[rstest]
    #[case("acme")]
    #[case("a")]
    #[case("cash_on-hand_2020")]
    #[case("abcdefghijklmnopqrstuvwxyz012345")]
    fn test_valid_names(#[case] name: &str) {
        assert!(validate_name("organization_name", name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("Acme")]
    #[case("acme corp")]
    #[case("acme.corp")]
    #[case("abcdefghijklmnopqrstuvwxyz0123456")]
    #[case("caf\u{e9}")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(matches!(
            validate_name("organization_name", name),
            Err(LedgerError::InvalidName("organization_name"))
        ));
    }

    #[rstest]
    #[case("Asset", true)]
    #[case("Accounts Receivable", true)]
    #[case("", false)]
    #[case("   ", false)]
    fn test_labels(#[case] label: &str, #[case] ok: bool) {
        assert_eq!(validate_label("account_type", label).is_ok(), ok);
    }

    #[test]
    fn test_label_length_counts_characters() {
        assert!(validate_label("party_name", &"\u{e9}".repeat(64)).is_ok());
        assert!(validate_label("party_name", &"x".repeat(65)).is_err());
    }
}
