//! Posting state and sequence numbering for committed detail lines.

use super::entry::{DetailLine, NumberedLine};
use super::error::LedgerError;

/// Whether a transaction has had detail lines committed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingState {
    /// Header only, no lines yet.
    Open,
    /// At least one committed batch.
    Posted,
}

impl PostingState {
    /// Derives the state from the number of committed lines.
    #[must_use]
    pub const fn from_line_count(count: u64) -> Self {
        if count == 0 { Self::Open } else { Self::Posted }
    }
}

/// Assigns sequence numbers to a batch, continuing after `last_committed`.
///
/// `last_committed` is the highest sequence number already stored for the
/// transaction, or 0 when there is none. Numbers are dense and follow the
/// submission order of the batch.
///
/// # Errors
///
/// Returns `LedgerError::SequenceExhausted` if the batch would number past
/// `i32::MAX`.
pub fn number_lines(
    last_committed: i32,
    lines: Vec<DetailLine>,
) -> Result<Vec<NumberedLine>, LedgerError> {
    let count = i32::try_from(lines.len()).map_err(|_| LedgerError::SequenceExhausted)?;
    last_committed
        .checked_add(count)
        .ok_or(LedgerError::SequenceExhausted)?;

    Ok(lines
        .into_iter()
        .zip(1..=count)
        .map(|(line, offset)| NumberedLine {
            sequence_number: last_committed + offset,
            line,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gledger_shared::types::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_posting_state_from_count() {
        assert_eq!(PostingState::from_line_count(0), PostingState::Open);
        assert_eq!(PostingState::from_line_count(3), PostingState::Posted);
    }

    #[test]
    fn test_first_batch_starts_at_one() {
        let a = AccountId::new();
        let numbered = number_lines(
            0,
            vec![DetailLine::debit(a, dec!(5)), DetailLine::credit(a, dec!(5))],
        )
        .unwrap();
        let seqs: Vec<i32> = numbered.iter().map(|n| n.sequence_number).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(numbered[1].line.amount, dec!(5));
    }

    #[test]
    fn test_later_batch_continues() {
        let a = AccountId::new();
        let numbered = number_lines(2, vec![DetailLine::debit(a, dec!(1))]).unwrap();
        assert_eq!(numbered[0].sequence_number, 3);
    }

    #[test]
    fn test_empty_batch_numbers_nothing() {
        assert!(number_lines(7, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_numbering_stops_at_i32_max() {
        let a = AccountId::new();
        let pair = || vec![DetailLine::debit(a, dec!(1)), DetailLine::credit(a, dec!(1))];

        let last = number_lines(i32::MAX - 2, pair()).unwrap();
        assert_eq!(last[1].sequence_number, i32::MAX);

        assert!(matches!(
            number_lines(i32::MAX - 1, pair()),
            Err(LedgerError::SequenceExhausted)
        ));
        assert!(matches!(
            number_lines(i32::MAX, vec![DetailLine::debit(a, dec!(1))]),
            Err(LedgerError::SequenceExhausted)
        ));
    }
}
