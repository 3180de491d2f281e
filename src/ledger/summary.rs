//! Shift summary aggregation

use bigdecimal::BigDecimal;

use crate::types::*;

/// Summarize the takings of a shift
///
/// Only completed transactions inside the shift window (see
/// [`Shift::covers`]) are counted. Each one is added to the total and to the
/// bucket of its payment method, so the bucket totals always add up to the
/// total. Pure: the same inputs always give the same summary.
pub fn summarize(shift: &Shift, transactions: &[Transaction]) -> ShiftSummary {
    let mut summary = ShiftSummary {
        shift_id: shift.id.clone(),
        transaction_count: 0,
        total: BigDecimal::from(0),
        cash_total: BigDecimal::from(0),
        card_total: BigDecimal::from(0),
        transfer_total: BigDecimal::from(0),
        other_total: BigDecimal::from(0),
        expected_cash: BigDecimal::from(0),
    };

    for transaction in transactions
        .iter()
        .filter(|t| t.is_completed() && shift.covers(t.created_at))
    {
        let amount = &transaction.total_amount;
        summary.transaction_count += 1;
        summary.total += amount;
        match transaction.payment_method.bucket() {
            PaymentBucket::Cash => summary.cash_total += amount,
            PaymentBucket::Card => summary.card_total += amount,
            PaymentBucket::Transfer => summary.transfer_total += amount,
            PaymentBucket::Other => summary.other_total += amount,
        }
    }

    summary.expected_cash = &shift.opening_balance + &summary.cash_total;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    fn sale(shift: &Shift, amount: &str, method: PaymentMethod, offset_minutes: i64) -> Transaction {
        let mut transaction = Transaction::new(dec(amount), method);
        transaction.created_at = shift.opened_at + Duration::minutes(offset_minutes);
        transaction.shift_id = Some(shift.id.clone());
        transaction
    }

    #[test]
    fn test_buckets_add_up_to_total() {
        let shift = Shift::new(dec("100.00"), "user-1".to_string());
        let transactions: Vec<Transaction> = PaymentMethod::ALL
            .iter()
            .enumerate()
            .map(|(i, method)| sale(&shift, "12.50", *method, i as i64))
            .collect();

        let summary = summarize(&shift, &transactions);

        assert_eq!(summary.transaction_count, 7);
        assert_eq!(summary.total, dec("87.50"));
        assert_eq!(summary.cash_total, dec("12.50"));
        assert_eq!(summary.card_total, dec("37.50"));
        assert_eq!(summary.transfer_total, dec("12.50"));
        assert_eq!(summary.other_total, dec("25.00"));
        assert_eq!(summary.expected_cash, dec("112.50"));
        assert!(summary.is_balanced());
    }

    #[test]
    fn test_only_completed_transactions_count() {
        let shift = Shift::new(dec("0"), "user-1".to_string());
        let mut pending = sale(&shift, "40", PaymentMethod::Cash, 1);
        pending.status = TransactionStatus::Pending;
        let mut cancelled = sale(&shift, "15", PaymentMethod::Card, 2);
        cancelled.status = TransactionStatus::Cancelled;
        let completed = sale(&shift, "10", PaymentMethod::Cash, 3);

        let summary = summarize(&shift, &[pending, cancelled, completed]);

        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.total, dec("10"));
        assert_eq!(summary.expected_cash, dec("10"));
    }

    #[test]
    fn test_window_is_bounded_at_both_ends() {
        let mut shift = Shift::new(dec("50"), "user-1".to_string());
        shift.status = ShiftStatus::Closed;
        shift.closed_at = Some(shift.opened_at + Duration::hours(4));

        let before = sale(&shift, "5", PaymentMethod::Cash, -10);
        let inside = sale(&shift, "20", PaymentMethod::Cash, 30);
        let after_close = sale(&shift, "99", PaymentMethod::Cash, 5 * 60);

        let summary = summarize(&shift, &[before, inside, after_close]);

        assert_eq!(summary.transaction_count, 1);
        assert_eq!(summary.cash_total, dec("20"));
        assert_eq!(summary.expected_cash, dec("70"));
    }

    #[test]
    fn test_empty_shift_expects_opening_balance() {
        let shift = Shift::new(dec("0.00"), "user-1".to_string());
        let summary = summarize(&shift, &[]);
        assert_eq!(summary.total, dec("0"));
        assert_eq!(summary.expected_cash, dec("0.00"));
        assert!(summary.is_balanced());
    }

    #[test]
    fn test_summarize_is_pure() {
        let shift = Shift::new(dec("100"), "user-1".to_string());
        let transactions = vec![
            sale(&shift, "20", PaymentMethod::Cash, 1),
            sale(&shift, "15", PaymentMethod::Transfer, 2),
        ];
        assert_eq!(
            summarize(&shift, &transactions),
            summarize(&shift, &transactions)
        );
    }
}
