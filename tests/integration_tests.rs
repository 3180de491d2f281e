//! Integration tests for register-core

use bigdecimal::BigDecimal;
use register_core::{
    utils::{EnhancedSaleValidator, EnhancedShiftValidator, MemoryStorage},
    CashDifference, OpenPolicy, PaymentMethod, RegisterConfig, RegisterError, RegisterStorage,
    SaleBuilder, ShiftLedger, ShiftStatus, Transaction,
};
use std::str::FromStr;

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

#[tokio::test]
async fn test_balanced_close_out() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("register_core=debug")
        .with_test_writer()
        .try_init();

    let mut ledger = ShiftLedger::new(MemoryStorage::new());

    ledger
        .open_shift(dec("100.00"), "stylist-1".to_string())
        .await
        .unwrap();
    ledger
        .record_transaction(dec("50.00"), PaymentMethod::Cash)
        .await
        .unwrap();
    ledger
        .record_transaction(dec("30.00"), PaymentMethod::Card)
        .await
        .unwrap();

    let closed = ledger
        .close_current_shift(dec("150.00"), "stylist-1".to_string(), String::new())
        .await
        .unwrap();

    assert_eq!(closed.status, ShiftStatus::Closed);
    assert_eq!(closed.expected_balance, Some(dec("150.00")));
    assert_eq!(closed.closing_balance, Some(dec("150.00")));
    assert_eq!(closed.difference_amount, Some(dec("0.00")));
    assert!(closed.closed_at.is_some());
    assert_eq!(closed.closed_by.as_deref(), Some("stylist-1"));
}

#[tokio::test]
async fn test_shortage_close_out() {
    let mut ledger = ShiftLedger::new(MemoryStorage::new());

    let shift = ledger
        .open_shift(dec("100.00"), "stylist-1".to_string())
        .await
        .unwrap();
    ledger
        .record_transaction(dec("20.00"), PaymentMethod::Cash)
        .await
        .unwrap();
    ledger
        .record_transaction(dec("15.00"), PaymentMethod::Transfer)
        .await
        .unwrap();

    let summary = ledger.summarize_shift(&shift).await.unwrap();
    assert_eq!(summary.total, dec("35.00"));
    assert_eq!(summary.cash_total, dec("20.00"));
    assert_eq!(summary.transfer_total, dec("15.00"));
    assert_eq!(summary.expected_cash, dec("120.00"));

    let closed = ledger
        .close_shift(
            &shift,
            dec("110.00"),
            "manager".to_string(),
            "Missing a ten".to_string(),
        )
        .await
        .unwrap();

    assert_eq!(closed.expected_balance, Some(dec("120.00")));
    assert_eq!(closed.difference_amount, Some(dec("-10.00")));
    assert_eq!(
        closed.cash_difference(),
        Some(CashDifference::Shortage(dec("10.00")))
    );
    assert_eq!(closed.notes, "Missing a ten");
}

#[tokio::test]
async fn test_sale_without_open_shift_is_refused() {
    let storage = MemoryStorage::new();
    let mut ledger = ShiftLedger::new(storage.clone());

    let result = ledger
        .record_transaction(dec("25.00"), PaymentMethod::Cash)
        .await;

    assert!(matches!(result, Err(RegisterError::RegisterClosed)));
    assert!(storage.list_recent_transactions(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_closing_twice_fails() {
    let mut ledger = ShiftLedger::new(MemoryStorage::new());

    let shift = ledger
        .open_shift(dec("50"), "stylist-1".to_string())
        .await
        .unwrap();
    let closed = ledger
        .close_shift(&shift, dec("50"), "stylist-1".to_string(), String::new())
        .await
        .unwrap();

    let again = ledger
        .close_shift(&closed, dec("50"), "stylist-1".to_string(), String::new())
        .await;
    assert!(matches!(again, Err(RegisterError::ShiftNotOpen(_))));

    let no_current = ledger
        .close_current_shift(dec("50"), "stylist-1".to_string(), String::new())
        .await;
    assert!(matches!(no_current, Err(RegisterError::ShiftNotOpen(_))));
}

#[tokio::test]
async fn test_zero_float_and_surplus() {
    let mut ledger = ShiftLedger::new(MemoryStorage::new());

    let shift = ledger
        .open_shift(dec("0.00"), "stylist-1".to_string())
        .await
        .unwrap();
    let summary = ledger.current_summary().await.unwrap().unwrap();
    assert_eq!(summary.expected_cash, dec("0.00"));
    assert_eq!(summary.transaction_count, 0);

    let closed = ledger
        .close_shift(&shift, dec("0.50"), "stylist-1".to_string(), String::new())
        .await
        .unwrap();
    assert_eq!(closed.difference_amount, Some(dec("0.50")));
    assert!(matches!(
        closed.cash_difference(),
        Some(CashDifference::Surplus(_))
    ));
}

#[tokio::test]
async fn test_only_one_open_shift() {
    let mut ledger = ShiftLedger::new(MemoryStorage::new());

    let first = ledger
        .open_shift(dec("10"), "stylist-1".to_string())
        .await
        .unwrap();
    let second = ledger.open_shift(dec("20"), "stylist-2".to_string()).await;

    match second {
        Err(RegisterError::ShiftAlreadyOpen(id)) => assert_eq!(id, first.id),
        other => panic!("expected ShiftAlreadyOpen, got {:?}", other),
    }
    assert_eq!(ledger.current_shift().await.unwrap().unwrap().id, first.id);
}

#[tokio::test]
async fn test_late_sales_do_not_leak_into_next_shift() {
    let storage = MemoryStorage::new();
    let config = RegisterConfig::default().with_open_policy(OpenPolicy::Reject);
    let mut ledger = ShiftLedger::with_config(storage.clone(), config);

    let morning = ledger
        .open_shift(dec("100"), "stylist-1".to_string())
        .await
        .unwrap();
    ledger
        .record_transaction(dec("40"), PaymentMethod::Cash)
        .await
        .unwrap();
    let morning = ledger
        .close_shift(&morning, dec("140"), "stylist-1".to_string(), String::new())
        .await
        .unwrap();

    // A sale written by another client after close, before the next open
    let mut stray = Transaction::new(dec("500"), PaymentMethod::Cash);
    stray.created_at = morning.closed_at.unwrap();
    storage.seed_transaction(stray).unwrap();

    let evening = ledger
        .open_shift(dec("80"), "stylist-2".to_string())
        .await
        .unwrap();
    ledger
        .record_transaction(dec("12"), PaymentMethod::Paypal)
        .await
        .unwrap();

    let evening_summary = ledger.summarize_shift(&evening).await.unwrap();
    assert_eq!(evening_summary.total, dec("12"));
    assert_eq!(evening_summary.other_total, dec("12"));
    assert_eq!(evening_summary.expected_cash, dec("80"));

    let morning_summary = ledger.summarize_shift(&morning).await.unwrap();
    assert_eq!(morning_summary.total, dec("40"));
    assert_eq!(morning_summary.expected_cash, dec("140"));
}

#[tokio::test]
async fn test_every_bucket_in_one_shift() {
    let mut ledger = ShiftLedger::new(MemoryStorage::new());
    ledger
        .open_shift(dec("200"), "stylist-1".to_string())
        .await
        .unwrap();

    for method in PaymentMethod::ALL {
        ledger
            .record_transaction(dec("10.00"), method)
            .await
            .unwrap();
    }

    let summary = ledger.current_summary().await.unwrap().unwrap();
    assert_eq!(summary.transaction_count, 7);
    assert_eq!(summary.total, dec("70.00"));
    assert_eq!(summary.cash_total, dec("10.00"));
    assert_eq!(summary.card_total, dec("30.00"));
    assert_eq!(summary.transfer_total, dec("10.00"));
    assert_eq!(summary.other_total, dec("20.00"));
    assert_eq!(summary.expected_cash, dec("210.00"));
    assert!(summary.is_balanced());
}

#[tokio::test]
async fn test_history_and_recent_lists() {
    let config = RegisterConfig {
        history_limit: 2,
        recent_transactions_limit: 3,
        ..RegisterConfig::default()
    };
    let mut ledger = ShiftLedger::with_config(MemoryStorage::new(), config);

    let mut closed_ids = Vec::new();
    for round in 0..3 {
        ledger
            .open_shift(dec("10"), "stylist-1".to_string())
            .await
            .unwrap();
        ledger
            .record_transaction(BigDecimal::from(round + 1), PaymentMethod::Card)
            .await
            .unwrap();
        ledger
            .record_transaction(BigDecimal::from(round + 1), PaymentMethod::Cash)
            .await
            .unwrap();
        let closed = ledger
            .close_current_shift(dec("10"), "stylist-1".to_string(), String::new())
            .await
            .unwrap();
        closed_ids.push(closed.id);
    }

    let history = ledger.shift_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, closed_ids[2]);
    assert_eq!(history[1].id, closed_ids[1]);

    let recent = ledger.recent_transactions().await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn test_itemised_sale_with_enhanced_validation() {
    let storage = MemoryStorage::new();
    let config = RegisterConfig::default();
    let mut ledger = ShiftLedger::with_validators(
        storage,
        config.clone(),
        Box::new(EnhancedShiftValidator {
            max_notes_len: config.max_notes_len,
        }),
        Box::new(EnhancedSaleValidator {
            max_notes_len: config.max_notes_len,
        }),
    );

    let too_precise = ledger
        .open_shift(dec("10.001"), "stylist-1".to_string())
        .await;
    assert!(matches!(too_precise, Err(RegisterError::Validation(_))));

    ledger
        .open_shift(dec("10.00"), "stylist-1".to_string())
        .await
        .unwrap();

    let sale = SaleBuilder::new(PaymentMethod::Cash)
        .item("colour".to_string(), 1, dec("45.00"))
        .item("blow-dry".to_string(), 1, dec("15.00"))
        .client("client-3".to_string())
        .created_by("stylist-1".to_string())
        .notes("Regular".to_string())
        .build()
        .unwrap();
    let recorded = ledger.record_sale(sale).await.unwrap();
    assert_eq!(recorded.total_amount, dec("60.00"));

    let sent = ledger.mark_message_sent(&recorded.id).await.unwrap();
    assert!(sent.message_sent);
    assert_eq!(ledger.get_transaction(&recorded.id).await.unwrap().items.len(), 2);

    let summary = ledger.current_summary().await.unwrap().unwrap();
    assert_eq!(summary.expected_cash, dec("70.00"));
}

#[tokio::test]
async fn test_store_failure_surfaces_on_close() {
    let storage = MemoryStorage::new();
    let mut ledger = ShiftLedger::new(storage.clone());

    let shift = ledger
        .open_shift(dec("100"), "stylist-1".to_string())
        .await
        .unwrap();

    storage.set_unavailable(true);
    let result = ledger
        .close_shift(&shift, dec("100"), "stylist-1".to_string(), String::new())
        .await;
    assert!(matches!(result, Err(RegisterError::Storage(_))));

    storage.set_unavailable(false);
    let still_open = ledger.current_shift().await.unwrap().unwrap();
    assert_eq!(still_open.id, shift.id);
    assert!(still_open.is_open());
}
