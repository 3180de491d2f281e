//! Basic register usage example

use bigdecimal::BigDecimal;
use register_core::utils::MemoryStorage;
use register_core::{CashDifference, PaymentMethod, RegisterConfig, SaleBuilder, ShiftLedger};
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("register_core=info")
        .init();

    println!("Register Core - Basic Register Example\n");

    let config = RegisterConfig::from_env();
    let mut ledger = ShiftLedger::with_config(MemoryStorage::new(), config);

    // 1. Open the register with a float
    let shift = ledger
        .open_shift(BigDecimal::from_str("100.00")?, "front-desk".to_string())
        .await?;
    println!("Opened shift {} with ${}", shift.id, shift.opening_balance);

    // 2. Ring up a few sales
    let haircut = SaleBuilder::new(PaymentMethod::Cash)
        .item("haircut".to_string(), 1, BigDecimal::from_str("20.00")?)
        .created_by("front-desk".to_string())
        .build()?;
    ledger.record_sale(haircut).await?;
    ledger
        .record_transaction(BigDecimal::from_str("15.00")?, PaymentMethod::Transfer)
        .await?;
    ledger
        .record_transaction(BigDecimal::from_str("42.50")?, PaymentMethod::Credit)
        .await?;

    // 3. Running summary
    if let Some(summary) = ledger.current_summary().await? {
        println!("\nShift summary ({} sales)", summary.transaction_count);
        println!("  Total:         ${}", summary.total);
        println!("  Cash:          ${}", summary.cash_total);
        println!("  Card:          ${}", summary.card_total);
        println!("  Transfer:      ${}", summary.transfer_total);
        println!("  Other:         ${}", summary.other_total);
        println!("  Expected cash: ${}", summary.expected_cash);
    }

    // 4. Count the drawer and close
    let closed = ledger
        .close_current_shift(
            BigDecimal::from_str("110.00")?,
            "front-desk".to_string(),
            "End of day".to_string(),
        )
        .await?;

    match closed.cash_difference() {
        Some(CashDifference::Surplus(amount)) => println!("\nClosed with ${} de más", amount),
        Some(CashDifference::Shortage(amount)) => println!("\nClosed with ${} de menos", amount),
        Some(CashDifference::Balanced) => println!("\nClosed balanced"),
        None => println!("\nClosed without a cash count"),
    }

    Ok(())
}
