//! # Register Core
//!
//! Cash register shift ledger for a salon point of sale: opening and
//! closing register shifts, recording sales against the open shift, and
//! reconciling the cash in the drawer at close.
//!
//! ## Features
//!
//! - **Shift lifecycle**: open with a declared float, close with a cash count, or force close
//! - **Sales**: amounts or service line items, refused while the register is closed
//! - **Summaries**: takings per payment-method bucket and expected cash, bounded to the shift window
//! - **Reconciliation**: counted minus expected, classified as surplus or shortage
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use register_core::utils::MemoryStorage;
//! use register_core::{PaymentMethod, ShiftLedger};
//! use bigdecimal::BigDecimal;
//!
//! # async fn run() -> register_core::RegisterResult<()> {
//! let mut ledger = ShiftLedger::new(MemoryStorage::new());
//! ledger.open_shift(BigDecimal::from(100), "user-1".to_string()).await?;
//! ledger.record_transaction(BigDecimal::from(20), PaymentMethod::Cash).await?;
//! let closed = ledger
//!     .close_current_shift(BigDecimal::from(120), "user-1".to_string(), String::new())
//!     .await?;
//! assert_eq!(closed.difference_amount, Some(BigDecimal::from(0)));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
