//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;

use crate::types::*;
use crate::utils::validation::validate_notes;

/// Notes limit used when no configuration is given
pub const DEFAULT_MAX_NOTES_LEN: usize = 500;

/// Storage abstraction for the register
///
/// This trait lets the register core work against any backing store (a
/// hosted database behind an HTTP API, SQLite, in-memory, etc.). Each method
/// is one round trip that either succeeds or fails with an error.
///
/// Implementations own two guarantees the core relies on:
/// - `insert_shift` must reject an open shift while another is open
///   (`RegisterError::ShiftAlreadyOpen`).
/// - `update_shift` must apply the patch only if the stored status equals
///   `patch.expected_status` (`RegisterError::ShiftNotOpen` otherwise).
#[async_trait]
pub trait RegisterStorage: Send + Sync {
    /// The currently open shift, if any
    async fn find_open_shift(&self) -> RegisterResult<Option<Shift>>;

    /// Get a shift by ID
    async fn get_shift(&self, shift_id: &str) -> RegisterResult<Option<Shift>>;

    /// Most recently closed shifts, newest `closed_at` first
    async fn list_closed_shifts(&self, limit: usize) -> RegisterResult<Vec<Shift>>;

    /// Transactions created at or after `since` and, when given, before
    /// `until`, ordered by `created_at` ascending
    async fn list_transactions_since(
        &self,
        since: NaiveDateTime,
        until: Option<NaiveDateTime>,
    ) -> RegisterResult<Vec<Transaction>>;

    /// Latest transactions, newest first
    async fn list_recent_transactions(&self, limit: usize) -> RegisterResult<Vec<Transaction>>;

    /// Get a transaction by ID
    async fn get_transaction(&self, transaction_id: &str) -> RegisterResult<Option<Transaction>>;

    /// Insert a new shift, returning the stored record
    async fn insert_shift(&mut self, shift: &Shift) -> RegisterResult<Shift>;

    /// Conditionally update a shift, returning the updated record
    async fn update_shift(&mut self, shift_id: &str, patch: &ShiftPatch) -> RegisterResult<Shift>;

    /// Insert a new transaction, returning the stored record
    async fn insert_transaction(&mut self, transaction: &Transaction)
        -> RegisterResult<Transaction>;

    /// Flag whether the receipt message for a transaction was sent
    async fn set_message_sent(
        &mut self,
        transaction_id: &str,
        sent: bool,
    ) -> RegisterResult<Transaction>;
}

/// Trait for implementing custom shift validation rules
pub trait ShiftValidator: Send + Sync {
    /// Validate the inputs of an open before anything is stored
    fn validate_opening(&self, opening_balance: &BigDecimal, opened_by: &str)
        -> RegisterResult<()>;

    /// Validate the inputs of a close before anything is stored
    fn validate_closing(
        &self,
        closing_balance: &BigDecimal,
        closed_by: &str,
        notes: &str,
    ) -> RegisterResult<()>;

    /// Validate the inputs of a close without a cash count
    fn validate_force_close(&self, closed_by: &str, notes: &str) -> RegisterResult<()>;
}

/// Trait for implementing custom sale validation rules
pub trait SaleValidator: Send + Sync {
    /// Validate a sale before it is stored
    fn validate_sale(&self, transaction: &Transaction) -> RegisterResult<()>;
}

/// Default shift validator with basic rules
pub struct DefaultShiftValidator {
    pub max_notes_len: usize,
}

impl Default for DefaultShiftValidator {
    fn default() -> Self {
        Self {
            max_notes_len: DEFAULT_MAX_NOTES_LEN,
        }
    }
}

fn validate_closer(closed_by: &str) -> RegisterResult<()> {
    if closed_by.trim().is_empty() {
        return Err(RegisterError::Validation(
            "Closing user cannot be empty".to_string(),
        ));
    }
    Ok(())
}

impl ShiftValidator for DefaultShiftValidator {
    fn validate_opening(
        &self,
        opening_balance: &BigDecimal,
        opened_by: &str,
    ) -> RegisterResult<()> {
        if *opening_balance < BigDecimal::from(0) {
            return Err(RegisterError::Validation(
                "Opening balance cannot be negative".to_string(),
            ));
        }

        if opened_by.trim().is_empty() {
            return Err(RegisterError::Validation(
                "Opening user cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_closing(
        &self,
        closing_balance: &BigDecimal,
        closed_by: &str,
        notes: &str,
    ) -> RegisterResult<()> {
        if *closing_balance < BigDecimal::from(0) {
            return Err(RegisterError::Validation(
                "Closing balance cannot be negative".to_string(),
            ));
        }

        validate_closer(closed_by)?;
        validate_notes(notes, self.max_notes_len)
    }

    fn validate_force_close(&self, closed_by: &str, notes: &str) -> RegisterResult<()> {
        validate_closer(closed_by)?;
        validate_notes(notes, self.max_notes_len)
    }
}

/// Default sale validator
pub struct DefaultSaleValidator {
    pub max_notes_len: usize,
}

impl Default for DefaultSaleValidator {
    fn default() -> Self {
        Self {
            max_notes_len: DEFAULT_MAX_NOTES_LEN,
        }
    }
}

impl SaleValidator for DefaultSaleValidator {
    fn validate_sale(&self, transaction: &Transaction) -> RegisterResult<()> {
        transaction.validate()?;
        validate_notes(&transaction.notes, self.max_notes_len)
    }
}
