//! Shift lifecycle: open, close and force close

use bigdecimal::BigDecimal;
use tracing::{debug, info, warn};

use crate::ledger::summary::summarize;
use crate::traits::*;
use crate::types::*;

/// Shift manager for opening and closing the register
pub struct ShiftManager<S: RegisterStorage> {
    pub(crate) storage: S,
    validator: Box<dyn ShiftValidator>,
}

impl<S: RegisterStorage> ShiftManager<S> {
    /// Create a new shift manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultShiftValidator::default()),
        }
    }

    /// Create a new shift manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn ShiftValidator>) -> Self {
        Self { storage, validator }
    }

    /// Check the inputs of an open without touching storage
    pub fn validate_opening(
        &self,
        opening_balance: &BigDecimal,
        opened_by: &str,
    ) -> RegisterResult<()> {
        self.validator.validate_opening(opening_balance, opened_by)
    }

    /// Open a new shift with the declared opening balance
    ///
    /// Fails with `ShiftAlreadyOpen` if another shift is open; the store
    /// rejects the insert even if the check here races with another open.
    pub async fn open_shift(
        &mut self,
        opening_balance: BigDecimal,
        opened_by: String,
    ) -> RegisterResult<Shift> {
        self.validate_opening(&opening_balance, &opened_by)?;

        if let Some(existing) = self.storage.find_open_shift().await? {
            warn!(shift_id = %existing.id, "Refusing to open: a shift is already open");
            return Err(RegisterError::ShiftAlreadyOpen(existing.id));
        }

        let shift = Shift::new(opening_balance, opened_by);
        let stored = self.storage.insert_shift(&shift).await?;

        info!(
            shift_id = %stored.id,
            opening_balance = %stored.opening_balance,
            opened_by = %stored.opened_by,
            "Shift opened"
        );
        Ok(stored)
    }

    /// The currently open shift, queried from storage every time
    pub async fn current_shift(&self) -> RegisterResult<Option<Shift>> {
        self.storage.find_open_shift().await
    }

    /// Get a shift by ID
    pub async fn get_shift(&self, shift_id: &str) -> RegisterResult<Option<Shift>> {
        self.storage.get_shift(shift_id).await
    }

    /// Get a shift by ID, returning an error if not found
    pub async fn get_shift_required(&self, shift_id: &str) -> RegisterResult<Shift> {
        self.storage
            .get_shift(shift_id)
            .await?
            .ok_or_else(|| RegisterError::ShiftNotFound(shift_id.to_string()))
    }

    /// Most recently closed shifts
    pub async fn shift_history(&self, limit: usize) -> RegisterResult<Vec<Shift>> {
        self.storage.list_closed_shifts(limit).await
    }

    /// Transactions inside a shift's window
    pub async fn shift_transactions(&self, shift: &Shift) -> RegisterResult<Vec<Transaction>> {
        self.storage
            .list_transactions_since(shift.opened_at, shift.closed_at)
            .await
    }

    /// Load the shift's transactions and summarize them
    pub async fn summarize_shift(&self, shift: &Shift) -> RegisterResult<ShiftSummary> {
        let transactions = self.shift_transactions(shift).await?;
        let summary = summarize(shift, &transactions);
        debug!(
            shift_id = %shift.id,
            transactions = summary.transaction_count,
            total = %summary.total,
            expected_cash = %summary.expected_cash,
            "Shift summarized"
        );
        Ok(summary)
    }

    /// Load the stored record of a shift that must still be open
    async fn stored_open_shift(&self, shift: &Shift) -> RegisterResult<Shift> {
        let stored = self.get_shift_required(&shift.id).await?;
        if !stored.is_open() {
            warn!(shift_id = %stored.id, "Stored shift is no longer open");
            return Err(RegisterError::ShiftNotOpen(stored.id));
        }
        Ok(stored)
    }

    /// Close an open shift with the counted cash
    ///
    /// Records the expected cash, the counted cash and their difference
    /// (counted minus expected). Expected cash is computed from the stored
    /// shift, not the caller's copy. The store applies the close only if the
    /// shift is still open, so a second close fails with `ShiftNotOpen`.
    pub async fn close_shift(
        &mut self,
        shift: &Shift,
        closing_balance: BigDecimal,
        closed_by: String,
        notes: String,
    ) -> RegisterResult<Shift> {
        if !shift.is_open() {
            warn!(shift_id = %shift.id, "Refusing to close: shift is not open");
            return Err(RegisterError::ShiftNotOpen(shift.id.clone()));
        }

        self.validator
            .validate_closing(&closing_balance, &closed_by, &notes)?;

        let stored = self.stored_open_shift(shift).await?;
        let summary = self.summarize_shift(&stored).await?;
        let patch = ShiftPatch::close(summary.expected_cash, closing_balance, closed_by, notes);
        let closed = self.storage.update_shift(&stored.id, &patch).await?;

        info!(
            shift_id = %closed.id,
            expected = ?closed.expected_balance.as_ref().map(ToString::to_string),
            counted = ?closed.closing_balance.as_ref().map(ToString::to_string),
            difference = ?closed.difference_amount.as_ref().map(ToString::to_string),
            "Shift closed"
        );
        Ok(closed)
    }

    /// Close an open shift without a cash count
    ///
    /// The expected cash is still recorded; counted cash and difference stay
    /// empty and the shift is flagged as an abnormal close.
    pub async fn force_close_shift(
        &mut self,
        shift: &Shift,
        closed_by: String,
        notes: String,
    ) -> RegisterResult<Shift> {
        if !shift.is_open() {
            warn!(shift_id = %shift.id, "Refusing to force close: shift is not open");
            return Err(RegisterError::ShiftNotOpen(shift.id.clone()));
        }

        self.validator.validate_force_close(&closed_by, &notes)?;

        let stored = self.stored_open_shift(shift).await?;
        let summary = self.summarize_shift(&stored).await?;
        let patch = ShiftPatch::force_close(summary.expected_cash, closed_by, notes);
        let closed = self.storage.update_shift(&stored.id, &patch).await?;

        warn!(
            shift_id = %closed.id,
            expected = ?closed.expected_balance.as_ref().map(ToString::to_string),
            "Shift force closed without cash count"
        );
        Ok(closed)
    }
}
