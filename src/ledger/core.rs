//! Main register orchestrator that coordinates shifts and sales

use bigdecimal::BigDecimal;
use tracing::info;

use crate::config::{OpenPolicy, RegisterConfig};
use crate::ledger::{SaleManager, ShiftManager};
use crate::traits::*;
use crate::types::*;

/// Cash register ledger that orchestrates shift and sale operations
///
/// Holds no cached register state: the current shift is re-queried from
/// storage on every call, so results always reflect the latest writes.
pub struct ShiftLedger<S: RegisterStorage> {
    shift_manager: ShiftManager<S>,
    sale_manager: SaleManager<S>,
    config: RegisterConfig,
}

impl<S: RegisterStorage + Clone> ShiftLedger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, RegisterConfig::default())
    }

    /// Create a new ledger with explicit configuration
    ///
    /// The default validators enforce the configured notes limit.
    pub fn with_config(storage: S, config: RegisterConfig) -> Self {
        let shift_validator = DefaultShiftValidator {
            max_notes_len: config.max_notes_len,
        };
        let sale_validator = DefaultSaleValidator {
            max_notes_len: config.max_notes_len,
        };
        Self::with_validators(
            storage,
            config,
            Box::new(shift_validator),
            Box::new(sale_validator),
        )
    }

    /// Create a new ledger with custom validators
    pub fn with_validators(
        storage: S,
        config: RegisterConfig,
        shift_validator: Box<dyn ShiftValidator>,
        sale_validator: Box<dyn SaleValidator>,
    ) -> Self {
        Self {
            shift_manager: ShiftManager::with_validator(storage.clone(), shift_validator),
            sale_manager: SaleManager::with_validator(storage, sale_validator),
            config,
        }
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    // Shift operations
    /// Open the register with the declared opening balance
    ///
    /// With `OpenPolicy::AutoClose` a shift left open is force closed first,
    /// but only once the new open has passed validation.
    pub async fn open_shift(
        &mut self,
        opening_balance: BigDecimal,
        opened_by: String,
    ) -> RegisterResult<Shift> {
        self.shift_manager
            .validate_opening(&opening_balance, &opened_by)?;

        if self.config.open_policy == OpenPolicy::AutoClose {
            if let Some(previous) = self.shift_manager.current_shift().await? {
                info!(shift_id = %previous.id, "Auto-closing previous shift before opening");
                self.shift_manager
                    .force_close_shift(
                        &previous,
                        opened_by.clone(),
                        "Closed automatically when a new shift was opened".to_string(),
                    )
                    .await?;
            }
        }

        self.shift_manager
            .open_shift(opening_balance, opened_by)
            .await
    }

    /// Close a shift with the counted cash
    pub async fn close_shift(
        &mut self,
        shift: &Shift,
        closing_balance: BigDecimal,
        closed_by: String,
        notes: String,
    ) -> RegisterResult<Shift> {
        self.shift_manager
            .close_shift(shift, closing_balance, closed_by, notes)
            .await
    }

    /// Close whatever shift is currently open
    pub async fn close_current_shift(
        &mut self,
        closing_balance: BigDecimal,
        closed_by: String,
        notes: String,
    ) -> RegisterResult<Shift> {
        let shift = self
            .current_shift()
            .await?
            .ok_or_else(|| RegisterError::ShiftNotOpen("no open shift".to_string()))?;
        self.close_shift(&shift, closing_balance, closed_by, notes)
            .await
    }

    /// Close a shift without a cash count
    pub async fn force_close_shift(
        &mut self,
        shift: &Shift,
        closed_by: String,
        notes: String,
    ) -> RegisterResult<Shift> {
        self.shift_manager
            .force_close_shift(shift, closed_by, notes)
            .await
    }

    /// The currently open shift
    pub async fn current_shift(&self) -> RegisterResult<Option<Shift>> {
        self.shift_manager.current_shift().await
    }

    /// Get a shift by ID
    pub async fn get_shift(&self, shift_id: &str) -> RegisterResult<Option<Shift>> {
        self.shift_manager.get_shift(shift_id).await
    }

    /// Closed shifts, newest first, up to the configured history limit
    pub async fn shift_history(&self) -> RegisterResult<Vec<Shift>> {
        self.shift_manager
            .shift_history(self.config.history_limit)
            .await
    }

    // Sale operations
    /// Record a composed sale in the current shift
    pub async fn record_sale(&mut self, transaction: Transaction) -> RegisterResult<Transaction> {
        let current = self.current_shift().await?;
        self.sale_manager
            .record_sale(transaction, current.as_ref())
            .await
    }

    /// Record a plain sale in the current shift
    pub async fn record_transaction(
        &mut self,
        amount: BigDecimal,
        payment_method: PaymentMethod,
    ) -> RegisterResult<Transaction> {
        let current = self.current_shift().await?;
        self.sale_manager
            .record_transaction(amount, payment_method, current.as_ref())
            .await
    }

    /// Latest transactions, newest first, up to the configured limit
    pub async fn recent_transactions(&self) -> RegisterResult<Vec<Transaction>> {
        self.sale_manager
            .recent_transactions(self.config.recent_transactions_limit)
            .await
    }

    /// Get a transaction by ID, returning an error if not found
    pub async fn get_transaction(&self, transaction_id: &str) -> RegisterResult<Transaction> {
        self.sale_manager
            .get_transaction_required(transaction_id)
            .await
    }

    /// Mark the receipt message of a sale as sent
    pub async fn mark_message_sent(&mut self, transaction_id: &str) -> RegisterResult<Transaction> {
        self.sale_manager.mark_message_sent(transaction_id).await
    }

    // Reporting
    /// Transactions inside a shift's window
    pub async fn shift_transactions(&self, shift: &Shift) -> RegisterResult<Vec<Transaction>> {
        self.shift_manager.shift_transactions(shift).await
    }

    /// Summary of any shift, open or closed
    pub async fn summarize_shift(&self, shift: &Shift) -> RegisterResult<ShiftSummary> {
        self.shift_manager.summarize_shift(shift).await
    }

    /// Summary of the open shift, if the register is open
    pub async fn current_summary(&self) -> RegisterResult<Option<ShiftSummary>> {
        match self.current_shift().await? {
            Some(shift) => Ok(Some(self.summarize_shift(&shift).await?)),
            None => Ok(None),
        }
    }
}
