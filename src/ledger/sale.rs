//! Sale recording at the point of sale

use bigdecimal::BigDecimal;
use tracing::{info, warn};

use crate::traits::*;
use crate::types::*;

/// Sale manager for recording transactions against the open shift
pub struct SaleManager<S: RegisterStorage> {
    storage: S,
    validator: Box<dyn SaleValidator>,
}

impl<S: RegisterStorage> SaleManager<S> {
    /// Create a new sale manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultSaleValidator::default()),
        }
    }

    /// Create a new sale manager with custom validator
    pub fn with_validator(storage: S, validator: Box<dyn SaleValidator>) -> Self {
        Self { storage, validator }
    }

    /// Record a sale in the given shift
    ///
    /// The register must have an open shift; otherwise the sale is refused
    /// with `RegisterClosed` and nothing is stored. The sale is owned by the
    /// shift from here on. The shift record itself is not touched.
    pub async fn record_sale(
        &mut self,
        mut transaction: Transaction,
        current_shift: Option<&Shift>,
    ) -> RegisterResult<Transaction> {
        self.validator.validate_sale(&transaction)?;

        let shift = match current_shift {
            Some(shift) if shift.is_open() => shift,
            _ => {
                warn!(
                    amount = %transaction.total_amount,
                    method = %transaction.payment_method,
                    "Sale refused: register closed"
                );
                return Err(RegisterError::RegisterClosed);
            }
        };

        transaction.shift_id = Some(shift.id.clone());
        transaction.status = TransactionStatus::Completed;
        transaction.created_at = chrono::Utc::now().naive_utc();

        let stored = self.storage.insert_transaction(&transaction).await?;

        info!(
            transaction_id = %stored.id,
            shift_id = %shift.id,
            amount = %stored.total_amount,
            method = %stored.payment_method,
            "Sale recorded"
        );
        Ok(stored)
    }

    /// Record a plain sale of `amount` paid with `payment_method`
    pub async fn record_transaction(
        &mut self,
        amount: BigDecimal,
        payment_method: PaymentMethod,
        current_shift: Option<&Shift>,
    ) -> RegisterResult<Transaction> {
        let transaction = SaleBuilder::new(payment_method).amount(amount).build()?;
        self.record_sale(transaction, current_shift).await
    }

    /// Get a transaction by ID, returning an error if not found
    pub async fn get_transaction_required(
        &self,
        transaction_id: &str,
    ) -> RegisterResult<Transaction> {
        self.storage
            .get_transaction(transaction_id)
            .await?
            .ok_or_else(|| RegisterError::TransactionNotFound(transaction_id.to_string()))
    }

    /// Latest transactions, newest first
    pub async fn recent_transactions(&self, limit: usize) -> RegisterResult<Vec<Transaction>> {
        self.storage.list_recent_transactions(limit).await
    }

    /// Mark the receipt message of a sale as sent
    pub async fn mark_message_sent(&mut self, transaction_id: &str) -> RegisterResult<Transaction> {
        self.storage.set_message_sent(transaction_id, true).await
    }
}

/// Builder for composing a sale before it is recorded
#[derive(Debug)]
pub struct SaleBuilder {
    payment_method: PaymentMethod,
    amount: Option<BigDecimal>,
    items: Vec<SaleItem>,
    client_id: Option<String>,
    created_by: Option<String>,
    notes: String,
}

impl SaleBuilder {
    /// Create a new sale builder
    pub fn new(payment_method: PaymentMethod) -> Self {
        Self {
            payment_method,
            amount: None,
            items: Vec::new(),
            client_id: None,
            created_by: None,
            notes: String::new(),
        }
    }

    /// Set the total amount explicitly
    pub fn amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Add a service line
    pub fn item(mut self, service_id: String, quantity: u32, unit_price: BigDecimal) -> Self {
        self.items.push(SaleItem::new(service_id, quantity, unit_price));
        self
    }

    pub fn client(mut self, client_id: String) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn created_by(mut self, user_id: String) -> Self {
        self.created_by = Some(user_id);
        self
    }

    pub fn notes(mut self, notes: String) -> Self {
        self.notes = notes;
        self
    }

    /// Build the transaction
    ///
    /// Without an explicit amount the total is the sum of the item subtotals.
    pub fn build(self) -> RegisterResult<Transaction> {
        let total = match self.amount {
            Some(amount) => amount,
            None if !self.items.is_empty() => self.items.iter().map(|i| &i.subtotal).sum(),
            None => {
                return Err(RegisterError::Validation(
                    "Sale needs an amount or at least one item".to_string(),
                ))
            }
        };

        let mut transaction = Transaction::new(total, self.payment_method);
        transaction.items = self.items;
        transaction.client_id = self.client_id;
        transaction.created_by = self.created_by;
        transaction.notes = self.notes;

        transaction.validate()?;
        Ok(transaction)
    }
}
