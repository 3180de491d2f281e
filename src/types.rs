//! Core types and data structures for the cash register

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a sale was paid, as stored on the transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Debit,
    Credit,
    Transfer,
    Paypal,
    Other,
}

impl PaymentMethod {
    /// Every stored payment method
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
        PaymentMethod::Transfer,
        PaymentMethod::Paypal,
        PaymentMethod::Other,
    ];

    /// Reporting bucket this method is aggregated into
    ///
    /// Card, credit and debit are distinct stored values that collapse into
    /// the card bucket; PayPal and other share the other bucket.
    pub fn bucket(&self) -> PaymentBucket {
        match self {
            PaymentMethod::Cash => PaymentBucket::Cash,
            PaymentMethod::Card | PaymentMethod::Credit | PaymentMethod::Debit => {
                PaymentBucket::Card
            }
            PaymentMethod::Transfer => PaymentBucket::Transfer,
            PaymentMethod::Paypal | PaymentMethod::Other => PaymentBucket::Other,
        }
    }

    /// Stored string value
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Debit => "debit",
            PaymentMethod::Credit => "credit",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Other => "other",
        }
    }

    /// Label shown on receipts and the register screen
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Debit => "Débito",
            PaymentMethod::Credit => "Crédito",
            PaymentMethod::Transfer => "Transferencia",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::Other => "Otro",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| RegisterError::Validation(format!("Unknown payment method '{}'", s)))
    }
}

/// Reporting buckets used when aggregating a shift's takings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentBucket {
    /// Notes and coins that end up in the drawer
    Cash,
    /// Card, credit and debit payments
    Card,
    /// Bank transfers
    Transfer,
    /// PayPal and anything else
    Other,
}

/// Lifecycle state of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Cancelled,
}

impl TransactionStatus {
    /// Stored string value
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = RegisterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(TransactionStatus::Completed),
            "pending" => Ok(TransactionStatus::Pending),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(RegisterError::Validation(format!(
                "Unknown transaction status '{}'",
                other
            ))),
        }
    }
}

/// Shift status. A shift moves from open to closed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Closed,
}

/// One open-to-close session of the cash register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift
    pub id: String,
    /// Cash declared in the drawer when the shift opened
    pub opening_balance: BigDecimal,
    /// Cash counted at close, absent until closed (or on abnormal close)
    pub closing_balance: Option<BigDecimal>,
    /// Opening balance plus cash takings, recorded at close
    pub expected_balance: Option<BigDecimal>,
    /// Closing minus expected; positive is a surplus, negative a shortage
    pub difference_amount: Option<BigDecimal>,
    pub status: ShiftStatus,
    pub opened_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
    /// Identity of the user who opened the register
    pub opened_by: String,
    /// Identity of the user who closed the register
    pub closed_by: Option<String>,
    pub notes: String,
    /// Closed without a cash count
    #[serde(default)]
    pub abnormal_close: bool,
}

impl Shift {
    /// Create a new open shift starting now
    pub fn new(opening_balance: BigDecimal, opened_by: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            opening_balance,
            closing_balance: None,
            expected_balance: None,
            difference_amount: None,
            status: ShiftStatus::Open,
            opened_at: chrono::Utc::now().naive_utc(),
            closed_at: None,
            opened_by,
            closed_by: None,
            notes: String::new(),
            abnormal_close: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }

    /// Whether a transaction created at `at` falls inside this shift's window
    ///
    /// The window starts at `opened_at` (inclusive) and, once the shift is
    /// closed, ends at `closed_at` (exclusive).
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        if at < self.opened_at {
            return false;
        }
        match self.closed_at {
            Some(closed_at) => at < closed_at,
            None => true,
        }
    }

    /// Classification of the recorded difference, if the shift was counted
    pub fn cash_difference(&self) -> Option<CashDifference> {
        self.difference_amount.as_ref().map(CashDifference::from_amount)
    }
}

/// Surplus / shortage classification of a close-out difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashDifference {
    /// More cash counted than expected ("de más")
    Surplus(BigDecimal),
    /// Less cash counted than expected ("de menos")
    Shortage(BigDecimal),
    Balanced,
}

impl CashDifference {
    /// Classify a signed difference; the carried amount is always non-negative
    pub fn from_amount(difference: &BigDecimal) -> Self {
        let zero = BigDecimal::from(0);
        if *difference > zero {
            CashDifference::Surplus(difference.clone())
        } else if *difference < zero {
            CashDifference::Shortage(difference.abs())
        } else {
            CashDifference::Balanced
        }
    }
}

/// Service line on a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub service_id: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
}

impl SaleItem {
    pub fn new(service_id: String, quantity: u32, unit_price: BigDecimal) -> Self {
        let subtotal = &unit_price * BigDecimal::from(quantity);
        Self {
            service_id,
            quantity,
            unit_price,
            subtotal,
        }
    }
}

/// One completed sale at the point of sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for the transaction
    pub id: String,
    pub total_amount: BigDecimal,
    pub payment_method: PaymentMethod,
    pub status: TransactionStatus,
    pub created_at: NaiveDateTime,
    /// Shift the sale was rung up in, assigned once at creation
    pub shift_id: Option<String>,
    pub client_id: Option<String>,
    /// Identity of the user who recorded the sale
    pub created_by: Option<String>,
    pub notes: String,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    /// Receipt message already sent to the client
    #[serde(default)]
    pub message_sent: bool,
}

impl Transaction {
    /// Create a new completed transaction, not yet assigned to a shift
    pub fn new(total_amount: BigDecimal, payment_method: PaymentMethod) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            total_amount,
            payment_method,
            status: TransactionStatus::Completed,
            created_at: chrono::Utc::now().naive_utc(),
            shift_id: None,
            client_id: None,
            created_by: None,
            notes: String::new(),
            items: Vec::new(),
            message_sent: false,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    /// Sum of the line item subtotals
    pub fn items_total(&self) -> BigDecimal {
        self.items.iter().map(|item| &item.subtotal).sum()
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), RegisterError> {
        if self.total_amount <= BigDecimal::from(0) {
            return Err(RegisterError::Validation(
                "Transaction amount must be positive".to_string(),
            ));
        }

        for item in &self.items {
            if item.quantity == 0 {
                return Err(RegisterError::Validation(format!(
                    "Item '{}' must have a quantity of at least one",
                    item.service_id
                )));
            }
            if item.unit_price < BigDecimal::from(0) {
                return Err(RegisterError::Validation(format!(
                    "Item '{}' has a negative unit price",
                    item.service_id
                )));
            }
        }

        if !self.items.is_empty() && self.items_total() != self.total_amount {
            return Err(RegisterError::Validation(format!(
                "Transaction total {} does not match item subtotals {}",
                self.total_amount,
                self.items_total()
            )));
        }

        Ok(())
    }
}

/// Running financial summary of a shift, computed on read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSummary {
    pub shift_id: String,
    /// Number of completed transactions inside the shift window
    pub transaction_count: usize,
    pub total: BigDecimal,
    pub cash_total: BigDecimal,
    pub card_total: BigDecimal,
    pub transfer_total: BigDecimal,
    pub other_total: BigDecimal,
    /// Opening balance plus cash takings
    pub expected_cash: BigDecimal,
}

impl ShiftSummary {
    /// Total of a single reporting bucket
    pub fn bucket_total(&self, bucket: PaymentBucket) -> &BigDecimal {
        match bucket {
            PaymentBucket::Cash => &self.cash_total,
            PaymentBucket::Card => &self.card_total,
            PaymentBucket::Transfer => &self.transfer_total,
            PaymentBucket::Other => &self.other_total,
        }
    }

    /// Check that the buckets add up to the total
    pub fn is_balanced(&self) -> bool {
        let buckets = &self.cash_total + &self.card_total + &self.transfer_total + &self.other_total;
        buckets == self.total
    }
}

/// Partial update applied to a stored shift
///
/// `expected_status` is a compare-and-set guard: the store applies the patch
/// only if the stored shift still has that status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftPatch {
    pub expected_status: ShiftStatus,
    pub status: Option<ShiftStatus>,
    pub closing_balance: Option<BigDecimal>,
    pub expected_balance: Option<BigDecimal>,
    pub difference_amount: Option<BigDecimal>,
    pub closed_at: Option<NaiveDateTime>,
    pub closed_by: Option<String>,
    pub notes: Option<String>,
    pub abnormal_close: Option<bool>,
}

impl ShiftPatch {
    /// Patch closing a counted shift
    pub fn close(
        expected_balance: BigDecimal,
        closing_balance: BigDecimal,
        closed_by: String,
        notes: String,
    ) -> Self {
        let difference = &closing_balance - &expected_balance;
        Self {
            expected_status: ShiftStatus::Open,
            status: Some(ShiftStatus::Closed),
            closing_balance: Some(closing_balance),
            expected_balance: Some(expected_balance),
            difference_amount: Some(difference),
            closed_at: Some(chrono::Utc::now().naive_utc()),
            closed_by: Some(closed_by),
            notes: Some(notes),
            abnormal_close: Some(false),
        }
    }

    /// Patch closing a shift without a cash count
    pub fn force_close(expected_balance: BigDecimal, closed_by: String, notes: String) -> Self {
        Self {
            expected_status: ShiftStatus::Open,
            status: Some(ShiftStatus::Closed),
            closing_balance: None,
            expected_balance: Some(expected_balance),
            difference_amount: None,
            closed_at: Some(chrono::Utc::now().naive_utc()),
            closed_by: Some(closed_by),
            notes: Some(notes),
            abnormal_close: Some(true),
        }
    }

    /// Apply the patch to a shift. Does not check `expected_status`.
    pub fn apply(&self, shift: &mut Shift) {
        if let Some(status) = self.status {
            shift.status = status;
        }
        if let Some(ref closing) = self.closing_balance {
            shift.closing_balance = Some(closing.clone());
        }
        if let Some(ref expected) = self.expected_balance {
            shift.expected_balance = Some(expected.clone());
        }
        if let Some(ref difference) = self.difference_amount {
            shift.difference_amount = Some(difference.clone());
        }
        if let Some(closed_at) = self.closed_at {
            shift.closed_at = Some(closed_at);
        }
        if let Some(ref closed_by) = self.closed_by {
            shift.closed_by = Some(closed_by.clone());
        }
        if let Some(ref notes) = self.notes {
            shift.notes = notes.clone();
        }
        if let Some(abnormal) = self.abnormal_close {
            shift.abnormal_close = abnormal;
        }
    }
}

/// Errors that can occur in the register
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Register closed: open a shift before recording sales")]
    RegisterClosed,
    #[error("Shift not open: {0}")]
    ShiftNotOpen(String),
    #[error("Shift already open: {0}")]
    ShiftAlreadyOpen(String),
    #[error("Shift not found: {0}")]
    ShiftNotFound(String),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

/// Result type for register operations
pub type RegisterResult<T> = Result<T, RegisterError>;
