//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::traits::*;
use crate::types::*;

fn poisoned<T>(_: PoisonError<T>) -> RegisterError {
    RegisterError::Storage("storage lock poisoned".to_string())
}

/// In-memory storage implementation for testing and development
///
/// Clones share the same data. Every check-and-write happens under a single
/// write lock, which gives the same guarantees a database would give with a
/// partial unique index on open shifts and a conditional update on close.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    shifts: Arc<RwLock<HashMap<String, Shift>>>,
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            shifts: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> RegisterResult<()> {
        self.shifts.write().map_err(poisoned)?.clear();
        self.transactions.write().map_err(poisoned)?.clear();
        Ok(())
    }

    /// Simulate the store going away; every call fails with a storage error
    /// until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Store a transaction as-is, keeping its timestamps and shift reference
    ///
    /// Used to seed history and to simulate sales recorded by other clients.
    pub fn seed_transaction(&self, transaction: Transaction) -> RegisterResult<()> {
        self.transactions
            .write()
            .map_err(poisoned)?
            .insert(transaction.id.clone(), transaction);
        Ok(())
    }

    fn check_available(&self) -> RegisterResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(RegisterError::Storage("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegisterStorage for MemoryStorage {
    async fn find_open_shift(&self) -> RegisterResult<Option<Shift>> {
        self.check_available()?;
        Ok(self
            .shifts
            .read()
            .map_err(poisoned)?
            .values()
            .find(|shift| shift.is_open())
            .cloned())
    }

    async fn get_shift(&self, shift_id: &str) -> RegisterResult<Option<Shift>> {
        self.check_available()?;
        Ok(self.shifts.read().map_err(poisoned)?.get(shift_id).cloned())
    }

    async fn list_closed_shifts(&self, limit: usize) -> RegisterResult<Vec<Shift>> {
        self.check_available()?;
        let shifts = self.shifts.read().map_err(poisoned)?;
        let mut closed: Vec<Shift> = shifts
            .values()
            .filter(|shift| !shift.is_open())
            .cloned()
            .collect();
        closed.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        closed.truncate(limit);
        Ok(closed)
    }

    async fn list_transactions_since(
        &self,
        since: NaiveDateTime,
        until: Option<NaiveDateTime>,
    ) -> RegisterResult<Vec<Transaction>> {
        self.check_available()?;
        let transactions = self.transactions.read().map_err(poisoned)?;
        let mut filtered: Vec<Transaction> = transactions
            .values()
            .filter(|txn| {
                if txn.created_at < since {
                    return false;
                }
                if let Some(end) = until {
                    if txn.created_at >= end {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(filtered)
    }

    async fn list_recent_transactions(&self, limit: usize) -> RegisterResult<Vec<Transaction>> {
        self.check_available()?;
        let transactions = self.transactions.read().map_err(poisoned)?;
        let mut recent: Vec<Transaction> = transactions.values().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn get_transaction(&self, transaction_id: &str) -> RegisterResult<Option<Transaction>> {
        self.check_available()?;
        Ok(self
            .transactions
            .read()
            .map_err(poisoned)?
            .get(transaction_id)
            .cloned())
    }

    async fn insert_shift(&mut self, shift: &Shift) -> RegisterResult<Shift> {
        self.check_available()?;
        let mut shifts = self.shifts.write().map_err(poisoned)?;

        if shift.is_open() {
            if let Some(open) = shifts.values().find(|s| s.is_open()) {
                return Err(RegisterError::ShiftAlreadyOpen(open.id.clone()));
            }
        }
        if shifts.contains_key(&shift.id) {
            return Err(RegisterError::Storage(format!(
                "Shift '{}' already exists",
                shift.id
            )));
        }

        shifts.insert(shift.id.clone(), shift.clone());
        Ok(shift.clone())
    }

    async fn update_shift(&mut self, shift_id: &str, patch: &ShiftPatch) -> RegisterResult<Shift> {
        self.check_available()?;
        let mut shifts = self.shifts.write().map_err(poisoned)?;
        let shift = shifts
            .get_mut(shift_id)
            .ok_or_else(|| RegisterError::ShiftNotFound(shift_id.to_string()))?;

        if shift.status != patch.expected_status {
            return Err(RegisterError::ShiftNotOpen(shift_id.to_string()));
        }

        patch.apply(shift);
        Ok(shift.clone())
    }

    async fn insert_transaction(
        &mut self,
        transaction: &Transaction,
    ) -> RegisterResult<Transaction> {
        self.check_available()?;
        let mut transactions = self.transactions.write().map_err(poisoned)?;
        if transactions.contains_key(&transaction.id) {
            return Err(RegisterError::Storage(format!(
                "Transaction '{}' already exists",
                transaction.id
            )));
        }
        transactions.insert(transaction.id.clone(), transaction.clone());
        Ok(transaction.clone())
    }

    async fn set_message_sent(
        &mut self,
        transaction_id: &str,
        sent: bool,
    ) -> RegisterResult<Transaction> {
        self.check_available()?;
        let mut transactions = self.transactions.write().map_err(poisoned)?;
        let transaction = transactions
            .get_mut(transaction_id)
            .ok_or_else(|| RegisterError::TransactionNotFound(transaction_id.to_string()))?;
        transaction.message_sent = sent;
        Ok(transaction.clone())
    }
}
