//! Validation utilities

use crate::traits::*;
use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that an amount is positive
pub fn validate_positive_amount(amount: &BigDecimal) -> RegisterResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(RegisterError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount is zero or more
pub fn validate_non_negative_amount(amount: &BigDecimal) -> RegisterResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(RegisterError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an amount has at most two decimal places
pub fn validate_currency_precision(amount: &BigDecimal) -> RegisterResult<()> {
    if amount.with_scale(2) != *amount {
        return Err(RegisterError::Validation(format!(
            "Amount {} has more than two decimal places",
            amount
        )));
    }
    Ok(())
}

/// Validate that a user identity is present
pub fn validate_user_id(user_id: &str) -> RegisterResult<()> {
    if user_id.trim().is_empty() {
        return Err(RegisterError::Validation(
            "User ID cannot be empty".to_string(),
        ));
    }

    if user_id.len() > 128 {
        return Err(RegisterError::Validation(
            "User ID cannot exceed 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate free-text notes against a length limit
pub fn validate_notes(notes: &str, max_len: usize) -> RegisterResult<()> {
    if notes.chars().count() > max_len {
        return Err(RegisterError::Validation(format!(
            "Notes cannot exceed {} characters",
            max_len
        )));
    }

    Ok(())
}

/// Enhanced shift validator with currency and notes checks
pub struct EnhancedShiftValidator {
    pub max_notes_len: usize,
}

impl ShiftValidator for EnhancedShiftValidator {
    fn validate_opening(
        &self,
        opening_balance: &BigDecimal,
        opened_by: &str,
    ) -> RegisterResult<()> {
        validate_non_negative_amount(opening_balance)?;
        validate_currency_precision(opening_balance)?;
        validate_user_id(opened_by)
    }

    fn validate_closing(
        &self,
        closing_balance: &BigDecimal,
        closed_by: &str,
        notes: &str,
    ) -> RegisterResult<()> {
        validate_non_negative_amount(closing_balance)?;
        validate_currency_precision(closing_balance)?;
        validate_user_id(closed_by)?;
        validate_notes(notes, self.max_notes_len)
    }

    fn validate_force_close(&self, closed_by: &str, notes: &str) -> RegisterResult<()> {
        validate_user_id(closed_by)?;
        validate_notes(notes, self.max_notes_len)
    }
}

/// Enhanced sale validator with currency and notes checks
pub struct EnhancedSaleValidator {
    pub max_notes_len: usize,
}

impl SaleValidator for EnhancedSaleValidator {
    fn validate_sale(&self, transaction: &Transaction) -> RegisterResult<()> {
        // Basic validation
        transaction.validate()?;

        validate_positive_amount(&transaction.total_amount)?;
        validate_currency_precision(&transaction.total_amount)?;
        validate_notes(&transaction.notes, self.max_notes_len)?;

        if let Some(ref user_id) = transaction.created_by {
            validate_user_id(user_id)?;
        }

        Ok(())
    }
}
