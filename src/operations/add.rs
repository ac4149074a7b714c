use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::transaction::{TransactionInput, TransactionType};

/// Parse a `date, description, amount, type` input line into validated
/// fields. This is the single entry point for form input in the command
/// loop and the table view.
pub fn parse_transaction_input(details: &str) -> Result<TransactionInput, LedgerError> {
    let detail_parts: Vec<&str> = details.split(',').map(|s| s.trim()).collect();
    if detail_parts.len() != 4 {
        return Err(LedgerError::Validation(format!(
            "Invalid number of details provided. Expected 4 details separated by commas but got {}",
            detail_parts.len()
        )));
    }

    validate_fields(detail_parts[0], detail_parts[1], detail_parts[2], detail_parts[3])
}

/// Validate the four transaction fields individually. CSV import calls this
/// directly so that descriptions containing commas stay intact.
pub fn validate_fields(
    date: &str,
    description: &str,
    amount: &str,
    transaction_type: &str,
) -> Result<TransactionInput, LedgerError> {
    let date = match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(parsed_date) => parsed_date,
        Err(_) => {
            return Err(LedgerError::Validation(
                "Invalid date format. Please use YYYY-MM-DD.".to_string(),
            ));
        }
    };

    let amount = match Decimal::from_str(amount.trim()) {
        Ok(parsed_amount) => parsed_amount,
        Err(_) => {
            return Err(LedgerError::Validation(format!(
                "Invalid amount format {}. Please provide a valid decimal number.",
                amount
            )));
        }
    };

    let transaction_type = match TransactionType::parse(transaction_type.trim()) {
        Some(parsed_type) => parsed_type,
        None => {
            return Err(LedgerError::Validation(
                "Invalid transaction type. Use 'income' or 'expense'.".to_string(),
            ));
        }
    };

    let description = description.trim();
    if description.is_empty() {
        return Err(LedgerError::Validation(
            "Description cannot be empty.".to_string(),
        ));
    }
    if description.len() > 255 {
        return Err(LedgerError::Validation("Description too long".to_string()));
    }

    Ok(TransactionInput {
        date,
        description: description.to_string(),
        amount,
        transaction_type,
    })
}
