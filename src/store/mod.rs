use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::transaction::{Transaction, TransactionInput, TransactionType};

/// Authoritative, in-memory collection of transactions.
///
/// Records keep their insertion order. All mutation goes through `add`,
/// `update` and `remove`; `transactions` hands out a read-only view, so
/// nothing outside the store can change a record behind its back.
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    /// Append a new transaction with a freshly assigned ID and return a copy
    /// of the stored record. On validation failure nothing is mutated.
    pub fn add(&mut self, input: TransactionInput) -> Result<Transaction, LedgerError> {
        validate_input(&input)?;
        let transaction = Transaction::new(
            Uuid::new_v4(),
            input.date,
            input.description.trim().to_string(),
            input.amount,
            input.transaction_type,
        );
        self.transactions.push(transaction.clone());
        Ok(transaction)
    }

    /// Overwrite the fields of the transaction with `id` in place. The ID is
    /// stable across updates. Returns a copy of the updated record, or
    /// `NotFound` if no record has `id`. On validation failure nothing is
    /// mutated.
    pub fn update(&mut self, id: Uuid, input: TransactionInput) -> Result<Transaction, LedgerError> {
        validate_input(&input)?;
        match self.transactions.iter_mut().find(|t| t.id == id) {
            Some(transaction) => {
                transaction.date = input.date;
                transaction.description = input.description.trim().to_string();
                transaction.amount = input.amount;
                transaction.transaction_type = input.transaction_type;
                Ok(transaction.clone())
            }
            None => Err(LedgerError::NotFound(id)),
        }
    }

    /// Remove every transaction with `id` and return how many went away.
    /// Removing an absent ID is a no-op returning 0.
    pub fn remove(&mut self, id: Uuid) -> usize {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        before - self.transactions.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Net balance: income total minus expense total. Recomputed on every
    /// call, never cached, no rounding.
    pub fn balance(&self) -> Decimal {
        self.transactions
            .iter()
            .fold(Decimal::ZERO, |acc, t| match t.transaction_type {
                TransactionType::Income => acc + t.amount,
                TransactionType::Expense => acc - t.amount,
            })
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

fn validate_input(input: &TransactionInput) -> Result<(), LedgerError> {
    let description = input.description.trim();
    if description.is_empty() {
        return Err(LedgerError::Validation(
            "Description cannot be empty.".to_string(),
        ));
    }
    if description.len() > 255 {
        return Err(LedgerError::Validation("Description too long".to_string()));
    }
    Ok(())
}
