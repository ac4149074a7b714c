use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
}

impl Transaction {
    pub fn new(
        id: Uuid,
        date: NaiveDate,
        description: String,
        amount: Decimal,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            id,
            date,
            description,
            amount,
            transaction_type,
        }
    }
}

/// Validated field set for a new or updated transaction. Ids are assigned by
/// the store, so callers never supply one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
}
