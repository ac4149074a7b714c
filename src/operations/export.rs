use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::LedgerError;
use crate::models::transaction::Transaction;
use crate::presenter::format_date;

/// Conventional export filename when the user does not name one.
pub const DEFAULT_EXPORT_PATH: &str = "transactions.csv";

/// Write the export document: a `Date,Description,Amount,Type` header plus
/// one row per transaction in store order. Amounts are written raw, without
/// currency formatting. Fields are quoted only when they contain commas,
/// quotes or newlines, so ordinary documents carry no quoting at all.
pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<usize, LedgerError> {
    if transactions.is_empty() {
        return Err(LedgerError::EmptyExport);
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["Date", "Description", "Amount", "Type"])
        .map_err(|e| LedgerError::Export(format!("Failed to write CSV header: {}", e)))?;

    for transaction in transactions {
        csv_writer
            .write_record([
                format_date(transaction.date),
                transaction.description.clone(),
                transaction.amount.to_string(),
                transaction.transaction_type.label().to_string(),
            ])
            .map_err(|e| LedgerError::Export(format!("Failed to write CSV row: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(format!("Failed to flush CSV output: {}", e)))?;

    Ok(transactions.len())
}

/// Export to a file on disk. An empty store is rejected before the file is
/// created, so a failed export leaves nothing behind.
pub fn export_to_file(transactions: &[Transaction], path: &Path) -> Result<usize, LedgerError> {
    if transactions.is_empty() {
        return Err(LedgerError::EmptyExport);
    }

    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file '{}': {}", path.display(), e))
    })?;

    write_csv(transactions, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn create_test_transaction(
        date: (i32, u32, u32),
        description: &str,
        amount: &str,
        transaction_type: TransactionType,
    ) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("Invalid date"),
            description.to_string(),
            Decimal::from_str(amount).expect("Invalid amount"),
            transaction_type,
        )
    }

    #[test]
    fn test_export_document_shape() {
        let transactions = vec![
            create_test_transaction((2024, 1, 1), "Salary", "1000", TransactionType::Income),
            create_test_transaction((2024, 1, 2), "Rent", "300", TransactionType::Expense),
        ];

        let mut output = Vec::new();
        let count = write_csv(&transactions, &mut output).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Date,Description,Amount,Type\n2024-01-01,Salary,1000,income\n2024-01-02,Rent,300,expense\n"
        );
    }

    #[test]
    fn test_export_amounts_are_raw_not_currency_formatted() {
        let transactions = vec![create_test_transaction(
            (2024, 1, 3),
            "Coffee",
            "3.50",
            TransactionType::Expense,
        )];

        let mut output = Vec::new();
        write_csv(&transactions, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("2024-01-03,Coffee,3.50,expense"));
        assert!(!text.contains('$'));
    }

    #[test]
    fn test_export_quotes_description_containing_comma() {
        let transactions = vec![create_test_transaction(
            (2024, 1, 2),
            "Rent, January",
            "300",
            TransactionType::Expense,
        )];

        let mut output = Vec::new();
        write_csv(&transactions, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Date,Description,Amount,Type\n2024-01-02,\"Rent, January\",300,expense\n"
        );
    }

    #[test]
    fn test_export_empty_store_fails() {
        let mut output = Vec::new();
        let result = write_csv(&[], &mut output);

        assert_eq!(result, Err(LedgerError::EmptyExport));
        assert!(output.is_empty());
    }

    #[test]
    fn test_export_to_file_writes_document() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_EXPORT_PATH);
        let transactions = vec![create_test_transaction(
            (2024, 1, 1),
            "Salary",
            "1000",
            TransactionType::Income,
        )];

        let count = export_to_file(&transactions, &path).unwrap();

        assert_eq!(count, 1);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Date,Description,Amount,Type\n2024-01-01,Salary,1000,income\n");
    }

    #[test]
    fn test_export_to_file_empty_store_creates_no_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(DEFAULT_EXPORT_PATH);

        let result = export_to_file(&[], &path);

        assert_eq!(result, Err(LedgerError::EmptyExport));
        assert!(!path.exists());
    }
}
