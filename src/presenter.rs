use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::models::currency;
use crate::models::transaction::{Transaction, TransactionInput};
use crate::operations::export;
use crate::store::TransactionStore;

/// Which action the input form commits: appending a new transaction or
/// saving the one being edited. The two are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Adding,
    Editing,
}

/// Styling classification of the balance: `Negative` strictly below zero,
/// `NonNegative` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTone {
    Negative,
    NonNegative,
}

/// One rendered table row. Built only from store contents and the selected
/// currency, so the view can be rebuilt from scratch at any time. The `id`
/// is the handle the edit and delete affordances act on.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: Uuid,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub transaction_type: &'static str,
}

/// Bridges the store and the rendering surfaces. Owns the injected store,
/// the selected display currency, and the back-reference to the transaction
/// currently being edited.
pub struct Presenter {
    store: TransactionStore,
    edited: Option<Uuid>,
    currency: String,
    scroll_threshold: usize,
}

impl Presenter {
    pub fn new(store: TransactionStore, currency: String, scroll_threshold: usize) -> Self {
        Self {
            store,
            edited: None,
            currency,
            scroll_threshold,
        }
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn mode(&self) -> InputMode {
        match self.edited {
            Some(_) => InputMode::Editing,
            None => InputMode::Adding,
        }
    }

    pub fn edited(&self) -> Option<Uuid> {
        self.edited
    }

    pub fn add(&mut self, input: TransactionInput) -> Result<Transaction, LedgerError> {
        self.store.add(input)
    }

    /// Start editing the transaction with `id`. Returns a copy of the record
    /// for pre-filling the form, or `None` (no-op) when the ID is unknown.
    /// Calling this while already editing retargets the session to the new
    /// ID; the last call wins.
    pub fn begin_edit(&mut self, id: Uuid) -> Option<Transaction> {
        let transaction = self.store.get(id)?.clone();
        self.edited = Some(id);
        Some(transaction)
    }

    /// Save the edited transaction. `Ok(true)` means the record was updated
    /// and the edit session ended. `Ok(false)` means nothing was being
    /// edited (or the record was deleted since `begin_edit`) and nothing
    /// happened. A validation error keeps the edit session alive so the
    /// user's input is not thrown away.
    pub fn commit_edit(&mut self, input: TransactionInput) -> Result<bool, LedgerError> {
        let id = match self.edited {
            Some(id) => id,
            None => return Ok(false),
        };
        match self.store.update(id, input) {
            Ok(_) => {
                self.edited = None;
                Ok(true)
            }
            Err(LedgerError::NotFound(_)) => {
                self.edited = None;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edited = None;
    }

    /// Remove the transaction with `id`. Deleting the record that is mid-edit
    /// also ends the edit session, so the back-reference never dangles.
    pub fn delete(&mut self, id: Uuid) -> usize {
        let removed = self.store.remove(id);
        if self.edited == Some(id) {
            self.edited = None;
        }
        removed
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn set_currency(&mut self, code: String) {
        self.currency = code;
    }

    pub fn cycle_currency(&mut self) {
        self.currency = currency::next_in_cycle(&self.currency).to_string();
    }

    pub fn balance(&self) -> Decimal {
        self.store.balance()
    }

    pub fn balance_tone(&self) -> BalanceTone {
        match self.store.balance() < Decimal::ZERO {
            true => BalanceTone::Negative,
            false => BalanceTone::NonNegative,
        }
    }

    pub fn formatted_balance(&self) -> String {
        format_amount(self.store.balance(), &self.currency)
    }

    /// One row per transaction, in store order.
    pub fn rows(&self) -> Vec<TableRow> {
        self.store
            .transactions()
            .iter()
            .map(|t| TableRow {
                id: t.id,
                date: format_date(t.date),
                description: t.description.clone(),
                amount: format_amount(t.amount, &self.currency),
                transaction_type: t.transaction_type.label(),
            })
            .collect()
    }

    /// Whether the table should scroll: true once the row count exceeds the
    /// configured threshold. Checked directly whenever the view is rebuilt.
    pub fn scrollable(&self) -> bool {
        self.store.len() > self.scroll_threshold
    }

    /// Write the CSV export document for the current records. Fails with
    /// `EmptyExport` when there is nothing to export.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize, LedgerError> {
        export::write_csv(self.store.transactions(), writer)
    }

    /// Export to a file, `transactions.csv` by convention. An empty store is
    /// rejected before the file is created.
    pub fn export_to_file(&self, path: &Path) -> Result<usize, LedgerError> {
        export::export_to_file(self.store.transactions(), path)
    }
}

/// Format an amount for display: two decimal places behind the currency's
/// symbol prefix. CSV output does not go through here; it keeps raw amounts.
pub fn format_amount(amount: Decimal, code: &str) -> String {
    format!("{}{:.2}", currency::symbol(code), amount.round_dp(2))
}

/// Format a date for display and export as YYYY-MM-DD.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;
    use std::str::FromStr;

    fn create_test_input(description: &str, amount: i64, transaction_type: TransactionType) -> TransactionInput {
        TransactionInput {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("Invalid date"),
            description: description.to_string(),
            amount: Decimal::from(amount),
            transaction_type,
        }
    }

    fn create_test_presenter() -> Presenter {
        Presenter::new(TransactionStore::new(), "USD".to_string(), 10)
    }

    #[test]
    fn test_begins_in_adding_mode() {
        let presenter = create_test_presenter();
        assert_eq!(presenter.mode(), InputMode::Adding);
        assert_eq!(presenter.edited(), None);
    }

    #[test]
    fn test_begin_edit_switches_to_editing_mode() {
        let mut presenter = create_test_presenter();
        let added = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();

        let prefill = presenter.begin_edit(added.id);

        assert_eq!(prefill, Some(added));
        assert_eq!(presenter.mode(), InputMode::Editing);
    }

    #[test]
    fn test_begin_edit_unknown_id_is_noop() {
        let mut presenter = create_test_presenter();

        assert_eq!(presenter.begin_edit(Uuid::new_v4()), None);
        assert_eq!(presenter.mode(), InputMode::Adding);
    }

    #[test]
    fn test_begin_edit_last_call_wins() {
        let mut presenter = create_test_presenter();
        let first = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        let second = presenter
            .add(create_test_input("Rent", 300, TransactionType::Expense))
            .unwrap();

        presenter.begin_edit(first.id);
        presenter.begin_edit(second.id);

        assert_eq!(presenter.edited(), Some(second.id));
    }

    #[test]
    fn test_commit_edit_updates_record_and_ends_session() {
        let mut presenter = create_test_presenter();
        let added = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        presenter.begin_edit(added.id);

        let committed = presenter
            .commit_edit(create_test_input("Bonus", 500, TransactionType::Income))
            .unwrap();

        assert!(committed);
        assert_eq!(presenter.mode(), InputMode::Adding);
        let stored = presenter.store().get(added.id).unwrap();
        assert_eq!(stored.description, "Bonus");
        assert_eq!(stored.amount, Decimal::from(500));
    }

    #[test]
    fn test_commit_edit_without_session_is_noop() {
        let mut presenter = create_test_presenter();

        let committed = presenter
            .commit_edit(create_test_input("Bonus", 500, TransactionType::Income))
            .unwrap();

        assert!(!committed);
    }

    #[test]
    fn test_commit_edit_validation_failure_keeps_session() {
        let mut presenter = create_test_presenter();
        let added = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        presenter.begin_edit(added.id);

        let result = presenter.commit_edit(create_test_input("  ", 500, TransactionType::Income));

        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(presenter.mode(), InputMode::Editing);
        assert_eq!(presenter.edited(), Some(added.id));
        assert_eq!(presenter.store().get(added.id).unwrap().description, "Salary");
    }

    #[test]
    fn test_delete_clears_edit_backreference() {
        let mut presenter = create_test_presenter();
        let added = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        presenter.begin_edit(added.id);

        assert_eq!(presenter.delete(added.id), 1);
        assert_eq!(presenter.mode(), InputMode::Adding);

        // The dead edit session is gone, so committing is a no-op.
        let committed = presenter
            .commit_edit(create_test_input("Bonus", 500, TransactionType::Income))
            .unwrap();
        assert!(!committed);
        assert!(presenter.store().is_empty());
    }

    #[test]
    fn test_delete_of_other_record_keeps_edit_session() {
        let mut presenter = create_test_presenter();
        let first = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        let second = presenter
            .add(create_test_input("Rent", 300, TransactionType::Expense))
            .unwrap();
        presenter.begin_edit(first.id);

        presenter.delete(second.id);

        assert_eq!(presenter.edited(), Some(first.id));
    }

    #[test]
    fn test_cancel_edit_reverts_to_adding() {
        let mut presenter = create_test_presenter();
        let added = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        presenter.begin_edit(added.id);

        presenter.cancel_edit();

        assert_eq!(presenter.mode(), InputMode::Adding);
    }

    #[test]
    fn test_balance_scenario_salary_minus_rent() {
        let mut presenter = create_test_presenter();
        presenter
            .add(TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                description: "Salary".to_string(),
                amount: Decimal::from(1000),
                transaction_type: TransactionType::Income,
            })
            .unwrap();
        presenter
            .add(TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                description: "Rent".to_string(),
                amount: Decimal::from(300),
                transaction_type: TransactionType::Expense,
            })
            .unwrap();

        assert_eq!(presenter.balance(), Decimal::from(700));
        assert_eq!(presenter.formatted_balance(), "$700.00");
        assert_eq!(presenter.balance_tone(), BalanceTone::NonNegative);
    }

    #[test]
    fn test_balance_tone_negative_below_zero_only() {
        let mut presenter = create_test_presenter();
        assert_eq!(presenter.balance_tone(), BalanceTone::NonNegative);

        presenter
            .add(create_test_input("Rent", 300, TransactionType::Expense))
            .unwrap();
        assert_eq!(presenter.balance_tone(), BalanceTone::Negative);
    }

    #[test]
    fn test_format_amount_two_decimals_with_symbol() {
        assert_eq!(format_amount(Decimal::from(700), "USD"), "$700.00");
        assert_eq!(format_amount(Decimal::from_str("3.5").unwrap(), "EUR"), "€3.50");
        assert_eq!(format_amount(Decimal::from_str("-12.345").unwrap(), "GBP"), "£-12.34");
    }

    #[test]
    fn test_format_amount_unrecognized_code_has_no_symbol() {
        assert_eq!(format_amount(Decimal::from(5), "XYZ"), "5.00");
    }

    #[test]
    fn test_format_date_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date(date), "2024-01-01");
    }

    #[test]
    fn test_rows_reflect_store_order_and_currency() {
        let mut presenter = create_test_presenter();
        let salary = presenter
            .add(create_test_input("Salary", 1000, TransactionType::Income))
            .unwrap();
        let rent = presenter
            .add(create_test_input("Rent", 300, TransactionType::Expense))
            .unwrap();

        let rows = presenter.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, salary.id);
        assert_eq!(rows[0].amount, "$1000.00");
        assert_eq!(rows[0].transaction_type, "income");
        assert_eq!(rows[1].id, rent.id);

        presenter.set_currency("EUR".to_string());
        assert_eq!(presenter.rows()[1].amount, "€300.00");
    }

    #[test]
    fn test_scrollable_past_threshold() {
        let mut presenter = Presenter::new(TransactionStore::new(), "USD".to_string(), 2);
        presenter
            .add(create_test_input("One", 1, TransactionType::Income))
            .unwrap();
        presenter
            .add(create_test_input("Two", 2, TransactionType::Income))
            .unwrap();
        assert!(!presenter.scrollable());

        presenter
            .add(create_test_input("Three", 3, TransactionType::Income))
            .unwrap();
        assert!(presenter.scrollable());
    }

    #[test]
    fn test_export_csv_document_through_presenter() {
        let mut presenter = create_test_presenter();
        presenter
            .add(TransactionInput {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                description: "Salary".to_string(),
                amount: Decimal::from(1000),
                transaction_type: TransactionType::Income,
            })
            .unwrap();

        let mut output = Vec::new();
        let count = presenter.export_csv(&mut output).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Date,Description,Amount,Type\n2024-01-01,Salary,1000,income\n"
        );
    }

    #[test]
    fn test_export_csv_empty_store_fails() {
        let presenter = create_test_presenter();
        let mut output = Vec::new();

        assert_eq!(presenter.export_csv(&mut output), Err(LedgerError::EmptyExport));
        assert!(output.is_empty());
    }

    #[test]
    fn test_cycle_currency_advances_selection() {
        let mut presenter = create_test_presenter();
        presenter.cycle_currency();
        assert_eq!(presenter.currency(), "EUR");
    }
}
