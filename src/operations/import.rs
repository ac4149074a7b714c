use std::fs::File;

use crate::error::LedgerError;
use crate::operations::add::validate_fields;
use crate::presenter::Presenter;

/// Read transactions back from a CSV file in the export format (header row
/// `Date,Description,Amount,Type` plus one record per line) and append them
/// to the store. Returns the number of imported transactions.
///
/// The whole file is validated before anything is appended, so a bad row
/// leaves the store untouched.
pub fn import_from_file(presenter: &mut Presenter, path: &str) -> Result<usize, LedgerError> {
    let file = File::open(path)
        .map_err(|e| LedgerError::Export(format!("Failed to open file '{}': {}", path, e)))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(true)
        .from_reader(file);

    let mut inputs = Vec::new();

    for (record_index, result) in reader.records().enumerate() {
        // The header occupies line 1, so records start at line 2.
        let line = record_index + 2;
        let record = result
            .map_err(|e| LedgerError::Export(format!("CSV parse error on line {}: {}", line, e)))?;

        if record.len() != 4 {
            return Err(LedgerError::Validation(format!(
                "Invalid number of columns on line {}: expected 4, got {}",
                line,
                record.len()
            )));
        }

        let input = validate_fields(
            record.get(0).unwrap_or(""),
            record.get(1).unwrap_or(""),
            record.get(2).unwrap_or(""),
            record.get(3).unwrap_or(""),
        )
        .map_err(|e| LedgerError::Validation(format!("Line {}: {}", line, e)))?;

        inputs.push(input);
    }

    let mut count = 0;
    for input in inputs {
        presenter.add(input)?;
        count += 1;
    }

    Ok(count)
}
