use uuid::Uuid;

use crate::error::LedgerError;
use crate::presenter::Presenter;

/// What a delete request did, for user-facing reporting.
#[derive(Debug, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: usize,
    pub ended_edit: bool,
}

pub fn parse_transaction_id(input: &str) -> Result<Uuid, LedgerError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LedgerError::Validation(
            "Transaction ID cannot be empty.".to_string(),
        ));
    }

    match Uuid::parse_str(input) {
        Ok(parsed_id) => Ok(parsed_id),
        Err(_) => Err(LedgerError::Validation(
            "Invalid transaction ID format. Please provide a valid UUID.".to_string(),
        )),
    }
}

/// Parse the ID argument and remove the matching transaction. Removing an
/// unknown ID succeeds with `removed == 0`.
pub fn remove_transaction(
    presenter: &mut Presenter,
    input: &str,
) -> Result<RemoveOutcome, LedgerError> {
    let id = parse_transaction_id(input)?;
    let was_editing = presenter.edited() == Some(id);
    let removed = presenter.delete(id);

    Ok(RemoveOutcome {
        removed,
        ended_edit: was_editing && removed > 0,
    })
}
