use thiserror::Error;
use uuid::Uuid;

/// Errors produced by store and presenter operations.
///
/// `Validation`, `EmptyExport` and `Export` are surfaced to the user;
/// `NotFound` is swallowed at the presenter boundary as a silent no-op.
/// None of these abort the application.
#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Transaction with ID {0} not found")]
    NotFound(Uuid),

    #[error("No transactions to export")]
    EmptyExport,

    #[error("{0}")]
    Export(String),
}
