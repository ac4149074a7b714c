mod error;
mod models;
mod operations;
mod presenter;
mod store;

use clap::Parser;
use std::io;
use std::path::Path;

use crate::operations::add::parse_transaction_input;
use crate::operations::browse::run_browse;
use crate::operations::export;
use crate::operations::import::import_from_file;
use crate::operations::remove::{parse_transaction_id, remove_transaction};
use crate::presenter::{BalanceTone, InputMode, Presenter};
use crate::store::TransactionStore;

/// In-memory transaction ledger with a table view and CSV export.
#[derive(Parser, Debug)]
#[command(name = "tally")]
struct Args {
    /// Display currency code (USD, EUR, INR or GBP; other codes show no symbol)
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Row count above which the table view is marked scrollable
    #[arg(long, default_value_t = 10)]
    scroll_threshold: usize,
}

pub enum UserCommands {
    Add,
    Edit,
    Save,
    Cancel,
    Delete,
    List,
    Balance,
    Currency,
    Export,
    Import,
    Browse,
    Exit,
    Unknown,
}

fn main() {
    let args = Args::parse();

    println!("Welcome to the transaction ledger!");
    let mut presenter = Presenter::new(
        TransactionStore::new(),
        args.currency,
        args.scroll_threshold,
    );

    loop {
        match presenter.mode() {
            InputMode::Adding => println!(
                "Please enter a command (add, edit, delete, list, balance, currency, export, import, browse, exit):"
            ),
            InputMode::Editing => println!(
                "Editing in progress. Please enter a command (save, cancel, delete, list, balance, currency, export, import, browse, exit):"
            ),
        }

        // read user input
        let input = match read_user_input() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("Error reading input: {}", e);
                continue;
            }
        };
        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        let command = check_for_command(parts[0]);
        match command {
            UserCommands::Add => {
                println!("Add command selected. Please enter transaction details in the format:\ndate(YYYY-MM-DD), description, amount, type(income/expense)");
                let details = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match parse_transaction_input(&details).and_then(|input| presenter.add(input)) {
                    Ok(transaction) => {
                        println!("Transaction added successfully with ID {}.", transaction.id);
                        print_view(&presenter);
                    }
                    Err(e) => {
                        println!("Error adding transaction: {}", e);
                        println!("Please try again.");
                    }
                }
            }
            UserCommands::Edit => {
                println!("Edit command selected. Provide the transaction ID to edit:");
                let id_input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                let id = match parse_transaction_id(&id_input) {
                    Ok(id) => id,
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                match presenter.begin_edit(id) {
                    Some(transaction) => {
                        println!(
                            "Editing transaction {}: {}, {}, {}, {}",
                            transaction.id,
                            transaction.date.format("%Y-%m-%d"),
                            transaction.description,
                            transaction.amount,
                            transaction.transaction_type.label()
                        );
                        prompt_and_commit(&mut presenter);
                    }
                    None => println!("Transaction with ID {} not found.", id),
                }
            }
            UserCommands::Save => match presenter.mode() {
                InputMode::Editing => prompt_and_commit(&mut presenter),
                InputMode::Adding => println!("No transaction is being edited."),
            },
            UserCommands::Cancel => match presenter.mode() {
                InputMode::Editing => {
                    presenter.cancel_edit();
                    println!("Edit cancelled.");
                }
                InputMode::Adding => println!("Nothing to cancel."),
            },
            UserCommands::Delete => {
                println!("Delete command selected. Provide the transaction ID to remove:");
                let id_input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match remove_transaction(&mut presenter, &id_input) {
                    Ok(outcome) => {
                        if outcome.removed == 0 {
                            println!("No transaction matched that ID.");
                        } else {
                            println!("Transaction removed successfully.");
                            if outcome.ended_edit {
                                println!("The removed transaction was being edited; edit cancelled.");
                            }
                            print_view(&presenter);
                        }
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            UserCommands::List => {
                println!("Current Transactions:");
                print_view(&presenter);
            }
            UserCommands::Balance => {
                let tone = match presenter.balance_tone() {
                    BalanceTone::Negative => "negative",
                    BalanceTone::NonNegative => "non-negative",
                };
                println!("Balance: {} ({})", presenter.formatted_balance(), tone);
            }
            UserCommands::Currency => {
                println!("Currency command selected. Provide the display currency code (USD, EUR, INR, GBP):");
                let code = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                presenter.set_currency(code.trim().to_uppercase());
                println!(
                    "Currency set to {}. Balance: {}",
                    presenter.currency(),
                    presenter.formatted_balance()
                );
            }
            UserCommands::Export => {
                println!("Export command selected. Provide the output path (empty for transactions.csv):");
                let path_input = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                let path_input = path_input.trim();
                let path = if path_input.is_empty() {
                    export::DEFAULT_EXPORT_PATH
                } else {
                    path_input
                };
                match presenter.export_to_file(Path::new(path)) {
                    Ok(count) => println!("Successfully exported {} transactions to {}.", count, path),
                    Err(e) => println!("Error exporting transactions: {}", e),
                }
            }
            UserCommands::Import => {
                println!("Import command selected. Please enter the file path to import from (only csv for now):");
                let path = match read_user_input() {
                    Ok(details) => details,
                    Err(e) => {
                        println!("Error reading input: {}", e);
                        continue;
                    }
                };
                match import_from_file(&mut presenter, path.trim()) {
                    Ok(count) => {
                        println!("Successfully imported {} transactions.", count);
                        print_view(&presenter);
                    }
                    Err(err) => println!("Error importing transactions: {}", err),
                }
            }
            UserCommands::Browse => {
                if let Err(e) = run_browse(&mut presenter) {
                    println!("Error in table view: {}", e);
                }
                print_view(&presenter);
            }
            UserCommands::Exit => {
                println!("Exiting the application.");
                break;
            }
            UserCommands::Unknown => {
                println!("No valid command found. Please try again.");
            }
        }
    }
}

/// Print the rendered table and the balance line. Called after every
/// mutating command so the listing never goes stale.
fn print_view(presenter: &Presenter) {
    let rows = presenter.rows();
    if rows.is_empty() {
        println!("No transactions recorded.");
    } else {
        println!(
            "{:<12} {:<32} {:>14} {:<8} {}",
            "Date", "Description", "Amount", "Type", "Id"
        );
        for row in &rows {
            println!(
                "{:<12} {:<32} {:>14} {:<8} {}",
                row.date, row.description, row.amount, row.transaction_type, row.id
            );
        }
        if presenter.scrollable() {
            println!("({} rows; the table view will scroll)", rows.len());
        }
    }
    println!("Balance: {}", presenter.formatted_balance());
}

fn prompt_and_commit(presenter: &mut Presenter) {
    println!("Please enter updated details in the format:\ndate(YYYY-MM-DD), description, amount, type(income/expense)");
    let details = match read_user_input() {
        Ok(details) => details,
        Err(e) => {
            println!("Error reading input: {}", e);
            return;
        }
    };
    match parse_transaction_input(&details).and_then(|input| presenter.commit_edit(input)) {
        Ok(true) => {
            println!("Transaction saved successfully!");
            print_view(presenter);
        }
        Ok(false) => println!("No transaction is being edited."),
        Err(e) => {
            println!("Error saving transaction: {}", e);
            if let Some(id) = presenter.edited() {
                println!("Still editing {}. Use save to retry or cancel to stop editing.", id);
            }
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn check_for_command(input: &str) -> UserCommands {
    match input {
        "add" => UserCommands::Add,
        "edit" => UserCommands::Edit,
        "save" => UserCommands::Save,
        "cancel" => UserCommands::Cancel,
        "delete" | "remove" => UserCommands::Delete,
        "list" | "print" => UserCommands::List,
        "balance" => UserCommands::Balance,
        "currency" => UserCommands::Currency,
        "export" => UserCommands::Export,
        "import" => UserCommands::Import,
        "browse" => UserCommands::Browse,
        "exit" => UserCommands::Exit,
        _ => UserCommands::Unknown,
    }
}
