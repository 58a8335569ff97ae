//! Database initialization for the application.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, budget::create_budget_table, category::create_category_table,
    history::create_history_table, settings::create_user_settings_table,
    transaction::create_transaction_table, user::create_user_table,
};

/// Create the tables for the application's domain models.
///
/// Table creation runs inside a single exclusive transaction so a partially
/// initialized schema is never left behind.
///
/// # Errors
/// Returns an [Error::SqlError] if any table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_history_table(&transaction)?;
    create_user_settings_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
