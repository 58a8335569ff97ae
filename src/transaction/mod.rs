//! Transactions and the endpoints that keep budgets and history in sync
//! with them.
//!
//! Every write endpoint in this module runs inside a single database
//! transaction so the transaction row, the owning budget's running totals
//! and the per-day history aggregates always move together.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod core;
mod create_endpoint;
mod delete_endpoint;
mod delete_many_endpoint;
mod form;
mod list_endpoint;
mod update_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionType, count_transactions,
    count_transactions_for_category, create_transaction, create_transaction_table,
    delete_transaction, delete_transactions, detach_transactions_from_budget, get_transaction,
    get_transactions_by_ids, list_transactions, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use delete_many_endpoint::{DeleteManyForm, delete_transactions_endpoint};
pub use form::{TransactionForm, check_references};
pub use list_endpoint::list_transactions_endpoint;
pub use update_endpoint::update_transaction_endpoint;

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for reading and writing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
