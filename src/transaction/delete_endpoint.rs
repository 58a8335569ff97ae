//! Defines the endpoint for deleting a single transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    budget::apply_budget_delta,
    database_id::TransactionId,
    history::remove_from_history,
    response::message_response,
    user::UserId,
};

use super::{
    TransactionState,
    core::{TransactionType, delete_transaction, get_transaction},
};

/// A route handler for deleting a transaction.
///
/// Reverses the transaction's contribution to its budget and the day's
/// history aggregate, restoring the state from before the transaction was
/// created.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    let transaction = get_transaction(transaction_id, user_id, &tx)?;
    delete_transaction(transaction_id, user_id, &tx)?;

    let (income_delta, expense_delta) = match transaction.transaction_type {
        TransactionType::Income => (transaction.amount, 0.0),
        TransactionType::Expense => (0.0, transaction.amount),
    };
    remove_from_history(user_id, transaction.date, income_delta, expense_delta, &tx)?;

    if transaction.transaction_type == TransactionType::Expense {
        if let Some(budget_id) = transaction.budget_id {
            apply_budget_delta(budget_id, user_id, -transaction.amount, &tx)?;
        }
    }

    tx.commit()?;

    Ok(message_response(
        StatusCode::OK,
        "Transaction deleted successfully",
    ))
}
