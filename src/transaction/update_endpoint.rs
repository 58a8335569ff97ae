//! Defines the endpoint for updating a transaction.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    budget::apply_budget_delta,
    database_id::{BudgetId, TransactionId},
    history::{add_to_history, remove_from_history},
    response::data_response,
    user::UserId,
};

use super::{
    TransactionState,
    core::{Transaction, TransactionType, get_transaction, update_transaction},
    form::{TransactionForm, check_references},
};

/// The budget a transaction counts against and the amount it contributes,
/// if any. Only expenses with a budget contribute.
fn budget_contribution(
    transaction_type: TransactionType,
    budget_id: Option<BudgetId>,
    amount: f64,
) -> Option<(BudgetId, f64)> {
    match (transaction_type, budget_id) {
        (TransactionType::Expense, Some(budget_id)) => Some((budget_id, amount)),
        _ => None,
    }
}

/// A route handler for updating a transaction.
///
/// The transaction's previous contribution is reversed out of its old budget
/// and history row, and the new values are applied, all in one database
/// transaction. When the budget is unchanged only the amount difference is
/// applied.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<TransactionForm>,
) -> Result<Response, Error> {
    let new_transaction = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    let old: Transaction = get_transaction(transaction_id, user_id, &tx)?;
    check_references(&new_transaction, user_id, &tx)?;
    update_transaction(transaction_id, user_id, &new_transaction, &tx)?;

    let old_contribution =
        budget_contribution(old.transaction_type, old.budget_id, old.amount);
    let new_contribution = budget_contribution(
        new_transaction.transaction_type,
        new_transaction.budget_id,
        new_transaction.amount,
    );

    match (old_contribution, new_contribution) {
        (Some((old_budget, old_amount)), Some((new_budget, new_amount)))
            if old_budget == new_budget =>
        {
            apply_budget_delta(old_budget, user_id, new_amount - old_amount, &tx)?;
        }
        (old_contribution, new_contribution) => {
            if let Some((budget_id, amount)) = old_contribution {
                apply_budget_delta(budget_id, user_id, -amount, &tx)?;
            }
            if let Some((budget_id, amount)) = new_contribution {
                apply_budget_delta(budget_id, user_id, amount, &tx)?;
            }
        }
    }

    let (old_income, old_expense) = match old.transaction_type {
        TransactionType::Income => (old.amount, 0.0),
        TransactionType::Expense => (0.0, old.amount),
    };
    remove_from_history(user_id, old.date, old_income, old_expense, &tx)?;

    let (new_income, new_expense) = match new_transaction.transaction_type {
        TransactionType::Income => (new_transaction.amount, 0.0),
        TransactionType::Expense => (0.0, new_transaction.amount),
    };
    add_to_history(user_id, new_transaction.date, new_income, new_expense, &tx)?;

    let updated = get_transaction(transaction_id, user_id, &tx)?;
    tx.commit()?;

    Ok(data_response(
        StatusCode::OK,
        "Transaction updated successfully",
        updated,
    ))
}
