//! Defines the endpoint for updating a budget.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    category::get_category,
    database_id::BudgetId,
    response::{FieldError, data_response},
    transaction::TransactionType,
    user::UserId,
};

use super::{
    BudgetState,
    core::{budget_name_exists, get_budget, update_budget},
    form::BudgetForm,
};

/// A route handler for updating a budget.
///
/// Changing the allocated amount recomputes the remaining headroom from the
/// spend recorded so far.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn update_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<BudgetForm>,
) -> Result<Response, Error> {
    let new_budget = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    let category = get_category(new_budget.category_id, user_id, &tx)?;
    if category.category_type != TransactionType::Expense {
        return Err(Error::Validation(vec![FieldError::new(
            "category",
            "Budgets can only cover expense categories",
        )]));
    }

    if budget_name_exists(&new_budget.name, Some(budget_id), user_id, &tx)? {
        return Err(Error::DuplicateBudgetName(new_budget.name));
    }

    update_budget(budget_id, user_id, &new_budget, &tx)?;
    let budget = get_budget(budget_id, user_id, &tx)?;
    tx.commit()?;

    Ok(data_response(
        StatusCode::OK,
        "Budget updated successfully",
        budget,
    ))
}
