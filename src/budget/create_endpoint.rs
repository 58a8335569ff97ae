//! Defines the endpoint for creating a budget.

use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};

use crate::{
    Error,
    category::get_category,
    response::{FieldError, data_response},
    transaction::TransactionType,
    user::UserId,
};

use super::{
    BudgetState,
    core::{budget_name_exists, create_budget},
    form::BudgetForm,
};

/// A route handler for creating a new budget.
///
/// Budget names are unique per user, and a budget can only cover an expense
/// category the user owns.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
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

    if budget_name_exists(&new_budget.name, None, user_id, &tx)? {
        return Err(Error::DuplicateBudgetName(new_budget.name));
    }

    let budget = create_budget(&new_budget, user_id, &tx)?;
    tx.commit()?;

    Ok(data_response(
        StatusCode::CREATED,
        "Budget created successfully",
        budget,
    ))
}
