//! Defines the endpoint for creating a transaction.

use axum::{Extension, Json, extract::State, http::StatusCode, response::Response};

use crate::{
    Error,
    budget::apply_budget_delta,
    history::add_to_history,
    response::data_response,
    user::UserId,
};

use super::{
    TransactionState,
    core::{TransactionType, create_transaction},
    form::{TransactionForm, check_references},
};

/// A route handler for creating a new transaction.
///
/// The transaction row, the owning budget's totals and the day's history
/// aggregate are written in one database transaction.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    Json(form): Json<TransactionForm>,
) -> Result<Response, Error> {
    let new_transaction = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    check_references(&new_transaction, user_id, &tx)?;

    let transaction = create_transaction(&new_transaction, user_id, &tx)?;

    let (income_delta, expense_delta) = match transaction.transaction_type {
        TransactionType::Income => (transaction.amount, 0.0),
        TransactionType::Expense => (0.0, transaction.amount),
    };
    add_to_history(user_id, transaction.date, income_delta, expense_delta, &tx)?;

    if transaction.transaction_type == TransactionType::Expense {
        if let Some(budget_id) = transaction.budget_id {
            apply_budget_delta(budget_id, user_id, transaction.amount, &tx)?;
        }
    }

    tx.commit()?;

    Ok(data_response(
        StatusCode::CREATED,
        "Transaction created successfully",
        transaction,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        budget::{NewBudget, create_budget, get_budget},
        category::{NewCategory, create_category},
        database_id::{BudgetId, CategoryId},
        db::initialize,
        transaction::TransactionType,
        user::{UserId, create_user},
    };

    use super::{TransactionForm, TransactionState, create_transaction_endpoint};

    fn get_test_state() -> (TransactionState, UserId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();

        (
            TransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            user.id,
        )
    }

    fn make_category(
        state: &TransactionState,
        user_id: UserId,
        category_type: TransactionType,
    ) -> CategoryId {
        let conn = state.db_connection.lock().unwrap();
        create_category(
            &NewCategory {
                name: "Test".to_owned(),
                icon: "💡".to_owned(),
                category_type,
            },
            user_id,
            &conn,
        )
        .unwrap()
        .id
    }

    fn make_budget(
        state: &TransactionState,
        user_id: UserId,
        category_id: CategoryId,
        amount: f64,
    ) -> BudgetId {
        let conn = state.db_connection.lock().unwrap();
        create_budget(
            &NewBudget {
                name: "Test budget".to_owned(),
                amount,
                category_id,
                start_date: None,
                end_date: None,
            },
            user_id,
            &conn,
        )
        .unwrap()
        .id
    }

    fn history_row(state: &TransactionState, user_id: UserId) -> Option<(f64, f64)> {
        let conn = state.db_connection.lock().unwrap();
        conn.query_row(
            "SELECT income, expense FROM history
             WHERE day = 15 AND month = 3 AND year = 2024 AND user_id = ?1",
            [user_id.as_i64()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .ok()
    }

    #[tokio::test]
    async fn income_without_budget_updates_history_only() {
        let (state, user_id) = get_test_state();
        let category = make_category(&state, user_id, TransactionType::Income);
        let form = TransactionForm {
            name: "Salary".to_owned(),
            amount: 100.0,
            description: None,
            date: date!(2024 - 03 - 15),
            transaction_type: TransactionType::Income,
            category,
            budget: None,
        };

        create_transaction_endpoint(State(state.clone()), Extension(user_id), Json(form))
            .await
            .unwrap();

        assert_eq!(history_row(&state, user_id), Some((100.0, 0.0)));
    }

    #[tokio::test]
    async fn budgeted_expense_updates_budget_and_history() {
        let (state, user_id) = get_test_state();
        let category = make_category(&state, user_id, TransactionType::Expense);
        let budget_id = make_budget(&state, user_id, category, 500.0);
        let form = TransactionForm {
            name: "Groceries".to_owned(),
            amount: 200.0,
            description: None,
            date: date!(2024 - 03 - 15),
            transaction_type: TransactionType::Expense,
            category,
            budget: Some(budget_id),
        };

        create_transaction_endpoint(State(state.clone()), Extension(user_id), Json(form))
            .await
            .unwrap();

        let budget = {
            let conn = state.db_connection.lock().unwrap();
            get_budget(budget_id, user_id, &conn).unwrap()
        };
        assert_eq!(budget.total_spent, 200.0);
        assert_eq!(budget.remaining, 300.0);
        assert_eq!(history_row(&state, user_id), Some((0.0, 200.0)));
    }

    #[tokio::test]
    async fn invalid_reference_leaves_no_partial_writes() {
        let (state, user_id) = get_test_state();
        let category = make_category(&state, user_id, TransactionType::Expense);
        let form = TransactionForm {
            name: "Groceries".to_owned(),
            amount: 200.0,
            description: None,
            date: date!(2024 - 03 - 15),
            transaction_type: TransactionType::Expense,
            category,
            budget: Some(1337),
        };

        let result =
            create_transaction_endpoint(State(state.clone()), Extension(user_id), Json(form)).await;

        assert!(result.is_err());
        assert_eq!(history_row(&state, user_id), None);
        let count: i64 = {
            let conn = state.db_connection.lock().unwrap();
            conn.query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(count, 0);
    }
}
