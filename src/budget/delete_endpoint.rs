//! Defines the endpoint for deleting a budget.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};

use crate::{
    Error,
    database_id::BudgetId,
    response::message_response,
    transaction::detach_transactions_from_budget,
    user::UserId,
};

use super::{
    BudgetState,
    core::{delete_budget, get_budget},
};

/// A route handler for deleting a budget.
///
/// Transactions that counted against the budget are kept and detached, so
/// the history aggregates are unaffected.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same
/// thread.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Path(budget_id): Path<BudgetId>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().unwrap();
    let tx = connection.unchecked_transaction()?;

    get_budget(budget_id, user_id, &tx)?;
    detach_transactions_from_budget(budget_id, user_id, &tx)?;
    delete_budget(budget_id, user_id, &tx)?;

    tx.commit()?;

    Ok(message_response(StatusCode::OK, "Budget deleted successfully"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Json,
        extract::{Path, State},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        budget::{NewBudget, create_budget},
        category::{NewCategory, create_category},
        database_id::BudgetId,
        db::initialize,
        transaction::{
            TransactionForm, TransactionState, TransactionType, create_transaction_endpoint,
        },
        user::{UserId, create_user},
    };

    use super::{BudgetState, delete_budget_endpoint};

    async fn get_fixture() -> (BudgetState, UserId, BudgetId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = create_user("foo@bar.baz", &conn).unwrap();
        let category = create_category(
            &NewCategory {
                name: "Groceries".to_owned(),
                icon: "🛒".to_owned(),
                category_type: TransactionType::Expense,
            },
            user.id,
            &conn,
        )
        .unwrap();
        let budget = create_budget(
            &NewBudget {
                name: "Food".to_owned(),
                amount: 500.0,
                category_id: category.id,
                start_date: None,
                end_date: None,
            },
            user.id,
            &conn,
        )
        .unwrap();

        let db_connection = Arc::new(Mutex::new(conn));

        create_transaction_endpoint(
            State(TransactionState {
                db_connection: db_connection.clone(),
            }),
            Extension(user.id),
            Json(TransactionForm {
                name: "Groceries".to_owned(),
                amount: 200.0,
                description: None,
                date: date!(2024 - 03 - 15),
                transaction_type: TransactionType::Expense,
                category: category.id,
                budget: Some(budget.id),
            }),
        )
        .await
        .unwrap();

        (BudgetState { db_connection }, user.id, budget.id)
    }

    #[tokio::test]
    async fn delete_detaches_transactions_and_keeps_history() {
        let (state, user_id, budget_id) = get_fixture().await;

        delete_budget_endpoint(State(state.clone()), Path(budget_id), Extension(user_id))
            .await
            .unwrap();

        let conn = state.db_connection.lock().unwrap();
        let orphaned: i64 = conn
            .query_row(
                "SELECT COUNT(id) FROM \"transaction\" WHERE budget_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphaned, 1);

        let history_expense: f64 = conn
            .query_row(
                "SELECT expense FROM history WHERE user_id = ?1",
                [user_id.as_i64()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(history_expense, 200.0);
    }

    #[tokio::test]
    async fn delete_of_missing_budget_fails() {
        let (state, user_id, _) = get_fixture().await;

        let result = delete_budget_endpoint(State(state), Path(1337), Extension(user_id)).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}
